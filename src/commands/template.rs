//! `{name}` placeholder substitution for alias command templates.

use thiserror::Error;

use super::args::Bindings;

/// Errors that can occur while formatting a command template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A placeholder has no bound value.
    #[error("Missing argument for command template: '{0}'")]
    MissingArgument(String),

    /// The template itself is malformed.
    #[error("Malformed command template: {0}")]
    Malformed(&'static str),
}

/// Substitute `{key}` placeholders with bound values.
///
/// `{{` and `}}` produce literal braces. Anything after `:` or `!` inside a
/// placeholder is dropped and the plain value is substituted. Null values
/// render as the empty string.
pub fn render(template: &str, bindings: &Bindings) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(TemplateError::Malformed("single '}' encountered")),
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') => return Err(TemplateError::Malformed("unexpected '{' in field name")),
                        Some(c) => field.push(c),
                        None => return Err(TemplateError::Malformed("single '{' encountered")),
                    }
                }

                let key = field.split([':', '!']).next().unwrap_or_default();
                if key.is_empty() {
                    return Err(TemplateError::Malformed("empty placeholder"));
                }
                let value = bindings
                    .get(key)
                    .ok_or_else(|| TemplateError::MissingArgument(key.to_string()))?;
                out.push_str(&value.to_string());
            }
            c => out.push(c),
        }
    }

    Ok(out)
}
