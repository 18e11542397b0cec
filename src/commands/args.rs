//! Schema-driven argument binding.
//!
//! Each command carries an [`OptionTable`] built from its parameter schema.
//! [`OptionTable::bind`] walks the raw tokens once, coerces values to the
//! declared kinds and fills in defaults. Unknown tokens are ignored.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::config::{ParamKind, ParamSpec};

/// Literal token that requests per-command help.
pub const HELP_FLAG: &str = "--help";

/// Errors that can occur while binding command-line arguments.
#[derive(Debug, Error, PartialEq)]
pub enum ArgumentError {
    /// An option was given without a value.
    #[error("argument --{0}: expected one argument")]
    MissingValue(String),

    /// A value could not be coerced to the declared kind.
    #[error("argument --{name}: invalid {kind} value: '{value}'")]
    InvalidValue {
        name: String,
        kind: &'static str,
        value: String,
    },

    /// Required options were not supplied.
    #[error("the following arguments are required: {}", format_flags(.0))]
    MissingRequired(Vec<String>),
}

fn format_flags(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("--{}", name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A bound argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl ArgValue {
    /// Coerce a raw string to the given kind.
    pub fn coerce(raw: &str, kind: ParamKind) -> Option<Self> {
        match kind {
            ParamKind::Str => Some(Self::Str(raw.to_string())),
            ParamKind::Int => strip_separators(raw.trim())?.parse().ok().map(Self::Int),
            ParamKind::Float => strip_separators(raw.trim())?.parse().ok().map(Self::Float),
        }
    }

    /// Convert a default value as written in the configuration.
    pub fn from_yaml(value: &serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Self::Null,
            serde_yaml::Value::Bool(b) => Self::Bool(*b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => Self::Str(s.clone()),
            other => Self::Str(
                serde_yaml::to_string(other)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_default(),
            ),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => f.write_str(&float_repr(*x)),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Null => Ok(()),
        }
    }
}

/// Render a float the way Python's `repr` does: shortest round-trip digits,
/// a `.0` on integral values and a signed exponent of at least two digits.
fn float_repr(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let debug = format!("{:?}", x);
    match debug.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => debug,
    }
}

/// Remove `_` digit separators, accepting them only between two digits.
fn strip_separators(raw: &str) -> Option<String> {
    if !raw.contains('_') {
        return Some(raw.to_string());
    }
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            let between_digits = i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(char::is_ascii_digit);
            if !between_digits {
                return None;
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Ordered bindings produced by [`OptionTable::bind`], keyed by binding key.
pub type Bindings = IndexMap<String, ArgValue>;

/// One recognized `--<name>` option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    /// Option name as written after `--`.
    pub name: String,
    /// Key used in the bindings (`-` replaced by `_`).
    pub key: String,
    /// Kind the value is coerced to.
    pub kind: ParamKind,
    /// Help text.
    pub description: String,
    /// Default value; `None` means the option is required.
    pub default: Option<serde_yaml::Value>,
}

impl OptionSpec {
    /// Build an option from a declared parameter.
    pub fn from_param(name: &str, spec: &ParamSpec) -> Self {
        Self {
            name: name.to_string(),
            key: name.replace('-', "_"),
            kind: spec.param_kind(),
            description: spec.description.clone().unwrap_or_default(),
            default: spec.default.clone(),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Default value for help output; `None` when absent or null.
    pub fn display_default(&self) -> Option<ArgValue> {
        self.default
            .as_ref()
            .map(ArgValue::from_yaml)
            .filter(|value| !value.is_null())
    }

    fn coerce(&self, raw: &str) -> Result<ArgValue, ArgumentError> {
        ArgValue::coerce(raw, self.kind).ok_or_else(|| ArgumentError::InvalidValue {
            name: self.name.clone(),
            kind: self.kind.display(),
            value: raw.to_string(),
        })
    }

    /// Resolve the value used when the option is absent.
    fn default_value(&self) -> Option<Result<ArgValue, ArgumentError>> {
        self.default.as_ref().map(|value| match value {
            serde_yaml::Value::String(raw) => self.coerce(raw),
            other => Ok(ArgValue::from_yaml(other)),
        })
    }
}

/// The typed option table of a single command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionTable {
    options: Vec<OptionSpec>,
}

impl OptionTable {
    /// Build the table from a parameter schema, keeping its order.
    pub fn from_schema<'a>(schema: impl IntoIterator<Item = (&'a String, &'a ParamSpec)>) -> Self {
        Self {
            options: schema
                .into_iter()
                .map(|(name, spec)| OptionSpec::from_param(name, spec))
                .collect(),
        }
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.options.iter().position(|opt| opt.name == name)
    }

    /// Bind raw tokens against the table.
    ///
    /// Recognizes `--name value` and `--name=value`; the last occurrence
    /// wins. Tokens that are not recognized options are skipped, and a bare
    /// `--` stops option parsing.
    pub fn bind<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Bindings, ArgumentError> {
        let mut raw: Vec<Option<String>> = vec![None; self.options.len()];

        let mut iter = tokens.iter().map(AsRef::<str>::as_ref).peekable();
        while let Some(token) = iter.next() {
            if token == "--" {
                break;
            }
            let Some(flag) = token.strip_prefix("--") else {
                continue;
            };

            if let Some((name, value)) = flag.split_once('=') {
                if let Some(index) = self.find(name) {
                    raw[index] = Some(value.to_string());
                }
                continue;
            }

            let Some(index) = self.find(flag) else {
                continue;
            };
            match iter.peek() {
                Some(next) if !looks_like_option(next) => {
                    raw[index] = iter.next().map(str::to_string);
                }
                _ => return Err(ArgumentError::MissingValue(self.options[index].name.clone())),
            }
        }

        let missing: Vec<String> = self
            .options
            .iter()
            .zip(&raw)
            .filter(|(opt, value)| value.is_none() && opt.is_required())
            .map(|(opt, _)| opt.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(ArgumentError::MissingRequired(missing));
        }

        let mut bindings = Bindings::with_capacity(self.options.len());
        for (opt, value) in self.options.iter().zip(raw) {
            let bound = match value {
                Some(raw) => opt.coerce(&raw)?,
                None => match opt.default_value() {
                    Some(default) => default?,
                    None => continue,
                },
            };
            bindings.insert(opt.key.clone(), bound);
        }

        Ok(bindings)
    }
}

/// Whether the token reads as an option rather than a value.
///
/// Negative numbers (`-5`, `-.5`) and tokens containing a space are values.
fn looks_like_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && !is_negative_number(token) && !token.contains(' ')
}

/// Matches `-<digits>` and `-<digits>.<digits>`, where the integer part may
/// be empty.
fn is_negative_number(token: &str) -> bool {
    let Some(body) = token.strip_prefix('-') else {
        return false;
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match body.split_once('.') {
        Some((int, frac)) => (int.is_empty() || all_digits(int)) && all_digits(frac),
        None => all_digits(body),
    }
}

/// Whether the raw tokens ask for per-command help.
pub fn wants_help<S: AsRef<str>>(tokens: &[S]) -> bool {
    tokens.iter().any(|token| token.as_ref() == HELP_FLAG)
}
