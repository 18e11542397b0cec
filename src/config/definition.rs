//! Command definitions as declared in `config.yml`.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// Ordered parameter schema, keyed by parameter name.
pub type ParamSchema = IndexMap<String, ParamSpec>;

/// The parsed configuration file.
///
/// Both sections keep the order in which entries appear in the file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Scripts run through an interpreter.
    #[serde(default, deserialize_with = "section")]
    pub scripts: IndexMap<String, ScriptDef>,

    /// Shell command templates.
    #[serde(default, deserialize_with = "section")]
    pub aliases: IndexMap<String, AliasDef>,
}

/// A script definition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScriptDef {
    /// Human readable description.
    #[serde(default)]
    pub description: Option<String>,

    /// Script file, relative to the workspace.
    #[serde(default)]
    pub path: Option<String>,

    /// Parameter schema.
    #[serde(default, deserialize_with = "section")]
    pub args: ParamSchema,
}

/// An alias definition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AliasDef {
    /// Human readable description.
    #[serde(default)]
    pub description: Option<String>,

    /// Command template with `{name}` placeholders.
    #[serde(default)]
    pub command: Option<String>,

    /// Parameter schema.
    #[serde(default, deserialize_with = "section")]
    pub args: ParamSchema,
}

/// A single declared parameter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParamSpec {
    /// Declared type name (`str`, `int` or `float`).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Help text.
    #[serde(default)]
    pub description: Option<String>,

    /// Default value. `Some(Null)` when the key is present but empty, which
    /// still makes the parameter optional.
    #[serde(default, deserialize_with = "present")]
    pub default: Option<serde_yaml::Value>,
}

impl ParamSpec {
    /// The declared kind, falling back to `Str` for unknown names.
    pub fn param_kind(&self) -> ParamKind {
        self.kind.as_deref().map(ParamKind::from_name).unwrap_or_default()
    }
}

/// Value kinds a parameter can be coerced to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamKind {
    #[default]
    Str,
    Int,
    Float,
}

impl ParamKind {
    /// Map a declared type name to a kind. Unknown names are treated as `Str`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "str" => Self::Str,
            "int" => Self::Int,
            "float" => Self::Float,
            other => {
                tracing::warn!(kind = other, "Unknown parameter type, treating as str");
                Self::Str
            }
        }
    }

    /// Get the display name for this kind.
    pub fn display(&self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
        }
    }
}

/// Deserialize a mapping section where the section itself or any entry may
/// be `null`.
fn section<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let raw: Option<IndexMap<String, Option<T>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, entry)| (name, entry.unwrap_or_default()))
        .collect())
}

/// Deserialize a field so that an explicit `null` is kept as `Some(Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_yaml::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_yaml::Value::deserialize(deserializer).map(Some)
}
