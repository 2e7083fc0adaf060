//! Option keys and the values they resolve to

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::env::env_var_name;

/// Every option the configuration layer knows how to resolve.
///
/// Ordering follows declaration order, which is also the order used when
/// printing the resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionKey {
    ConfigPath,
    Profile,
    Region,
    OutputFormat,
    Verbose,
    Quiet,
}

impl OptionKey {
    pub const ALL: [OptionKey; 6] = [
        OptionKey::ConfigPath,
        OptionKey::Profile,
        OptionKey::Region,
        OptionKey::OutputFormat,
        OptionKey::Verbose,
        OptionKey::Quiet,
    ];

    /// Canonical option name, shared by the long flag and the env binding.
    pub fn name(self) -> &'static str {
        match self {
            OptionKey::ConfigPath => "config",
            OptionKey::Profile => "profile",
            OptionKey::Region => "region",
            OptionKey::OutputFormat => "output",
            OptionKey::Verbose => "verbose",
            OptionKey::Quiet => "quiet",
        }
    }

    pub fn flag(self) -> String {
        format!("--{}", self.name())
    }

    pub fn env_var(self) -> String {
        env_var_name(self.name())
    }

    /// Key looked up in the config file. The config path cannot point at itself.
    pub fn file_key(self) -> Option<&'static str> {
        match self {
            OptionKey::ConfigPath => None,
            other => Some(other.name()),
        }
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, OptionKey::Verbose | OptionKey::Quiet)
    }

    /// Built-in default. `None` means the option stays unset.
    pub fn default_value(self) -> Option<OptionValue> {
        match self {
            OptionKey::OutputFormat => Some(OptionValue::Text(OutputFormat::default().to_string())),
            OptionKey::Verbose | OptionKey::Quiet => Some(OptionValue::Bool(false)),
            OptionKey::ConfigPath | OptionKey::Profile | OptionKey::Region => None,
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value taken from one of the configuration sources.
///
/// Values are kept in the shape their source produced. Interpreting them
/// (booleans, output formats) is left to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Text(String),
    Bool(bool),
    /// Non-scalar config file value, carried through unvalidated.
    Structured(serde_yaml::Value),
}

impl OptionValue {
    /// Convert a config file value. YAML `null` means the key is absent.
    pub fn from_yaml(value: serde_yaml::Value) -> Option<Self> {
        match value {
            serde_yaml::Value::Null => None,
            serde_yaml::Value::Bool(b) => Some(OptionValue::Bool(b)),
            serde_yaml::Value::String(s) => Some(OptionValue::Text(s)),
            serde_yaml::Value::Number(n) => Some(OptionValue::Text(n.to_string())),
            other => Some(OptionValue::Structured(other)),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Text(s) => parse_bool(s),
            OptionValue::Structured(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Text(s) => f.write_str(s),
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Structured(value) => match serde_json::to_string(value) {
                Ok(json) => f.write_str(&json),
                Err(_) => write!(f, "{:?}", value),
            },
        }
    }
}

/// Parse the boolean spellings accepted from environment variables and
/// quoted config values.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Rendering mode for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(InvalidValue {
                key: OptionKey::OutputFormat.name().to_string(),
                value: s.to_string(),
                expected: "one of table, json, yaml",
            }),
        }
    }
}

/// A resolved value that its consumer could not interpret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value '{value}' for {key}: expected {expected}")]
pub struct InvalidValue {
    pub key: String,
    pub value: String,
    pub expected: &'static str,
}
