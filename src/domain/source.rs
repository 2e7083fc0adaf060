//! Where configuration came from

use std::fmt;
use std::path::{Path, PathBuf};

/// How the config file for this run was located.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Named by `--config` or `AFT_CONFIG`.
    ExplicitPath(PathBuf),
    /// Found by probing the search path.
    SearchPath(PathBuf),
    /// No file; env vars and defaults only.
    #[default]
    None,
}

impl ConfigSource {
    /// The config file location, if a file is in use.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::ExplicitPath(path) | ConfigSource::SearchPath(path) => Some(path),
            ConfigSource::None => None,
        }
    }
}

/// Provenance of a single resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    Flag,
    Env(String),
    File(PathBuf),
    Default,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Flag => f.write_str("flag"),
            ValueSource::Env(name) => write!(f, "env {}", name),
            ValueSource::File(path) => write!(f, "file {}", path.display()),
            ValueSource::Default => f.write_str("default"),
        }
    }
}
