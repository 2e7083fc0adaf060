//! Configuration errors
//!
//! Every variant is fatal: it is raised before any command body runs and
//! aborts the process.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config file {}", .path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: LoadFailure,
    },

    #[error("Could not determine the user's home directory")]
    HomeDirectoryUnavailable,

    #[error("Could not determine the current working directory")]
    WorkingDirectoryUnavailable,

    #[error("Failed to write to the diagnostic stream")]
    DiagnosticWrite(#[source] std::io::Error),
}

impl ConfigError {
    pub(crate) fn load(path: impl Into<PathBuf>, source: LoadFailure) -> Self {
        ConfigError::ConfigLoad { path: path.into(), source }
    }
}

/// Why a config file could not be loaded.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("file does not exist")]
    NotFound,

    #[error("failed to read file")]
    Read(#[source] std::io::Error),

    #[error("invalid YAML")]
    Parse(#[source] serde_yaml::Error),

    #[error("top level must be a mapping of keys to values")]
    NotAMapping,
}
