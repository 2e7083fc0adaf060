//! Config file discovery and loading

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, LoadFailure};
use crate::domain::{ConfigSource, CONFIG_BASE_NAME};

/// File names probed in each search directory, in order. All are parsed as YAML.
const CANDIDATE_EXTENSIONS: [&str; 3] = [".yaml", ".yml", ""];

/// Filesystem locations the loader needs, injected so tests never touch the
/// real home directory.
///
/// Either location may be unknown. That only becomes an error when discovery
/// actually needs it: the search needs both, a relative explicit path needs
/// the working directory, an absolute explicit path needs neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub cwd: Option<PathBuf>,
    pub home_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn from_system() -> Self {
        Self { cwd: std::env::current_dir().ok(), home_dir: dirs::home_dir() }
    }

    fn cwd(&self) -> Result<&Path, ConfigError> {
        self.cwd.as_deref().ok_or(ConfigError::WorkingDirectoryUnavailable)
    }

    /// Directories probed for a config file: home first, then the working directory.
    pub fn search_path(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let home = self.home_dir.clone().ok_or(ConfigError::HomeDirectoryUnavailable)?;
        Ok(vec![home, self.cwd()?.to_path_buf()])
    }
}

/// A loaded config file. Keys are kept verbatim, including ones no option uses.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub values: serde_yaml::Mapping,
}

impl ConfigFile {
    pub fn get(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.values.get(key)
    }
}

/// Outcome of config file discovery.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Discovery {
    pub source: ConfigSource,
    /// Search candidates checked, in order, up to and including the hit.
    /// Empty when an explicit path was given.
    pub probed: Vec<PathBuf>,
}

/// Decide which config file this run uses.
///
/// An explicit path is taken as-is (made absolute against the working
/// directory) without checking that it exists; loading reports that. With
/// no explicit path the search path is probed and the first hit wins.
pub fn discover_config(
    explicit: Option<&Path>,
    options: &LoadOptions,
) -> Result<Discovery, ConfigError> {
    if let Some(path) = explicit {
        let path = if path.is_absolute() { path.to_path_buf() } else { options.cwd()?.join(path) };
        return Ok(Discovery { source: ConfigSource::ExplicitPath(path), probed: Vec::new() });
    }

    let mut probed = Vec::new();
    for dir in options.search_path()? {
        for ext in CANDIDATE_EXTENSIONS {
            let candidate = dir.join(format!("{}{}", CONFIG_BASE_NAME, ext));
            probed.push(candidate.clone());
            if candidate.is_file() {
                return Ok(Discovery { source: ConfigSource::SearchPath(candidate), probed });
            }
        }
    }

    Ok(Discovery { source: ConfigSource::None, probed })
}

/// Read and parse a YAML config file. An empty document is an empty mapping.
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        let failure = if e.kind() == io::ErrorKind::NotFound {
            LoadFailure::NotFound
        } else {
            LoadFailure::Read(e)
        };
        ConfigError::load(path, failure)
    })?;

    let raw: serde_yaml::Value = serde_yaml::from_str(&content)
        .map_err(|e| ConfigError::load(path, LoadFailure::Parse(e)))?;

    let values = match raw {
        serde_yaml::Value::Mapping(mapping) => mapping,
        serde_yaml::Value::Null => serde_yaml::Mapping::new(),
        _ => return Err(ConfigError::load(path, LoadFailure::NotAMapping)),
    };

    Ok(ConfigFile { path: path.to_path_buf(), values })
}
