//! Configuration loading and merging
//!
//! Handles loading from config files, environment variables, and CLI arguments
//! with proper precedence (CLI > Env > File > Defaults).

pub mod env;
pub mod error;
pub mod loader;
pub mod merge;

pub use env::{env_var_name, Env};
pub use error::{ConfigError, LoadFailure};
pub use loader::{discover_config, load_config_file, ConfigFile, LoadOptions};
pub use merge::{merge_cli_with_config, resolve, CliOverrides, ResolvedConfig, ResolvedValue};
