//! Core configuration types shared by the resolver and the commands

pub mod option;
pub mod source;

pub use option::{parse_bool, InvalidValue, OptionKey, OptionValue, OutputFormat};
pub use source::{ConfigSource, ValueSource};

/// Tool-specific prefix for environment bindings.
pub const ENV_PREFIX: &str = "AFT";

/// Base name of the config file probed on the search path.
pub const CONFIG_BASE_NAME: &str = ".aft";
