//! Process bootstrap
//!
//! Resolves configuration once per process, before any command body runs,
//! and hands commands a read-only view of the result.

use once_cell::unsync::OnceCell;
use std::io::Write;
use std::path::Path;

use crate::config::{resolve, CliOverrides, ConfigError, Env, LoadOptions, ResolvedConfig};
use crate::domain::{InvalidValue, OutputFormat};

/// Owner of the per-process resolved configuration.
#[derive(Debug, Default)]
pub struct Bootstrap {
    resolved: OnceCell<ResolvedConfig>,
}

impl Bootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve configuration, or return the result of an earlier call.
    ///
    /// Only the first successful call discovers and loads the config file
    /// and writes the `Using config file:` line to `diagnostics`. A failed
    /// call caches nothing.
    pub fn init<W: Write>(
        &self,
        cli: &CliOverrides,
        env: &Env,
        options: &LoadOptions,
        diagnostics: &mut W,
    ) -> Result<&ResolvedConfig, ConfigError> {
        self.resolved.get_or_try_init(|| {
            let resolved = resolve(cli, env, options)?;
            if let Some(path) = resolved.config_file() {
                writeln!(diagnostics, "Using config file: {}", path.display())
                    .map_err(ConfigError::DiagnosticWrite)?;
            }
            Ok(resolved)
        })
    }

    pub fn get(&self) -> Option<&ResolvedConfig> {
        self.resolved.get()
    }
}

/// What every command body receives: the settings resolved at startup.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    config: &'a ResolvedConfig,
}

impl<'a> CommandContext<'a> {
    pub fn new(config: &'a ResolvedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a ResolvedConfig {
        self.config
    }

    pub fn config_file(&self) -> Option<&'a Path> {
        self.config.config_file()
    }

    pub fn output_format(&self) -> Result<OutputFormat, InvalidValue> {
        self.config.output_format()
    }
}
