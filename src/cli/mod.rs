//! Command-line interface for the AFT CLI
//!
//! Global flags are shared by every subcommand. Configuration is resolved
//! by [`Bootstrap`] before any subcommand body runs.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::bootstrap::{Bootstrap, CommandContext};
use crate::config::{CliOverrides, Env, LoadOptions, ResolvedConfig};
use crate::domain::ConfigSource;

mod completions;
mod config;

const LONG_ABOUT: &str = "\
AFT CLI is a command-line tool for managing AWS Control Tower Account Factory for Terraform.
It provides efficient management of AFT configurations, account provisioning, pipeline monitoring,
and customization management for cloud engineers and DevOps teams.

Settings are resolved from command-line flags, then AFT_* environment variables,
then the config file ($HOME/.aft.yaml or ./.aft.yaml), then built-in defaults.

Examples:
  aft config show          Show current AFT configuration
  aft config path          Print the config file in use";

/// AWS Control Tower Account Factory for Terraform (AFT) CLI tool
#[derive(Parser)]
#[command(name = "aft")]
#[command(author, version, about, long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (default is $HOME/.aft.yaml)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// AWS profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// AWS region to use
    #[arg(short, long, global = true)]
    pub region: Option<String>,

    /// Output format: table, json, yaml [default: table]
    #[arg(short, long, value_name = "FORMAT", global = true)]
    pub output: Option<String>,

    /// Verbose output (`--verbose=false` overrides env and config file)
    #[arg(
        short,
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub verbose: Option<bool>,

    /// Quiet output (`--quiet=false` overrides env and config file)
    #[arg(
        short,
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub quiet: Option<bool>,
}

impl From<&GlobalArgs> for CliOverrides {
    fn from(args: &GlobalArgs) -> Self {
        CliOverrides {
            config: args.config.clone(),
            profile: args.profile.clone(),
            region: args.region.clone(),
            output: args.output.clone(),
            verbose: args.verbose,
            quiet: args.quiet,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the resolved AFT CLI configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let overrides = CliOverrides::from(&cli.global);
    let env = Env::from_system();
    let options = LoadOptions::from_system();

    let bootstrap = Bootstrap::new();
    let resolved = bootstrap.init(&overrides, &env, &options, &mut std::io::stderr())?;
    init_logging(resolved)?;

    let ctx = CommandContext::new(resolved);
    match command {
        Commands::Config(cmd) => config::run(cmd, &ctx),
        Commands::Completions(args) => completions::run(args),
    }
}

/// Wire the resolved verbosity to the tracing log level.
/// RUST_LOG in the environment always takes precedence.
fn init_logging(resolved: &ResolvedConfig) -> Result<()> {
    let level = if resolved.verbose()? {
        Level::DEBUG
    } else if resolved.quiet()? {
        Level::ERROR
    } else {
        Level::WARN
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    log_discovery(resolved);
    for (key, value) in resolved.iter() {
        match &value.value {
            Some(v) => tracing::debug!("{} = {} ({})", key, v, value.source),
            None => tracing::debug!("{} unset ({})", key, value.source),
        }
    }
    Ok(())
}

/// Discovery runs before the subscriber exists, so its trail is logged here.
fn log_discovery(resolved: &ResolvedConfig) {
    for candidate in resolved.probed() {
        tracing::debug!("Probed config candidate: {}", candidate.display());
    }
    match resolved.source() {
        ConfigSource::ExplicitPath(path) => {
            tracing::debug!("Using explicit config file: {}", path.display())
        }
        ConfigSource::SearchPath(path) => {
            tracing::debug!("Found config file on search path: {}", path.display())
        }
        ConfigSource::None => tracing::debug!("No config file found on search path"),
    }
}
