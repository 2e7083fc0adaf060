//! `aft config` subcommands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use std::io::{self, Write};

use crate::bootstrap::CommandContext;
use crate::config::ResolvedConfig;
use crate::domain::OutputFormat;

const UNSET: &str = "-";

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show every resolved setting and where it came from
    Show,

    /// Print the path of the config file in use, if any
    Path,
}

pub fn run(command: ConfigCommand, ctx: &CommandContext<'_>) -> Result<()> {
    let mut out = io::stdout().lock();
    match command {
        ConfigCommand::Show => show(ctx, &mut out),
        ConfigCommand::Path => {
            if let Some(path) = ctx.config_file() {
                writeln!(out, "{}", path.display())?;
            }
            Ok(())
        }
    }
}

fn show<W: Write>(ctx: &CommandContext<'_>, out: &mut W) -> Result<()> {
    let format = ctx.output_format()?;
    let report = ConfigReport::from_resolved(ctx.config());
    match format {
        OutputFormat::Table => write!(out, "{}", render_table(&report))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
        OutputFormat::Yaml => write!(out, "{}", serde_yaml::to_string(&report)?)?,
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ConfigReport {
    config_file: Option<String>,
    options: Vec<OptionEntry>,
}

#[derive(Debug, Serialize)]
struct OptionEntry {
    key: &'static str,
    value: Option<String>,
    source: String,
}

impl ConfigReport {
    fn from_resolved(resolved: &ResolvedConfig) -> Self {
        let options = resolved
            .iter()
            .map(|(key, resolved_value)| OptionEntry {
                key: key.name(),
                value: resolved_value.value.as_ref().map(ToString::to_string),
                source: resolved_value.source.to_string(),
            })
            .collect();
        Self {
            config_file: resolved.config_file().map(|p| p.display().to_string()),
            options,
        }
    }
}

fn render_table(report: &ConfigReport) -> String {
    let rows: Vec<[&str; 3]> = report
        .options
        .iter()
        .map(|o| [o.key, o.value.as_deref().unwrap_or(UNSET), o.source.as_str()])
        .collect();

    let header = ["KEY", "VALUE", "SOURCE"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut table = String::new();
    for row in std::iter::once(header).chain(rows) {
        let line = format!("{:<w0$}  {:<w1$}  {}", row[0], row[1], row[2], w0 = widths[0], w1 = widths[1]);
        table.push_str(line.trim_end());
        table.push('\n');
    }
    table
}
