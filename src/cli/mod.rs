//! Command-line interface for cwmrc
//!
//! Checks configuration files, prints the settings they produce and looks up
//! colour names.

use crate::{
    config::{default_config_path, directives::DIRECTIVES, ConfigParser, ParserOptions},
    models::{ColorTable, Settings, X11Colors},
    CwmrcError, Result,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// cwmrc command-line interface
#[derive(Parser)]
#[command(name = "cwmrc")]
#[command(about = "Parse and check cwm-style window manager configuration files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct CwmrcCli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable JSON output for machine-readable results
    #[arg(long, global = true)]
    pub json: bool,

    /// Reject quoted strings left open at end of file
    #[arg(long, global = true)]
    pub strict: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check a configuration file for errors (defaults to ~/.cwmrc)
    Check {
        /// Configuration file path
        file: Option<PathBuf>,
    },

    /// Print the settings a configuration file produces (defaults to ~/.cwmrc)
    Dump {
        /// Configuration file path
        file: Option<PathBuf>,
    },

    /// Resolve a colour name to its RGB value
    Color {
        /// Colour name, case-insensitive
        name: String,
    },

    /// List the recognised directives and their argument counts
    Directives,
}

/// CLI command executor
pub struct CwmrcCliExecutor<W: Write> {
    out: W,
    json_output: bool,
    options: ParserOptions,
}

impl<W: Write> CwmrcCliExecutor<W> {
    pub fn new(out: W, json_output: bool, strict: bool) -> Self {
        Self {
            out,
            json_output,
            options: ParserOptions {
                strict_quotes: strict,
            },
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Execute a CLI command
    pub fn execute(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Check { file } => self.execute_check(file),
            Commands::Dump { file } => self.execute_dump(file),
            Commands::Color { name } => self.execute_color(&name),
            Commands::Directives => self.execute_directives(),
        }
    }

    fn execute_check(&mut self, file: Option<PathBuf>) -> Result<()> {
        let path = resolve_path(file)?;
        info!("Checking configuration: {}", path.display());

        let mut parser = ConfigParser::new().options(self.options);
        let result = parser.parse_file(&path);
        let warnings = parser.get_warnings();

        match result {
            Ok(_) => {
                if self.json_output {
                    let warnings: Vec<_> = warnings
                        .iter()
                        .map(|w| serde_json::json!({ "line": w.line, "message": w.message }))
                        .collect();
                    let report = serde_json::json!({
                        "path": path.display().to_string(),
                        "valid": true,
                        "warnings": warnings,
                    });
                    writeln!(self.out, "{}", serde_json::to_string_pretty(&report)?)?;
                } else {
                    for warning in warnings {
                        writeln!(
                            self.out,
                            "{}:{}: warning: {}",
                            path.display(),
                            warning.line,
                            warning.message
                        )?;
                    }
                    writeln!(self.out, "{}: OK", path.display())?;
                }
                Ok(())
            }
            Err(failure) => {
                if self.json_output {
                    let report = serde_json::json!({
                        "path": path.display().to_string(),
                        "valid": false,
                        "line": failure.error.line(),
                        "error": failure.error.to_string(),
                    });
                    writeln!(self.out, "{}", serde_json::to_string_pretty(&report)?)?;
                }
                Err(failure.error)
                    .with_context(|| format!("{} is not a valid configuration", path.display()))
            }
        }
    }

    fn execute_dump(&mut self, file: Option<PathBuf>) -> Result<()> {
        let path = resolve_path(file)?;
        let settings = ConfigParser::new()
            .options(self.options)
            .parse_file(&path)
            .map_err(|failure| failure.error)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if self.json_output {
            writeln!(self.out, "{}", serde_json::to_string_pretty(&settings)?)?;
        } else {
            write_settings(&mut self.out, &settings)?;
        }
        Ok(())
    }

    fn execute_color(&mut self, name: &str) -> Result<()> {
        let rgb = X11Colors
            .resolve(name)
            .ok_or_else(|| CwmrcError::UnknownColor(name.to_string()))?;
        debug!("Resolved {} to {}", name, rgb);

        if self.json_output {
            let color = serde_json::json!({
                "name": name,
                "hex": rgb.to_string(),
                "red": rgb.red,
                "green": rgb.green,
                "blue": rgb.blue,
            });
            writeln!(self.out, "{}", serde_json::to_string_pretty(&color)?)?;
        } else {
            writeln!(self.out, "{} {}", name, rgb)?;
        }
        Ok(())
    }

    fn execute_directives(&mut self) -> Result<()> {
        if self.json_output {
            let table: Vec<_> = DIRECTIVES
                .iter()
                .map(|d| serde_json::json!({ "name": d.name, "arity": d.arity }))
                .collect();
            writeln!(self.out, "{}", serde_json::to_string_pretty(&table)?)?;
        } else {
            for directive in DIRECTIVES {
                writeln!(self.out, "{:<12} {}", directive.name, directive.arity)?;
            }
        }
        Ok(())
    }
}

fn resolve_path(file: Option<PathBuf>) -> Result<PathBuf> {
    file.or_else(default_config_path)
        .ok_or_else(|| CwmrcError::NoConfigPath.into())
}

/// Write settings one directive per line, sorted for stable output
fn write_settings<W: Write>(out: &mut W, settings: &Settings) -> std::io::Result<()> {
    writeln!(out, "borderwidth {}", settings.border_width)?;
    writeln!(out, "snapdist {}", settings.snap_distance)?;
    writeln!(out, "moveamount {}", settings.move_amount)?;
    writeln!(out, "sticky {}", if settings.sticky { "yes" } else { "no" })?;
    let gap = &settings.gap;
    writeln!(out, "gap {} {} {} {}", gap.top, gap.bottom, gap.left, gap.right)?;
    if !settings.font.is_empty() {
        writeln!(out, "fontname {:?}", settings.font)?;
    }

    let mut colors: Vec<_> = settings.colors.iter().collect();
    colors.sort_by(|a, b| a.0.cmp(b.0));
    for (slot, rgb) in colors {
        writeln!(out, "color {} {}", slot, rgb)?;
    }

    let mut commands: Vec<_> = settings.commands.iter().collect();
    commands.sort();
    for (name, command) in commands {
        writeln!(out, "command {} {:?}", name, command)?;
    }

    let mut autogroups: Vec<_> = settings
        .autogroups
        .iter()
        .map(|(client, group)| (client.to_string(), *group))
        .collect();
    autogroups.sort();
    for (client, group) in autogroups {
        writeln!(out, "autogroup {} {}", group, client)?;
    }

    let mut binds: Vec<_> = settings
        .binds
        .iter()
        .map(|(key, command)| (key.to_string(), command))
        .collect();
    binds.sort();
    for (key, command) in binds {
        writeln!(out, "bind {} {:?}", key, command)?;
    }

    let mut mouse_binds: Vec<_> = settings.mouse_binds.iter().collect();
    mouse_binds.sort_by(|a, b| a.0.cmp(b.0));
    for (command, key) in mouse_binds {
        writeln!(out, "mousebind {} {:?}", key, command)?;
    }

    for ignore in &settings.ignores {
        writeln!(out, "ignore {:?}", ignore)?;
    }
    Ok(())
}

/// Write a failed command's error chain as one line. Logged at debug level
/// only, so the default log level does not repeat it on stderr.
pub fn report_error<W: Write>(error: &anyhow::Error, mut err: W) -> std::io::Result<()> {
    debug!("Command failed: {:?}", error);
    writeln!(err, "cwmrc: {:#}", error)
}

/// Run a parsed command line, writing results to `out`
pub fn run_cli<W: Write>(cli: CwmrcCli, out: W) -> Result<W> {
    let mut executor = CwmrcCliExecutor::new(out, cli.json, cli.strict);
    executor.execute(cli.command)?;
    Ok(executor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = CwmrcCli::try_parse_from(["cwmrc", "check", "/tmp/cwmrc"]);
        assert!(cli.is_ok());

        match cli.unwrap().command {
            Commands::Check { file } => assert_eq!(file, Some(PathBuf::from("/tmp/cwmrc"))),
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = CwmrcCli::try_parse_from(["cwmrc", "--verbose", "--json", "dump", "--strict"]);
        assert!(cli.is_ok());

        let cli = cli.unwrap();
        assert!(cli.verbose);
        assert!(cli.json);
        assert!(cli.strict);
        assert!(matches!(cli.command, Commands::Dump { file: None }));
    }

    #[test]
    fn test_color_command() {
        let cli = CwmrcCli::try_parse_from(["cwmrc", "color", "Navy"]).unwrap();
        let out = run_cli(cli, Vec::new()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Navy #000080\n");

        let cli = CwmrcCli::try_parse_from(["cwmrc", "color", "notacolor"]).unwrap();
        assert!(run_cli(cli, Vec::new()).is_err());
    }

    #[test]
    fn test_directives_command() {
        let cli = CwmrcCli::try_parse_from(["cwmrc", "--json", "directives"]).unwrap();
        let out = run_cli(cli, Vec::new()).unwrap();
        let table: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(table.as_array().map(Vec::len), Some(12));
        assert_eq!(table[6]["name"], "gap");
        assert_eq!(table[6]["arity"], 4);
    }

    #[test]
    fn test_report_error_is_one_line() {
        let cli = CwmrcCli::try_parse_from(["cwmrc", "color", "notacolor"]).unwrap();
        let error = run_cli(cli, Vec::new()).unwrap_err();

        let mut err = Vec::new();
        report_error(&error, &mut err).unwrap();
        let text = String::from_utf8(err).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("cwmrc: "), "{text}");
        assert!(text.contains("notacolor"), "{text}");
    }

    #[test]
    fn test_write_settings_is_sorted() {
        let settings = crate::parse_str("bind C-b b\nbind C-a a\ncolor z red\ncolor a blue\n").unwrap();
        let mut out = Vec::new();
        write_settings(&mut out, &settings).unwrap();
        let text = String::from_utf8(out).unwrap();

        let a = text.find("bind Control-a").unwrap();
        let b = text.find("bind Control-b").unwrap();
        assert!(a < b);
        assert!(text.contains("color a #0000ff\ncolor z #ff0000\n"));
    }
}
