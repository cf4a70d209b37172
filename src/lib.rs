//! cwmrc - parser for cwm-style window manager configuration files
//!
//! Reads a line-oriented configuration language (key and mouse bindings,
//! colours, gaps, autogroups, command aliases) into a validated
//! [`Settings`] value that a window manager can consume.

pub mod cli;
pub mod config;
pub mod logging;
pub mod models;

pub use config::{parse_str, ConfigParseError, ConfigParser, ParseFailure};
pub use models::*;

/// Result type alias for cwmrc operations
pub type Result<T> = anyhow::Result<T>;

/// Error types for the command line front end
#[derive(thiserror::Error, Debug)]
pub enum CwmrcError {
    #[error("No configuration file given and no home directory found")]
    NoConfigPath,

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Unknown color: {0}")]
    UnknownColor(String),
}
