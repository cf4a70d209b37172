//! cwmrc - check and inspect cwm-style window manager configuration files

use clap::Parser;
use cwmrc::{
    cli::{report_error, run_cli, CwmrcCli},
    logging::{init_logging, LogConfig, LogLevel},
    CwmrcError, Result,
};

fn main() -> Result<()> {
    let cli = CwmrcCli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    init_logging(&log_config)
        .map_err(|e| CwmrcError::ConfigurationError(format!("Failed to initialize logging: {}", e)))?;

    if let Err(e) = run_cli(cli, std::io::stdout().lock()) {
        report_error(&e, std::io::stderr().lock())?;
        std::process::exit(1);
    }

    Ok(())
}
