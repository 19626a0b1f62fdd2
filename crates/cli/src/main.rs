//! Backoffice CLI - authenticated access to the ERP admin API

mod commands;
mod logging;

use anyhow::Result;
use backoffice_core::{ClientSettings, StateDir};
use clap::{Parser, ValueEnum};
use commands::{Commands, Context};
use std::path::PathBuf;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "backoffice")]
#[command(about = "Command-line client for the backoffice ERP API")]
#[command(version)]
struct Cli {
    /// Set logging level (defaults to the configured level)
    #[arg(short = 'l', long, global = true)]
    log_level: Option<LogLevel>,

    /// Directory for session tokens, configuration and logs
    #[arg(short = 'd', long, global = true, env = "BACKOFFICE_STATE_DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file (TOML or YAML)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Backend API root, overrides the configuration
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds (0 = no timeout), overrides the configuration
    #[arg(short = 't', long, global = true)]
    timeout: Option<u64>,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let state_dir = match &cli.data_dir {
        Some(dir) => StateDir::with_override(dir),
        None => StateDir::new(),
    };

    let config_path = cli.config.clone().or_else(|| {
        let default = state_dir.config_path();
        default.exists().then_some(default)
    });
    let mut settings = ClientSettings::load(config_path.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
        settings.validate()?;
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout_secs = timeout;
    }

    let log_level = match cli.log_level {
        Some(level) => level.into(),
        None => settings.log_level.parse().unwrap_or(Level::INFO),
    };
    logging::init_logging(log_level, &state_dir.logs_dir(), cli.no_file_log)?;

    info!(base_url = %settings.base_url, "Starting backoffice CLI");

    let context = Context::new(settings, state_dir);
    match cli.command.execute(&context).await {
        Ok(()) => {
            info!("Command completed successfully");
        }
        Err(e) => {
            error!("Command failed: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "backoffice",
            "get",
            "/shop/products/",
            "--base-url",
            "http://erp.test/api",
            "-l",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://erp.test/api"));
        assert!(matches!(cli.log_level, Some(LogLevel::Debug)));
        assert!(matches!(cli.command, Commands::Get { .. }));
    }
}
