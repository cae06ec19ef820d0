//! Main entry point for the `roadrw` command.

use clap::Parser;
use roadrw_cli::{AppContext, Cli, Settings, execute, startup};
use tracing::{Level, debug};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.global)?;

    let logging_config = startup::LoggingConfig::from_env();
    let mut logging_guard = startup::init_logging(&logging_config)?;
    if settings.debug_mode {
        logging_guard.raise_console_level(Level::INFO)?;
    }

    debug!(data_dir = %settings.data_dir.display(), "Settings loaded");

    let context = AppContext::bootstrap(&settings)?;
    // A persisted configuration may turn debug mode on after startup.
    if context.manager().get_config().debug_mode {
        logging_guard.raise_console_level(Level::INFO)?;
    }
    let output = execute(cli.command, &context).await?;
    println!("{}", output);

    Ok(())
}
