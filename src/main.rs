use anyhow::Result;
use clap::Parser;
use talent_ai::cli::{handle_command, Cli};
use talent_ai::config::AppConfig;
use talent_ai::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration picks the log file, so it is read before logging exists
    let config = AppConfig::load(&cli.config)?;
    init_tracing(config.settings.log_file.as_deref())?;
    config.log_summary();

    handle_command(cli, config).await
}
