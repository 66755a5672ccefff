// ABOUTME: Entry point for plastic-slack-relay binary.
// ABOUTME: Sets up logging, loads config, and serves the notification endpoints.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use plastic_log::LogFormat;

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "plastic-slack-relay")]
#[command(about = "Relays Plastic SCM change-list notifications into threaded Slack messages")]
struct Cli {
    /// Config file path
    #[arg(short, long, env = "PLASTIC_RELAY_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Log level for relay crates (RUST_LOG adds further directives)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "text")]
    log_format: Format,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = match cli.log_format {
        Format::Text => LogFormat::Text,
        Format::Json => LogFormat::Json,
    };
    plastic_log::init(
        &["plastic_slack_rs", "plastic_relay_core"],
        &cli.log_level,
        format,
    );

    let config = plastic_slack_rs::Config::load(cli.config)?;
    plastic_slack_rs::run(config).await
}
