use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use smsrelayd::bootstrap::Server;
use smsrelayd::config::Config;
use smsrelayd::telemetry::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "smsrelayd")]
#[command(author, version, about = "Filtering SMS relay with multi-channel fan-out")]
struct Args {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Validate config and exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (to get log settings)
    let config = Config::load(&args.config)?;

    init_tracing(&config.telemetry)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        "starting smsrelayd"
    );

    info!(
        relay_enabled = config.relay.enabled,
        resend = config.channels.resend.enabled,
        telegram = config.channels.telegram.enabled,
        whatsapp = config.channels.whatsapp.enabled,
        "configuration loaded"
    );

    // Validate only mode
    if args.validate {
        info!("configuration is valid");
        return Ok(());
    }

    // Create and run server
    let server = Server::new(config, args.config)?;
    server.run().await?;

    Ok(())
}
