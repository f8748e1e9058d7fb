use clap::Parser;
use hooktrap::api::ApiServer;
use hooktrap::config::Config;
use hooktrap::context::RelayContext;
use hooktrap::ingest::IngestServer;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "hooktrap", about = "Webhook capture-and-replay relay")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "HOOKTRAP_CONFIG")]
    config: Option<PathBuf>,

    /// Override the ingest listener address
    #[arg(long)]
    ingest_addr: Option<SocketAddr>,

    /// Override the dashboard API listener address
    #[arg(long)]
    api_addr: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(addr) = args.ingest_addr {
        config.listen.ingest = addr;
    }
    if let Some(addr) = args.api_addr {
        config.listen.api = addr;
    }
    config.validate()?;

    if config.replay.allow_private_targets {
        warn!("Replay SSRF guard DISABLED for private targets (development/testing only)");
    }
    if config.auth.tokens.is_empty() {
        warn!("No API tokens configured; the dashboard API will reject every caller");
    }

    let ctx = RelayContext::from_config(&config);

    let ingest = IngestServer::new(config.listen.ingest, ctx.clone());
    let api = ApiServer::new(config.listen.api, ctx);

    tokio::select! {
        result = ingest.run() => result,
        result = api.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
            Ok(())
        }
    }
}
