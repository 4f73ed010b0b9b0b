//! wstail server: relays bus-published log lines into rotated per-source
//! files and out to live WebSocket viewers.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

mod render;
mod ws;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use wstail_messaging::subject::Subject;
use wstail_messaging_nats::NatsSubject;
use wstail_relay::config::DEFAULT_CHANNEL_PREFIX;
use wstail_relay::writer::WriterRegistry;
use wstail_relay::{RelayConfig, file_relay};

/// Distributes bus-published log lines to disk and to live viewers.
#[derive(Debug, Parser)]
#[command(name = "wstail-server", version, about)]
struct Args {
    /// Directory all log files live under; must already exist.
    #[arg(long, env = "WSTAIL_LOG_DIR")]
    log_dir: PathBuf,

    /// Address the WebSocket listener binds.
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port the WebSocket listener binds.
    #[arg(long, default_value_t = 8756)]
    port: u16,

    /// Hostname of the bus server.
    #[arg(long, default_value = "localhost")]
    bus_host: String,

    /// Port of the bus server.
    #[arg(long, default_value_t = 4222)]
    bus_port: u16,

    /// Keyspace index on the bus, for transports that have one.
    #[arg(long)]
    bus_db: Option<u32>,

    /// Channel prefix log publishers use.
    #[arg(long, default_value = DEFAULT_CHANNEL_PREFIX)]
    channel: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    if !args.log_dir.is_dir() {
        anyhow::bail!("{} does not exist", args.log_dir.display());
    }
    if args.bus_db.is_some() {
        warn!("--bus-db has no NATS equivalent, ignoring it");
    }

    let client = async_nats::connect(format!("{}:{}", args.bus_host, args.bus_port)).await?;
    info!("connected to bus at {}:{}", args.bus_host, args.bus_port);

    let mut config = RelayConfig::new(args.log_dir);
    config.channel_prefix = args.channel;
    let prefix = NatsSubject::new(client, config.channel_prefix.clone())?;

    let registry = WriterRegistry::from_config(&config);
    let file_subscription = prefix.any().subscribe().await?;
    let mut file_relay_task = tokio::spawn(file_relay::run(file_subscription, registry));

    let state = ws::AppState {
        config,
        wildcard: prefix.any(),
    };
    let app = axum::Router::new()
        .route("/{*path}", axum::routing::get(ws::live_tail_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!("listening on {}", listener.local_addr()?);
    let server_task = tokio::spawn(async move { axum::serve(listener, app).await });

    tokio::select! {
        result = server_task => {
            result??;
            Ok(())
        }
        result = &mut file_relay_task => {
            // The file relay only returns once the bus is gone; that is
            // fatal, reconnection is a deployment concern.
            match result {
                Ok(Err(relay_error)) => Err(relay_error.into()),
                Ok(Ok(())) => Ok(()),
                Err(join_error) => Err(join_error.into()),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            file_relay_task.abort();
            Ok(())
        }
    }
}
