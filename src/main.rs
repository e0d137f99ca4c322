//! Attribution Reporting ad-tech demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌───────────────────────────────────────────────┐
//!                          │                ADTECH SERVER                  │
//!   Browser request        │  ┌──────────┐   ┌─────────┐   ┌────────────┐  │
//!   ───────────────────────┼─▶│ request  │──▶│ cookies │──▶│  handlers  │  │
//!                          │  │ id/trace │   │ issue   │   │ ads / reg  │  │
//!                          │  └──────────┘   └─────────┘   │ / reports  │  │
//!                          │                               └─────┬──────┘  │
//!                          │                                     │         │
//!                          │            ┌────────────────┐       │         │
//!                          │            │  measurement   │◀──────┤         │
//!                          │            │ header builder │       │         │
//!                          │            └────────────────┘       ▼         │
//!                          │                              ┌────────────┐   │
//!                          │                              │ report log │   │
//!                          │                              └────────────┘   │
//!                          │  config · observability · lifecycle           │
//!                          └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use adtech_server::config::{load_config, load_from_env};
use adtech_server::lifecycle::signals::wait_for_signal;
use adtech_server::observability::{logging, metrics};
use adtech_server::{AdtechServer, Shutdown};

#[derive(Parser)]
#[command(name = "adtech-server")]
#[command(about = "Attribution Reporting ad-tech demo server", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults plus environment when omitted.
    #[arg(short, long, env = "ADTECH_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("adtech-server v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        adtech_url = %config.origins.adtech_url,
        advertiser_url = %config.origins.advertiser_url,
        report_capacity = config.reports.capacity,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    AdtechServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
