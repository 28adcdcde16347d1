//! bit-router server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum::serve ─▶ request id / trace / timeout layers
//!                                         │
//!                                         ▼
//!                                   http::Router::dispatch
//!                                         │
//!                       ┌─────────────────┼──────────────────┐
//!                       ▼                 ▼                  ▼
//!                 matched handler    404 not found    405 / OPTIONS + Allow
//!                       │
//!                       ▼
//!                 routing::RouteTable (segment → match → rank → params)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use bit_router::config::{build_router, load_config, RouterConfig};
use bit_router::http::HttpServer;
use bit_router::lifecycle::Shutdown;
use bit_router::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "bit-router")]
#[command(about = "HTTP router serving routes declared in a TOML file", long_about = None)]
struct Args {
    /// Configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("bit-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_segments = config.routing.max_segments,
        request_timeout_secs = config.timeouts.request_secs,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let router = build_router(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, router);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
