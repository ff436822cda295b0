//! Contact manager server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request       ┌──────────────────────────────────────────────┐
//!     ─────────────────────┼─▶ http::server ─▶ http::handlers ─▶ store ───┼──▶ SQLite
//!                          │   (layers)        (one op each)    (tx/op)   │    contacts
//!     ◀────────────────────┼── http::response ◀──────────────────┘        │
//!     Client Response      │                                              │
//!                          │   config · observability · lifecycle         │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use contact_manager::config::load_config;
use contact_manager::http::HttpServer;
use contact_manager::lifecycle::{signals, Shutdown};
use contact_manager::observability::{logging, metrics};
use contact_manager::store::{DatabaseLocation, SqliteContactStore};

#[derive(Parser)]
#[command(name = "contact-manager")]
#[command(about = "Contact management web backend", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    logging::init_tracing(&config.observability.log_level);

    tracing::info!("contact-manager v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database_url = %config.database.url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let location: DatabaseLocation = config.database.url.parse()?;
    let store = SqliteContactStore::open(
        &location,
        Duration::from_millis(config.database.busy_timeout_ms),
    )?;

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.signalled();
    tokio::spawn(async move {
        signals::wait_for_shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(&config, Arc::new(store));
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
