//! Recipe unit converter server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request          ┌──────────────────────────────────────────────┐
//!     ────────────────────────┼─▶ http::server ─▶ http::handlers             │
//!                             │                    │                         │
//!                             │          GET ──────┤────── POST              │
//!                             │           │                 │                │
//!                             │      http::page      http::decode            │
//!                             │   (form, manifest)          │                │
//!                             │                    conversion::engine        │
//!                             │                             │                │
//!                             │                    conversion::client ───────┼──▶ External
//!                             │                             │                │    conversion
//!                             │                    conversion::classify      │    service
//!     Client Response         │                             │                │
//!     ◀───────────────────────┼──────────── JSON response ◀─┘                │
//!                             │                                              │
//!                             │  config · observability · lifecycle          │
//!                             └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use recipe_unit_converter::config::{load_config, ConverterConfig};
use recipe_unit_converter::http::HttpServer;
use recipe_unit_converter::lifecycle::{signals, Shutdown};
use recipe_unit_converter::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "recipe-unit-converter")]
#[command(about = "Converts recipe ingredients between metric and imperial units", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ConverterConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("recipe-unit-converter v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        upstream_timeout_secs = config.upstream.timeout_secs,
        max_concurrency = config.upstream.max_concurrency,
        request_timeout_secs = config.timeouts.request_secs,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        result = &mut server_task => {
            result??;
            return Ok(());
        }
        _ = signals::wait_for_signal() => shutdown.trigger(),
    }

    server_task.await??;
    tracing::info!("Shutdown complete");
    Ok(())
}
