//! SSR Gateway (v1)
//!
//! Serves a single-page frontend with per-request language resolution and
//! state hydration.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────────┐
//!                         │                     SSR GATEWAY                      │
//!                         │                                                      │
//!     Client Request      │  ┌─────────┐    ┌──────────┐                         │
//!     ────────────────────┼─▶│  http   │───▶│ routing  │                         │
//!                         │  │ server  │    │ dispatch │                         │
//!                         │  └─────────┘    └────┬─────┘                         │
//!                         │        ┌─────────────┼───────────────┐               │
//!                         │        ▼             ▼               ▼               │
//!                         │  ┌──────────┐  ┌──────────┐   ┌─────────────┐        │
//!                         │  │   i18n   │  │translat- │   │  document   │◀───────┼── dev server
//!                         │  │ resolver │  │ ions API │   │   source    │        │   or dist/
//!                         │  └────┬─────┘  └────┬─────┘   └──────┬──────┘        │
//!                         │       ▼             │                │ (assets)      │
//!                         │  ┌──────────┐       │                │               │
//!     Client Response     │  │ hydrate  │◀──────┴── translation ─┘               │
//!     ◀───────────────────┼──│          │           store                        │
//!                         │  └──────────┘                                        │
//!                         └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;

use ssr_gateway::config::Cli;
use ssr_gateway::observability::{logging, metrics};
use ssr_gateway::{Gateway, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve()?;

    logging::init(&config.observability);

    tracing::info!("ssr-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        mode = ?config.mode,
        bind_address = %config.listener.bind_address,
        locales_dir = %config.translations.locales_dir.display(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let gateway = Gateway::start(config).await?;
    tracing::info!(address = %gateway.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    gateway.run(shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
