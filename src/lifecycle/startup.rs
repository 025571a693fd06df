//! Startup orchestration.
//!
//! # Responsibilities
//! - Load translations; any failure is fatal
//! - Build the document source for the configured mode
//! - Start background tasks (watcher, SIGHUP reload)
//! - Bind the listener and begin accepting traffic

use std::net::SocketAddr;
use std::sync::Arc;

use notify::RecommendedWatcher;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{GatewayConfig, Mode};
use crate::document::DocumentError;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::translations::{TranslationError, TranslationStore, TranslationWatcher};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to load translations: {0}")]
    Translations(#[from] TranslationError),

    #[error("Failed to configure frontend source: {0}")]
    Document(#[from] DocumentError),

    #[error("Failed to watch locales directory: {0}")]
    Watch(#[from] notify::Error),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// A fully initialised gateway, bound but not yet serving.
pub struct Gateway {
    server: HttpServer,
    listener: TcpListener,
    store: Arc<TranslationStore>,
    watcher: Option<RecommendedWatcher>,
}

impl Gateway {
    /// Initialise every subsystem in order and bind the listener.
    pub async fn start(config: GatewayConfig) -> Result<Self, StartupError> {
        let store = Arc::new(TranslationStore::open(&config.translations.locales_dir)?);
        tracing::info!(
            languages = ?store.languages(),
            dir = %config.translations.locales_dir.display(),
            "Translations loaded successfully"
        );

        let watcher = if config.translations.watch {
            Some(TranslationWatcher::new(store.clone()).run()?)
        } else {
            None
        };

        match config.mode {
            Mode::Dev => tracing::info!(
                origin = %config.frontend.dev_origin,
                "Running in DEV MODE - proxying assets to the frontend dev server"
            ),
            Mode::Prod => tracing::info!(
                dist_dir = %config.frontend.dist_dir.display(),
                "Running in PRODUCTION MODE - serving static files"
            ),
        }

        let address = config.listener.bind_address.clone();
        let server = HttpServer::new(config, store.clone())?;
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| StartupError::Bind { address, source })?;

        Ok(Self {
            server,
            listener,
            store,
            watcher,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until `shutdown` is triggered.
    pub async fn run(self, shutdown: Shutdown) -> std::io::Result<()> {
        let _watcher = self.watcher;
        let reload_task = signals::spawn_reload_on_hangup(self.store.clone());

        let result = self.server.run(self.listener, shutdown).await;

        if let Some(task) = reload_task {
            task.abort();
        }
        result
    }
}
