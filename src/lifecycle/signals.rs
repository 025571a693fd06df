//! OS signal handling.
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers a translation reload, not shutdown
//! - Reloads run on the blocking pool; they read files synchronously

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::translations::TranslationStore;

/// Wait for Ctrl+C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Reload translations every time the process receives SIGHUP.
#[cfg(unix)]
pub fn spawn_reload_on_hangup(store: Arc<TranslationStore>) -> Option<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Failed to install SIGHUP handler; reload on signal disabled"
            );
            return None;
        }
    };

    Some(tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            tracing::info!("SIGHUP received, reloading translations");
            let store = store.clone();
            // reload() logs its own outcome
            if let Err(e) = tokio::task::spawn_blocking(move || store.reload()).await {
                tracing::error!(error = %e, "Translation reload task failed");
            }
        }
    }))
}

#[cfg(not(unix))]
pub fn spawn_reload_on_hangup(_store: Arc<TranslationStore>) -> Option<JoinHandle<()>> {
    None
}
