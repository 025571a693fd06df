//! Locales directory watcher for hot reload.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::translations::TranslationStore;

/// Reloads a [`TranslationStore`] whenever a file in its directory changes.
pub struct TranslationWatcher {
    path: PathBuf,
    store: Arc<TranslationStore>,
}

impl TranslationWatcher {
    /// Create a watcher for the store's locales directory.
    pub fn new(store: Arc<TranslationStore>) -> Self {
        Self {
            path: store.locales_dir().to_path_buf(),
            store,
        }
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let store = self.store.clone();

        let handler = move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                    tracing::info!(
                        paths = ?event.paths,
                        "Translation change detected, reloading..."
                    );
                    // Failures are logged by reload; the old dictionaries stay live
                    let _ = store.reload();
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        };

        let config = Config::default().with_poll_interval(Duration::from_secs(2));
        let mut watcher = RecommendedWatcher::new(handler, config)?;
        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Translation watcher started");
        Ok(watcher)
    }
}
