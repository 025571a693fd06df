//! Translation dictionaries.
//!
//! # Data Flow
//! ```text
//! locales/*.json
//!     → loader.rs (enumerate, read, parse; all or nothing)
//!     → store.rs (atomic snapshot swap)
//!     → handlers and hydrator read snapshots concurrently
//!
//! On reload (SIGHUP or watcher.rs):
//!     loader.rs runs again
//!     → success: new snapshot swapped in
//!     → failure: previous snapshot kept
//! ```
//!
//! # Design Decisions
//! - Readers never take a lock; they load an `Arc` snapshot
//! - Writers are serialized so two reloads never interleave
//! - No implicit fallback in `get`; callers choose `get_or_default`

pub mod loader;
pub mod store;
pub mod watcher;

use std::path::PathBuf;
use thiserror::Error;

pub use store::{Dictionary, TranslationStore, DEFAULT_LANGUAGE};
pub use watcher::TranslationWatcher;

/// Errors raised while loading or looking up translations.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// The locales directory could not be enumerated.
    #[error("failed to read locales directory {}: {source}", dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A translation file could not be read.
    #[error("failed to read file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A translation file is not valid JSON.
    #[error("failed to parse json {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A translation file is valid JSON but not an object.
    #[error("translation file {} must contain a JSON object", path.display())]
    NotAnObject { path: PathBuf },

    /// The mandatory default dictionary is missing after a load.
    #[error("no `en` dictionary found in {}", dir.display())]
    MissingDefault { dir: PathBuf },

    /// No dictionary is loaded under the requested code.
    #[error("translations not found for language: {0}")]
    NotFound(String),
}
