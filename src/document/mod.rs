//! Base document and asset sources.
//!
//! # Data Flow
//! ```text
//! Page request
//!     → DocumentSource::fetch_document
//!         Live:   GET origin + path → retry origin root → bytes
//!         Static: read dist/index.html → bytes
//!
//! Residual asset request
//!     → DocumentSource::serve_asset
//!         Live:   stream through to the origin unchanged
//!         Static: sanitize path → regular file? serve : 404
//! ```
//!
//! # Design Decisions
//! - One capability, two variants; callers never inspect the run mode
//! - Base documents are never cached; every page request fetches fresh bytes
//! - Upstream failures carry enough context to pick a status code

pub mod live;
pub mod static_dir;

use std::path::PathBuf;

use axum::{
    body::{Body, Bytes},
    http::{Request, StatusCode},
    response::Response,
};
use thiserror::Error;

use crate::config::{GatewayConfig, Mode};

pub use live::LiveOrigin;
pub use static_dir::{sanitize_path, StaticDir};

/// Errors that can occur while obtaining a base document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The configured live origin is not a usable `http://` URL.
    #[error("invalid frontend origin: {0}")]
    InvalidOrigin(String),

    /// An upstream URI could not be built from the request path.
    #[error("invalid upstream uri: {0}")]
    InvalidUri(String),

    /// The live origin could not be reached.
    #[error("failed to reach {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    /// The live origin answered with a non-success status.
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    /// The live origin did not answer in time.
    #[error("{url} did not respond within {secs}s")]
    Timeout { url: String, secs: u64 },

    /// The live origin's response body could not be read.
    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: axum::Error,
    },

    /// The static document could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    /// Which source produced the error, for metrics labels.
    pub fn source_kind(&self) -> &'static str {
        match self {
            DocumentError::Read { .. } => "static",
            _ => "live",
        }
    }
}

/// Where base documents and residual assets come from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// A running frontend dev server.
    Live(LiveOrigin),
    /// A prebuilt asset directory.
    Static(StaticDir),
}

impl DocumentSource {
    /// Build the source selected by the configured mode.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, DocumentError> {
        match config.mode {
            Mode::Dev => Ok(DocumentSource::Live(LiveOrigin::new(
                &config.frontend.dev_origin,
                &config.timeouts,
            )?)),
            Mode::Prod => Ok(DocumentSource::Static(StaticDir::new(
                config.frontend.dist_dir.clone(),
                config.frontend.index_file.clone(),
            ))),
        }
    }

    /// Obtain the unmodified base document for a page path.
    pub async fn fetch_document(&self, path: &str) -> Result<Bytes, DocumentError> {
        match self {
            DocumentSource::Live(origin) => origin.fetch_document(path).await,
            DocumentSource::Static(dir) => dir.read_index().await,
        }
    }

    /// Answer a request that is neither a page nor the translation API.
    pub async fn serve_asset(&self, request: Request<Body>) -> Response {
        match self {
            DocumentSource::Live(origin) => origin.forward(request).await,
            DocumentSource::Static(dir) => dir.serve(request).await,
        }
    }
}
