//! Prebuilt asset directory (prod mode).

use std::path::PathBuf;

use axum::{
    body::{Body, Bytes},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::document::DocumentError;

/// A directory holding the built frontend: `index.html` plus assets.
#[derive(Debug, Clone)]
pub struct StaticDir {
    root: PathBuf,
    index_file: String,
}

impl StaticDir {
    pub fn new(root: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            index_file: index_file.into(),
        }
    }

    /// Read the base document.
    pub async fn read_index(&self) -> Result<Bytes, DocumentError> {
        let path = self.root.join(&self.index_file);
        tokio::fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|source| DocumentError::Read { path, source })
    }

    /// Map a request path to a regular file inside the root, if one exists.
    pub async fn resolve_asset(&self, request_path: &str) -> Option<PathBuf> {
        let candidate = self.root.join(sanitize_path(request_path)?);
        match tokio::fs::metadata(&candidate).await {
            Ok(meta) if meta.is_file() => Some(candidate),
            _ => None,
        }
    }

    /// Serve a residual asset, or 404. There is no SPA fallback.
    pub async fn serve(&self, request: Request<Body>) -> Response {
        let Some(path) = self.resolve_asset(request.uri().path()).await else {
            tracing::debug!(path = %request.uri().path(), "Asset not found");
            return (StatusCode::NOT_FOUND, "404 page not found").into_response();
        };

        match ServeFile::new(path).oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        }
    }
}

/// Turn a URL path into a relative filesystem path that cannot leave the root.
///
/// The path is percent-decoded, `.` segments are dropped and `..` pops the
/// previous segment without ever going above the root. Returns `None` for
/// paths that are not valid UTF-8 or contain separators or drive markers a
/// URL segment should never carry.
pub fn sanitize_path(request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8().ok()?;

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains(['\\', '\0', ':']) => return None,
            s => segments.push(s),
        }
    }

    Some(segments.iter().collect())
}
