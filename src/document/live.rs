//! Live frontend origin (dev mode).
//!
//! # Responsibilities
//! - Fetch the base document for a page path, retrying the origin root once
//! - Stream residual asset requests to the origin unchanged
//!
//! # Design Decisions
//! - Every outbound call has a deadline (`timeouts.upstream_secs`)
//! - Hop-by-hop headers are stripped in both directions
//! - Only scheme, host and port of the origin URL are used

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{
        header::{self, HeaderMap, HeaderName, HeaderValue},
        uri::{Authority, Scheme},
        Request, StatusCode, Uri, Version,
    },
    response::{IntoResponse, Response},
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use url::Url;

use crate::config::TimeoutConfig;
use crate::document::DocumentError;
use crate::observability::metrics;

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// A frontend dev server reachable over plain HTTP.
#[derive(Clone)]
pub struct LiveOrigin {
    origin: Url,
    authority: Authority,
    client: Client<HttpConnector, Body>,
    upstream_timeout: Duration,
}

impl fmt::Debug for LiveOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveOrigin")
            .field("origin", &self.origin.as_str())
            .field("upstream_timeout", &self.upstream_timeout)
            .finish()
    }
}

impl LiveOrigin {
    /// Create a client for the origin at `origin` (e.g. `http://localhost:5173`).
    pub fn new(origin: &str, timeouts: &TimeoutConfig) -> Result<Self, DocumentError> {
        let url = Url::parse(origin)
            .map_err(|e| DocumentError::InvalidOrigin(format!("{origin}: {e}")))?;
        if url.scheme() != "http" {
            return Err(DocumentError::InvalidOrigin(format!("{origin}: only http is supported")));
        }
        let host = url
            .host_str()
            .ok_or_else(|| DocumentError::InvalidOrigin(format!("{origin}: missing host")))?;
        let port = url.port_or_known_default().unwrap_or(80);
        let authority = Authority::from_str(&format!("{host}:{port}"))
            .map_err(|e| DocumentError::InvalidOrigin(format!("{origin}: {e}")))?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            origin: url,
            authority,
            client,
            upstream_timeout: Duration::from_secs(timeouts.upstream_secs),
        })
    }

    /// Fetch the document at `path`, falling back to the origin root.
    ///
    /// Dev servers with history fallback answer unknown paths with the SPA
    /// template, but not all do; the root always serves it.
    pub async fn fetch_document(&self, path: &str) -> Result<Bytes, DocumentError> {
        match self.get(path).await {
            Ok(body) => Ok(body),
            Err(e) => {
                tracing::warn!(
                    path = %path,
                    error = %e,
                    "Document fetch failed, retrying origin root"
                );
                self.get("/").await
            }
        }
    }

    async fn get(&self, path: &str) -> Result<Bytes, DocumentError> {
        let uri = self.uri_for(path)?;
        let url = uri.to_string();
        let request = Request::get(uri)
            .header(header::HOST, self.authority.as_str())
            .body(Body::empty())
            .map_err(|e| DocumentError::InvalidUri(e.to_string()))?;

        let exchange = {
            let url = url.clone();
            let client = self.client.clone();
            async move {
                let response = client
                    .request(request)
                    .await
                    .map_err(|source| DocumentError::Unreachable { url: url.clone(), source })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(DocumentError::Status { url, status });
                }

                axum::body::to_bytes(Body::new(response.into_body()), usize::MAX)
                    .await
                    .map_err(|source| DocumentError::Body { url, source })
            }
        };

        match tokio::time::timeout(self.upstream_timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(DocumentError::Timeout {
                url,
                secs: self.upstream_timeout.as_secs(),
            }),
        }
    }

    /// Pass a request through to the origin and stream the answer back.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let (mut parts, body) = request.into_parts();
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        let uri = match self.uri_for(path_and_query) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!(error = %e, "Cannot build upstream uri");
                return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
            }
        };

        strip_hop_by_hop(&mut parts.headers);
        if let Ok(host) = HeaderValue::from_str(self.authority.as_str()) {
            parts.headers.insert(header::HOST, host);
        }
        parts.uri = uri;
        parts.version = Version::HTTP_11;

        let request = Request::from_parts(parts, body);
        match tokio::time::timeout(self.upstream_timeout, self.client.request(request)).await {
            Ok(Ok(response)) => relay(response),
            Ok(Err(e)) => {
                tracing::error!(origin = %self.origin, error = %e, "Upstream error");
                metrics::record_document_fetch_failure("live");
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
            Err(_) => {
                tracing::error!(origin = %self.origin, "Upstream timed out");
                metrics::record_document_fetch_failure("live");
                (StatusCode::GATEWAY_TIMEOUT, "Upstream request timed out").into_response()
            }
        }
    }

    fn uri_for(&self, path_and_query: &str) -> Result<Uri, DocumentError> {
        Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(|e| DocumentError::InvalidUri(e.to_string()))
    }
}

/// Convert an origin response into ours, streaming the body.
fn relay(response: hyper::Response<Incoming>) -> Response {
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}

/// Remove connection-scoped headers, including any the `Connection` header
/// itself names.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();
    for name in named {
        headers.remove(name);
    }

    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}
