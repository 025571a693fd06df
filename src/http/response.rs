//! Response construction.
//!
//! # Responsibilities
//! - Hydrated HTML and redirect responses
//! - Map document errors to status codes
//!
//! # Design Decisions
//! - Live origin failures → 502, timeouts → 504, static read failures → 500
//! - Error bodies are fixed strings; details go to the log only

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::document::DocumentError;

/// A `text/html` response.
pub fn html(body: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], body).into_response()
}

/// A temporary (302 Found) redirect.
pub fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

impl IntoResponse for DocumentError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            DocumentError::Read { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "index.html not found")
            }
            DocumentError::Timeout { .. } => {
                (StatusCode::GATEWAY_TIMEOUT, "Frontend dev server timed out")
            }
            _ => (StatusCode::BAD_GATEWAY, "Failed to connect to frontend dev server"),
        };
        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_mapping() {
        let read = DocumentError::Read {
            path: PathBuf::from("dist/index.html"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(read.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let timeout = DocumentError::Timeout {
            url: "http://localhost:5173/".to_string(),
            secs: 10,
        };
        assert_eq!(timeout.into_response().status(), StatusCode::GATEWAY_TIMEOUT);

        let status = DocumentError::Status {
            url: "http://localhost:5173/".to_string(),
            status: StatusCode::NOT_FOUND,
        };
        assert_eq!(status.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_found() {
        let response = found("/pt/");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/pt/");
    }

    #[test]
    fn test_html_content_type() {
        let response = html(b"<html></html>".to_vec());
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    }
}
