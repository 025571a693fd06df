//! Language-aware server-side rendering gateway.
//!
//! Resolves each visitor's language, serves the frontend's `index.html` with
//! translations and metadata injected, and exposes the translation
//! dictionaries as JSON.

pub mod config;
pub mod document;
pub mod http;
pub mod hydrate;
pub mod i18n;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod translations;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::{Gateway, Shutdown};
