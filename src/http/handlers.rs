//! Request handlers.
//!
//! Every request enters through [`dispatch`], which asks the routing table
//! where it belongs and hands it to the page, translation API or asset path.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    response::{IntoResponse, Response},
    Json,
};
use url::form_urlencoded;

use crate::http::request::request_id;
use crate::http::response;
use crate::http::server::AppState;
use crate::i18n::{resolve, Resolution};
use crate::observability::metrics;
use crate::routing::Destination;
use crate::translations::DEFAULT_LANGUAGE;

/// Entry point for every request.
pub async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let destination = state.dispatcher.dispatch(request.uri().path());

    tracing::debug!(
        request_id = %request_id(request.headers()),
        method = %request.method(),
        path = %request.uri().path(),
        destination = destination.as_str(),
        "Dispatching request"
    );

    let response = match destination {
        Destination::TranslationsApi => translations(&state, request.uri().query()),
        Destination::Page => {
            let path = request.uri().path().to_string();
            let accept_language = request
                .headers()
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            page(&state, &path, accept_language.as_deref()).await
        }
        Destination::Asset => state.source.serve_asset(request).await,
    };

    metrics::record_request(destination.as_str(), response.status().as_u16(), start_time);
    response
}

/// Resolve the language and serve the hydrated page, or redirect.
pub async fn page(state: &AppState, path: &str, accept_language: Option<&str>) -> Response {
    match resolve(path, accept_language) {
        Resolution::Redirect(location) => {
            tracing::debug!(
                path = %path,
                location = %location,
                "Redirecting to preferred language"
            );
            response::found(location)
        }
        Resolution::Render(lang) => match state.hydrator.render(lang, path).await {
            Ok(html) => response::html(html),
            Err(e) => {
                tracing::error!(
                    path = %path,
                    lang = %lang,
                    error = %e,
                    "Failed to obtain base document"
                );
                e.into_response()
            }
        },
    }
}

/// Translation dictionary for `?lang=`, falling back to `en`.
pub fn translations(state: &AppState, query: Option<&str>) -> Response {
    let lang = query
        .and_then(|q| {
            form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "lang")
                .map(|(_, value)| value.into_owned())
        })
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    let dictionary = state.store.get_or_default(&lang);
    Json(dictionary.as_ref()).into_response()
}
