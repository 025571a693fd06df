//! Request dispatch.
//!
//! # Responsibilities
//! - Store the ordered route table
//! - Decide where a request path goes
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Translation API is checked first so `/api/...` never renders a page
//! - Explicit `Asset` destination rather than a silent default handler

use crate::routing::matcher::{AnyMatcher, ExactPathMatcher, Matcher, PathPrefixMatcher};

/// Path prefix of the translation API.
pub const TRANSLATIONS_API_PREFIX: &str = "/api/translations";

/// Where a request is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// JSON translation dictionary.
    TranslationsApi,
    /// Language-resolved, hydrated HTML page.
    Page,
    /// Anything else: proxied (dev) or looked up on disk (prod).
    Asset,
}

impl Destination {
    /// Label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Destination::TranslationsApi => "translations_api",
            Destination::Page => "page",
            Destination::Asset => "asset",
        }
    }
}

/// Ordered route table.
#[derive(Debug)]
pub struct Dispatcher {
    routes: Vec<(Box<dyn Matcher>, Destination)>,
}

impl Dispatcher {
    /// Build a dispatcher from an explicit route table.
    pub fn new(routes: Vec<(Box<dyn Matcher>, Destination)>) -> Self {
        Self { routes }
    }

    /// Look up the destination for a path.
    pub fn dispatch(&self, path: &str) -> Destination {
        self.routes
            .iter()
            .find(|(matcher, _)| matcher.matches(path))
            .map(|(_, destination)| *destination)
            .unwrap_or(Destination::Asset)
    }
}

impl Default for Dispatcher {
    /// The site's route table: translation API, then localized pages.
    fn default() -> Self {
        let pages = AnyMatcher::new(vec![
            Box::new(ExactPathMatcher::new("/")),
            Box::new(ExactPathMatcher::new("/index.html")),
            Box::new(PathPrefixMatcher::new("/pt")),
            Box::new(PathPrefixMatcher::new("/sv")),
        ]);

        Self::new(vec![
            (
                Box::new(PathPrefixMatcher::new(TRANSLATIONS_API_PREFIX)) as Box<dyn Matcher>,
                Destination::TranslationsApi,
            ),
            (Box::new(pages) as Box<dyn Matcher>, Destination::Page),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_api() {
        let dispatcher = Dispatcher::default();
        assert_eq!(dispatcher.dispatch("/api/translations"), Destination::TranslationsApi);
        assert_eq!(dispatcher.dispatch("/api/translations/"), Destination::TranslationsApi);
    }

    #[test]
    fn test_pages() {
        let dispatcher = Dispatcher::default();
        for path in ["/", "/index.html", "/pt", "/pt/", "/sv/contact", "/ptfoo"] {
            assert_eq!(dispatcher.dispatch(path), Destination::Page, "{path}");
        }
    }

    #[test]
    fn test_everything_else_is_asset() {
        let dispatcher = Dispatcher::default();
        for path in ["/assets/index.js", "/favicon.ico", "/api/other", "/en/", "/index.htm"] {
            assert_eq!(dispatcher.dispatch(path), Destination::Asset, "{path}");
        }
    }
}
