//! Request language resolution.
//!
//! # Responsibilities
//! - Map `/pt*` and `/sv*` paths to their language
//! - Redirect root visitors whose browser prefers a translated site
//! - Default everything else to English
//!
//! # Design Decisions
//! - Prefix matching is loose: `/ptfoo` resolves to `pt`
//! - Redirects are temporary (302) so a later preference change still applies
//! - Pure function, no I/O

use crate::i18n::negotiate::negotiate;
use crate::i18n::Language;

/// Outcome of resolving a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Send the visitor elsewhere with a temporary redirect.
    Redirect(&'static str),
    /// Render the page in this language.
    Render(Language),
}

/// Resolve the language for a page request.
pub fn resolve(path: &str, accept_language: Option<&str>) -> Resolution {
    if path.starts_with("/pt") {
        return Resolution::Render(Language::Pt);
    }
    if path.starts_with("/sv") {
        return Resolution::Render(Language::Sv);
    }

    if path == "/" || path == "/index.html" {
        match negotiate(accept_language, &Language::ALL) {
            Language::En => {}
            preferred => return Resolution::Redirect(preferred.home_path()),
        }
    }

    Resolution::Render(Language::En)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_wins_over_header() {
        assert_eq!(resolve("/pt/", Some("sv")), Resolution::Render(Language::Pt));
        assert_eq!(resolve("/pt", None), Resolution::Render(Language::Pt));
        assert_eq!(resolve("/sv/about", Some("pt")), Resolution::Render(Language::Sv));
    }

    #[test]
    fn test_loose_prefix() {
        assert_eq!(resolve("/ptfoo", None), Resolution::Render(Language::Pt));
        assert_eq!(resolve("/svelte", Some("en")), Resolution::Render(Language::Sv));
    }

    #[test]
    fn test_root_redirects() {
        assert_eq!(resolve("/", Some("pt-PT,pt;q=0.9")), Resolution::Redirect("/pt/"));
        assert_eq!(resolve("/index.html", Some("sv-SE")), Resolution::Redirect("/sv/"));
    }

    #[test]
    fn test_root_falls_back_to_english() {
        assert_eq!(resolve("/", Some("fr-FR")), Resolution::Render(Language::En));
        assert_eq!(resolve("/", Some("en-US,pt;q=0.5")), Resolution::Render(Language::En));
        assert_eq!(resolve("/", None), Resolution::Render(Language::En));
    }

    #[test]
    fn test_header_ignored_off_root() {
        assert_eq!(resolve("/about", Some("pt")), Resolution::Render(Language::En));
        assert_eq!(resolve("/index.htm", Some("sv")), Resolution::Render(Language::En));
    }
}
