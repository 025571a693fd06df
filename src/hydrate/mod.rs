//! HTML hydration.
//!
//! # Data Flow
//! ```text
//! (Language, path)
//!     → TranslationStore::get_or_default (missing language → en)
//!     → serialize dictionary to compact JSON
//!     → DocumentSource::fetch_document (only failure point)
//!     → inject lang attribute → inject state script → inject title
//!     → final HTML
//! ```
//!
//! # Design Decisions
//! - String anchors instead of an HTML parser; the document shape is known
//! - Every injection is best effort: a missing anchor skips that step
//! - Output depends only on (language, dictionary, base document)

pub mod anchors;

use std::sync::Arc;

use serde_json::Value;

use crate::document::{DocumentError, DocumentSource};
use crate::i18n::Language;
use crate::observability::metrics;
use crate::translations::{Dictionary, TranslationStore};

use self::anchors::{find_span, insert_before, replace_first, splice};

/// Global the frontend reads its initial state from.
pub const STATE_GLOBAL: &str = "window.__INITIAL_STATE__";

/// Dictionary key whose string value becomes the page title.
pub const TITLE_KEY: &str = "hero_title";

const HTML_TAG_EN: &[u8] = b"<html lang=\"en\">";
const HTML_TAG_BARE: &[u8] = b"<html>";
const HEAD_CLOSE: &[u8] = b"</head>";
const TITLE_OPEN: &str = "<title>";
const TITLE_CLOSE: &str = "</title>";

/// Produces hydrated pages from translations and a document source.
#[derive(Debug, Clone)]
pub struct Hydrator {
    store: Arc<TranslationStore>,
    source: Arc<DocumentSource>,
}

impl Hydrator {
    pub fn new(store: Arc<TranslationStore>, source: Arc<DocumentSource>) -> Self {
        Self { store, source }
    }

    /// Render the page at `path` in `lang`.
    ///
    /// Only obtaining the base document can fail. The document is treated as
    /// bytes; nothing outside the injected spans is re-encoded.
    pub async fn render(&self, lang: Language, path: &str) -> Result<Vec<u8>, DocumentError> {
        let dictionary = self.store.get_or_default(lang.code());
        let state = serialize_state(&dictionary);

        let base = match self.source.fetch_document(path).await {
            Ok(base) => base,
            Err(e) => {
                metrics::record_document_fetch_failure(e.source_kind());
                return Err(e);
            }
        };

        Ok(hydrate_document(&base, lang, &dictionary, &state))
    }
}

/// Apply all injections to a base document.
pub fn hydrate_document(
    document: &[u8],
    lang: Language,
    dictionary: &Dictionary,
    state: &str,
) -> Vec<u8> {
    let html = inject_lang(document, lang);
    let html = inject_state(&html, state);
    inject_title(&html, dictionary)
}

/// Compact JSON for the state script.
///
/// `</` is written as `<\/` so a value can never close the script element.
pub fn serialize_state(dictionary: &Dictionary) -> String {
    match serde_json::to_string(dictionary) {
        Ok(json) => json.replace("</", "<\\/"),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize translations, injecting empty state");
            "{}".to_string()
        }
    }
}

/// Set the `lang` attribute on the opening `<html>` tag.
///
/// Rewrites the first `<html lang="en">`, else the first bare `<html>`, else
/// nothing.
pub fn inject_lang(document: &[u8], lang: Language) -> Vec<u8> {
    let tag = format!("<html lang=\"{}\">", lang.code());
    replace_first(document, HTML_TAG_EN, tag.as_bytes())
        .or_else(|| replace_first(document, HTML_TAG_BARE, tag.as_bytes()))
        .unwrap_or_else(|| document.to_vec())
}

/// The `<script>` element assigning `state` to [`STATE_GLOBAL`].
pub fn state_script(state: &str) -> String {
    format!("<script>{STATE_GLOBAL} = {state};</script>")
}

/// Insert the state script before `</head>`, or append it if there is none.
pub fn inject_state(document: &[u8], state: &str) -> Vec<u8> {
    let script = state_script(state);
    insert_before(document, HEAD_CLOSE, script.as_bytes()).unwrap_or_else(|| {
        let mut html = Vec::with_capacity(document.len() + script.len());
        html.extend_from_slice(document);
        html.extend_from_slice(script.as_bytes());
        html
    })
}

/// Replace the first `<title>…</title>` with the dictionary's hero title.
pub fn inject_title(document: &[u8], dictionary: &Dictionary) -> Vec<u8> {
    let Some(title) = dictionary.get(TITLE_KEY).and_then(Value::as_str) else {
        return document.to_vec();
    };
    let Some(span) = find_span(document, TITLE_OPEN.as_bytes(), TITLE_CLOSE.as_bytes()) else {
        return document.to_vec();
    };
    let element = format!("{TITLE_OPEN}{}{TITLE_CLOSE}", escape_text(title));
    splice(document, span, element.as_bytes())
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StaticDir;
    use std::fs;
    use tempfile::tempdir;

    const BASE: &str = "<!doctype html><html lang=\"en\"><head><meta charset=\"UTF-8\">\
                        <title>Old</title></head><body><div id=\"root\"></div></body></html>";

    fn dict(json: &str) -> Dictionary {
        serde_json::from_str(json).unwrap()
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_full_injection() {
        let dictionary = dict(r#"{"hero_title":"Novo"}"#);
        let state = serialize_state(&dictionary);
        let html = text(hydrate_document(BASE.as_bytes(), Language::Pt, &dictionary, &state));

        assert_eq!(
            html,
            "<!doctype html><html lang=\"pt\"><head><meta charset=\"UTF-8\"><title>Novo</title>\
             <script>window.__INITIAL_STATE__ = {\"hero_title\":\"Novo\"};</script></head>\
             <body><div id=\"root\"></div></body></html>"
        );
        assert_eq!(html.matches("<html lang=\"pt\">").count(), 1);
    }

    #[test]
    fn test_lang_falls_back_to_bare_html() {
        let html = inject_lang(b"<html><head></head></html>", Language::Sv);
        assert_eq!(html, b"<html lang=\"sv\"><head></head></html>");
    }

    #[test]
    fn test_lang_replaces_at_most_once() {
        let html = inject_lang(b"<html lang=\"en\"><html>", Language::Pt);
        assert_eq!(html, b"<html lang=\"pt\"><html>");
    }

    #[test]
    fn test_lang_leaves_other_tags_alone() {
        let doc = b"<html lang=\"en-US\" class=\"dark\"><head></head></html>";
        assert_eq!(inject_lang(doc, Language::Pt), doc);
    }

    #[test]
    fn test_state_appended_without_head() {
        let html = text(inject_state(b"<html><body></body></html>", "{}"));
        assert_eq!(
            html,
            "<html><body></body></html><script>window.__INITIAL_STATE__ = {};</script>"
        );
    }

    #[test]
    fn test_title_skipped_when_missing() {
        let doc = b"<head><title>Keep</title></head>";
        assert_eq!(inject_title(doc, &dict(r#"{"other":"x"}"#)), doc);
        assert_eq!(inject_title(doc, &dict(r#"{"hero_title":{"nested":"x"}}"#)), doc);
        assert_eq!(
            inject_title(b"<head></head>", &dict(r#"{"hero_title":"New"}"#)),
            b"<head></head>"
        );
    }

    #[test]
    fn test_title_is_escaped() {
        let html = inject_title(b"<title>a</title>", &dict(r#"{"hero_title":"Fish & <Chips>"}"#));
        assert_eq!(text(html), "<title>Fish &amp; &lt;Chips&gt;</title>");
    }

    #[test]
    fn test_state_cannot_close_script() {
        let state = serialize_state(&dict(r#"{"x":"</script><script>alert(1)</script>"}"#));
        assert!(!state.contains("</"));
        let value: Value = serde_json::from_str(&state).unwrap();
        assert_eq!(value["x"], "</script><script>alert(1)</script>");
    }

    #[test]
    fn test_hydration_is_deterministic() {
        let dictionary = dict(r#"{"b":1,"a":{"z":"y"},"hero_title":"T"}"#);
        let state = serialize_state(&dictionary);
        let first = hydrate_document(BASE.as_bytes(), Language::Sv, &dictionary, &state);
        let second = hydrate_document(BASE.as_bytes(), Language::Sv, &dictionary, &state);
        assert_eq!(first, second);
    }

    #[test]
    fn test_latin1_bytes_pass_through() {
        let base = b"<html lang=\"en\"><head><title>Old</title></head><body>caf\xE9</body></html>";
        let dictionary = dict(r#"{"hero_title":"Olá"}"#);
        let state = serialize_state(&dictionary);
        let html = hydrate_document(base, Language::Pt, &dictionary, &state);

        assert!(html.ends_with(b"<body>caf\xE9</body></html>"));
        assert!(html.starts_with("<html lang=\"pt\"><head><title>Olá</title>".as_bytes()));
    }

    #[tokio::test]
    async fn test_render_falls_back_to_english() {
        let locales = tempdir().unwrap();
        fs::write(locales.path().join("en.json"), r#"{"hero_title":"Hello"}"#).unwrap();
        let dist = tempdir().unwrap();
        fs::write(dist.path().join("index.html"), BASE).unwrap();

        let store = Arc::new(TranslationStore::open(locales.path()).unwrap());
        let source = Arc::new(DocumentSource::Static(StaticDir::new(dist.path(), "index.html")));
        let hydrator = Hydrator::new(store, source);

        let html = text(hydrator.render(Language::Sv, "/sv/").await.unwrap());
        assert!(html.contains("<html lang=\"sv\">"));
        assert!(html.contains("<title>Hello</title>"));
        assert!(html.contains("window.__INITIAL_STATE__ = {\"hero_title\":\"Hello\"};"));
    }

    #[tokio::test]
    async fn test_render_keeps_non_utf8_document_bytes() {
        let locales = tempdir().unwrap();
        fs::write(locales.path().join("en.json"), "{}").unwrap();
        let dist = tempdir().unwrap();
        let base: &[u8] = b"<html><head></head><body>caf\xE9</body></html>";
        fs::write(dist.path().join("index.html"), base).unwrap();

        let store = Arc::new(TranslationStore::open(locales.path()).unwrap());
        let source = Arc::new(DocumentSource::Static(StaticDir::new(dist.path(), "index.html")));
        let hydrator = Hydrator::new(store, source);

        let html = hydrator.render(Language::En, "/").await.unwrap();
        assert!(html.ends_with(b"<body>caf\xE9</body></html>"));
        assert!(!html.windows(3).any(|w| w == "\u{FFFD}".as_bytes()));
    }

    #[tokio::test]
    async fn test_render_fails_without_document() {
        let locales = tempdir().unwrap();
        fs::write(locales.path().join("en.json"), "{}").unwrap();
        let dist = tempdir().unwrap();

        let store = Arc::new(TranslationStore::open(locales.path()).unwrap());
        let source = Arc::new(DocumentSource::Static(StaticDir::new(dist.path(), "index.html")));
        let hydrator = Hydrator::new(store, source);

        let err = hydrator.render(Language::En, "/").await.unwrap_err();
        assert!(matches!(err, DocumentError::Read { .. }));
    }
}
