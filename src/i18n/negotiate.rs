//! `Accept-Language` negotiation.
//!
//! # Responsibilities
//! - Parse the header into weighted language ranges
//! - Pick the highest-weighted range whose primary subtag is supported
//! - Fall back to the first supported language when nothing matches
//!
//! # Design Decisions
//! - Matching is on the primary subtag only (`pt-BR` matches `pt`)
//! - Malformed ranges are skipped, never rejected
//! - Ranges with `q=0` are explicit refusals and are dropped

use crate::i18n::Language;

/// A single entry of an `Accept-Language` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageRange<'a> {
    /// The language tag as sent, e.g. `pt-PT` or `*`.
    pub tag: &'a str,
    /// Quality in thousandths (`q=0.9` → 900).
    pub quality: u16,
}

impl LanguageRange<'_> {
    /// Primary subtag (`pt` for `pt-PT`).
    pub fn primary(&self) -> &str {
        self.tag
            .split(['-', '_'])
            .next()
            .unwrap_or(self.tag)
    }
}

/// Parse a header value into ranges ordered by descending quality.
///
/// Ranges with equal quality keep their header order.
pub fn parse_accept_language(value: &str) -> Vec<LanguageRange<'_>> {
    let mut ranges: Vec<LanguageRange<'_>> = value
        .split(',')
        .filter_map(parse_range)
        .filter(|range| range.quality > 0)
        .collect();

    // Stable sort preserves header order among equal weights
    ranges.sort_by(|a, b| b.quality.cmp(&a.quality));
    ranges
}

fn parse_range(part: &str) -> Option<LanguageRange<'_>> {
    let mut params = part.split(';');
    let tag = params.next()?.trim();
    let valid_char = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '*');
    if tag.is_empty() || !tag.chars().all(valid_char) {
        return None;
    }

    let mut quality = 1000;
    for param in params {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("q") {
            quality = parse_quality(raw.trim())?;
        }
    }

    Some(LanguageRange { tag, quality })
}

fn parse_quality(raw: &str) -> Option<u16> {
    let q: f32 = raw.parse().ok()?;
    if !(0.0..=1.0).contains(&q) {
        return None;
    }
    Some((q * 1000.0).round() as u16)
}

/// Choose the best supported language for a header.
///
/// `supported` is ordered with the fallback first; the fallback is returned
/// when the header is absent, empty, malformed, or matches nothing.
pub fn negotiate(header: Option<&str>, supported: &[Language]) -> Language {
    let fallback = supported.first().copied().unwrap_or_default();
    let Some(header) = header else {
        return fallback;
    };

    parse_accept_language(header)
        .iter()
        .filter_map(|range| Language::from_code(range.primary()))
        .find(|lang| supported.contains(lang))
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_orders_by_quality() {
        let ranges = parse_accept_language("en;q=0.5, pt-PT, sv;q=0.8");
        let tags: Vec<&str> = ranges.iter().map(|r| r.tag).collect();
        assert_eq!(tags, vec!["pt-PT", "sv", "en"]);
        assert_eq!(ranges[0].quality, 1000);
        assert_eq!(ranges[2].quality, 500);
    }

    #[test]
    fn test_parse_skips_refusals_and_garbage() {
        let ranges = parse_accept_language("pt;q=0, ;q=0.3, sv;q=abc, <script>, en");
        let tags: Vec<&str> = ranges.iter().map(|r| r.tag).collect();
        assert_eq!(tags, vec!["en"]);
    }

    #[test]
    fn test_primary_subtag() {
        let range = LanguageRange { tag: "pt-BR", quality: 1000 };
        assert_eq!(range.primary(), "pt");
        let range = LanguageRange { tag: "sv_SE", quality: 1000 };
        assert_eq!(range.primary(), "sv");
    }

    #[test]
    fn test_negotiate_portuguese() {
        let lang = negotiate(Some("pt-PT,pt;q=0.9"), &Language::ALL);
        assert_eq!(lang, Language::Pt);
    }

    #[test]
    fn test_negotiate_prefers_higher_weight() {
        let lang = negotiate(Some("en;q=0.4, sv;q=0.7"), &Language::ALL);
        assert_eq!(lang, Language::Sv);
    }

    #[test]
    fn test_negotiate_skips_unsupported() {
        let lang = negotiate(Some("fr-FR, de;q=0.9, sv;q=0.1"), &Language::ALL);
        assert_eq!(lang, Language::Sv);
    }

    #[test]
    fn test_negotiate_falls_back() {
        assert_eq!(negotiate(Some("fr-FR"), &Language::ALL), Language::En);
        assert_eq!(negotiate(Some(""), &Language::ALL), Language::En);
        assert_eq!(negotiate(Some("*"), &Language::ALL), Language::En);
        assert_eq!(negotiate(None, &Language::ALL), Language::En);
    }
}
