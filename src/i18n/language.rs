//! Supported language codes.

use std::fmt;

/// A language the site is translated into.
///
/// The set is closed. `En` is the default and the fallback for every miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    En,
    Pt,
    Sv,
}

impl Language {
    /// All supported languages, fallback first.
    pub const ALL: [Language; 3] = [Language::En, Language::Pt, Language::Sv];

    /// Two-letter code used for dictionary lookup and the `lang` attribute.
    pub const fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pt => "pt",
            Language::Sv => "sv",
        }
    }

    /// Landing page for this language.
    pub const fn home_path(self) -> &'static str {
        match self {
            Language::En => "/",
            Language::Pt => "/pt/",
            Language::Sv => "/sv/",
        }
    }

    /// Look up a language by its primary subtag (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
