//! In-memory translation cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use serde_json::{Map, Value};

use crate::observability::metrics;
use crate::translations::{loader, TranslationError};

/// A parsed translation dictionary: string keys to arbitrary JSON values.
pub type Dictionary = Map<String, Value>;

/// Code of the dictionary every lookup miss falls back to.
pub const DEFAULT_LANGUAGE: &str = "en";

type Snapshot = HashMap<String, Arc<Dictionary>>;

/// Process-wide translation cache.
///
/// Reads load the current snapshot without locking. A load builds a complete
/// new snapshot off to the side and swaps it in, so readers see either the old
/// map or the new one, never a mix.
#[derive(Debug)]
pub struct TranslationStore {
    locales_dir: PathBuf,
    snapshot: ArcSwap<Snapshot>,
    writer: Mutex<()>,
}

impl TranslationStore {
    /// Create an empty store reading from `locales_dir`.
    pub fn new(locales_dir: impl Into<PathBuf>) -> Self {
        Self {
            locales_dir: locales_dir.into(),
            snapshot: ArcSwap::from_pointee(HashMap::new()),
            writer: Mutex::new(()),
        }
    }

    /// Create a store and load it, failing if the initial load fails.
    pub fn open(locales_dir: impl Into<PathBuf>) -> Result<Self, TranslationError> {
        let store = Self::new(locales_dir);
        store.load()?;
        Ok(store)
    }

    /// Directory the store loads from.
    pub fn locales_dir(&self) -> &Path {
        &self.locales_dir
    }

    /// Load every dictionary and replace the cache.
    ///
    /// Returns the number of dictionaries loaded. On error the cache is left
    /// untouched.
    pub fn load(&self) -> Result<usize, TranslationError> {
        let _guard = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let dictionaries = loader::load_dir(&self.locales_dir)?;
        if !dictionaries.contains_key(DEFAULT_LANGUAGE) {
            return Err(TranslationError::MissingDefault {
                dir: self.locales_dir.clone(),
            });
        }

        let count = dictionaries.len();
        self.snapshot.store(Arc::new(dictionaries));
        Ok(count)
    }

    /// Reload from disk, keeping the current cache if the load fails.
    pub fn reload(&self) -> Result<usize, TranslationError> {
        match self.load() {
            Ok(count) => {
                tracing::info!(
                    dictionaries = count,
                    dir = %self.locales_dir.display(),
                    "Translations reloaded"
                );
                metrics::record_translation_reload("success");
                Ok(count)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Failed to reload translations. Keeping current dictionaries."
                );
                metrics::record_translation_reload("failure");
                Err(e)
            }
        }
    }

    /// Dictionary for the exact language code.
    pub fn get(&self, lang: &str) -> Result<Arc<Dictionary>, TranslationError> {
        self.snapshot
            .load()
            .get(lang)
            .cloned()
            .ok_or_else(|| TranslationError::NotFound(lang.to_string()))
    }

    /// Dictionary for `lang`, or the `en` dictionary when it is missing.
    ///
    /// Only an empty, never-loaded store yields an empty dictionary.
    pub fn get_or_default(&self, lang: &str) -> Arc<Dictionary> {
        match self.get(lang) {
            Ok(dictionary) => dictionary,
            Err(e) => {
                tracing::warn!(lang = %lang, error = %e, "Falling back to default translations");
                metrics::record_translation_fallback(lang);
                self.get(DEFAULT_LANGUAGE).unwrap_or_default()
            }
        }
    }

    /// Codes of all loaded dictionaries, sorted.
    pub fn languages(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.snapshot.load().keys().cloned().collect();
        codes.sort();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_locales(dir: &Path) {
        fs::write(dir.join("en.json"), r#"{"hero_title":"Hello","nav":{"home":"Home"}}"#).unwrap();
        fs::write(dir.join("pt.json"), r#"{"hero_title":"Olá"}"#).unwrap();
    }

    #[test]
    fn test_get_exact_dictionary() {
        let dir = tempdir().unwrap();
        write_locales(dir.path());
        let store = TranslationStore::open(dir.path()).unwrap();

        let en = store.get("en").unwrap();
        let expected: Dictionary =
            serde_json::from_str(r#"{"hero_title":"Hello","nav":{"home":"Home"}}"#).unwrap();
        assert_eq!(*en, expected);
        assert_eq!(store.languages(), vec!["en", "pt"]);
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let dir = tempdir().unwrap();
        write_locales(dir.path());
        let store = TranslationStore::open(dir.path()).unwrap();

        let err = store.get("xx").unwrap_err();
        assert!(matches!(err, TranslationError::NotFound(ref code) if code == "xx"));
    }

    #[test]
    fn test_get_or_default_falls_back_to_english() {
        let dir = tempdir().unwrap();
        write_locales(dir.path());
        let store = TranslationStore::open(dir.path()).unwrap();

        assert_eq!(store.get_or_default("sv")["hero_title"], "Hello");
        assert_eq!(store.get_or_default("pt")["hero_title"], "Olá");
    }

    #[test]
    fn test_empty_store_default_is_empty() {
        let store = TranslationStore::new("/nonexistent");
        assert!(store.get_or_default("en").is_empty());
    }

    #[test]
    fn test_missing_english_fails_load() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("pt.json"), "{}").unwrap();

        let err = TranslationStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, TranslationError::MissingDefault { .. }));
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let dir = tempdir().unwrap();
        write_locales(dir.path());
        let store = TranslationStore::open(dir.path()).unwrap();

        fs::write(dir.path().join("pt.json"), "{ broken").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.get("pt").unwrap()["hero_title"], "Olá");

        fs::write(dir.path().join("pt.json"), r#"{"hero_title":"Novo"}"#).unwrap();
        assert_eq!(store.reload().unwrap(), 2);
        assert_eq!(store.get("pt").unwrap()["hero_title"], "Novo");
    }

    #[test]
    fn test_concurrent_reads_during_reload() {
        let dir = tempdir().unwrap();
        write_locales(dir.path());
        let store = Arc::new(TranslationStore::open(dir.path()).unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let en = store.get("en").unwrap();
                        assert_eq!(en["hero_title"], "Hello");
                    }
                })
            })
            .collect();

        for _ in 0..20 {
            store.reload().unwrap();
        }
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
