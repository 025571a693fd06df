//! Translation file discovery and parsing.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::translations::{Dictionary, TranslationError};

/// Load every `*.json` file in `dir`, keyed by file stem.
///
/// Directories and files with other extensions are skipped. The first
/// unreadable or unparsable file aborts the whole load.
pub fn load_dir(dir: &Path) -> Result<HashMap<String, Arc<Dictionary>>, TranslationError> {
    let entries = fs::read_dir(dir).map_err(|source| TranslationError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut dictionaries = HashMap::new();
    for entry in entries {
        let entry = entry.map_err(|source| TranslationError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(code) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::warn!(path = %path.display(), "Skipping translation file with non UTF-8 name");
            continue;
        };
        let code = code.to_string();

        let dictionary = load_file(&path)?;
        tracing::debug!(lang = %code, keys = dictionary.len(), "Parsed translation file");
        dictionaries.insert(code, Arc::new(dictionary));
    }

    Ok(dictionaries)
}

/// Read and parse a single translation file.
pub fn load_file(path: &Path) -> Result<Dictionary, TranslationError> {
    let content = fs::read_to_string(path).map_err(|source| TranslationError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|source| TranslationError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(TranslationError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}
