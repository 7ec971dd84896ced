//! Persisted response documents.
//!
//! A `ResponseStore` keeps response bodies as JSON files in one directory,
//! keyed by a relative file name. It backs `{{ getValueOf "key" "source" }}`:
//! `source` names the file and `key` is looked up inside its parsed body.
//!
//! # Example
//!
//! ```no_run
//! use request_resolver::responses::ResponseStore;
//! use request_resolver::variables::ValueLookup;
//! use serde_json::json;
//!
//! let store = ResponseStore::new("/path/to/responses");
//! store.persist("login.json", &json!({"token": "abc"})).unwrap();
//!
//! let token = store.get_value_of("token", "login.json").unwrap();
//! assert_eq!(token, json!("abc"));
//! ```

use crate::variables::error::LookupError;
use crate::variables::lookup::{lookup_key_path, ValueLookup};
use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Extension tried when a source has none and the bare name is missing.
const DEFAULT_EXTENSION: &str = "json";

/// Directory-backed store of response documents.
///
/// Parsed documents are cached per store, keyed by the file they were read
/// from, so `login` and `login.json` share one entry. Clones share the cache,
/// so one store can serve many concurrent resolutions.
///
/// The cache is unbounded and holds every document loaded or persisted until
/// `clear_cache` is called. Long-lived stores that touch many sources should
/// clear it between runs.
#[derive(Debug, Clone)]
pub struct ResponseStore {
    dir: PathBuf,
    cache: Arc<RwLock<HashMap<PathBuf, Value>>>,
}

impl ResponseStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// `persist`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `document` as pretty JSON under `source`.
    ///
    /// # Errors
    ///
    /// `InvalidSource` for absolute or escaping names, `Io` if the file cannot
    /// be written.
    pub fn persist(&self, source: &str, document: &Value) -> Result<PathBuf, LookupError> {
        let path = self.source_path(source)?;
        let io_error = |err: io::Error| LookupError::Io {
            source: source.to_string(),
            message: err.to_string(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(document).map_err(|e| LookupError::Io {
            source: source.to_string(),
            message: e.to_string(),
        })?;
        fs::write(&path, json).map_err(io_error)?;

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(path.clone(), document.clone());
        }

        debug!("persisted response '{}' to {}", source, path.display());
        Ok(path)
    }

    /// Loads and parses the document stored under `source`.
    ///
    /// # Errors
    ///
    /// `MissingSource` when no file exists (the producing request was probably
    /// never run), `InvalidDocument` for malformed JSON, `Io` for read errors.
    pub fn load(&self, source: &str) -> Result<Value, LookupError> {
        let path = self.find_source_file(source)?;
        if let Some(document) = self.cache.read().ok().and_then(|c| c.get(&path).cloned()) {
            return Ok(document);
        }

        let content = fs::read_to_string(&path).map_err(|e| LookupError::Io {
            source: source.to_string(),
            message: e.to_string(),
        })?;

        let document: Value =
            serde_json::from_str(&content).map_err(|e| LookupError::InvalidDocument {
                source: source.to_string(),
                message: e.to_string(),
            })?;

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(path.clone(), document.clone());
        }

        debug!("loaded response '{}' from {}", source, path.display());
        Ok(document)
    }

    /// Drops every cached document; the next `load` reads from disk.
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    /// Resolves `source` to an existing file, trying `<source>.json` when the
    /// name has no extension.
    fn find_source_file(&self, source: &str) -> Result<PathBuf, LookupError> {
        let path = self.source_path(source)?;
        if path.is_file() {
            return Ok(path);
        }

        if path.extension().is_none() {
            let with_extension = path.with_extension(DEFAULT_EXTENSION);
            if with_extension.is_file() {
                return Ok(with_extension);
            }
        }

        Err(LookupError::MissingSource {
            source: source.to_string(),
        })
    }

    fn source_path(&self, source: &str) -> Result<PathBuf, LookupError> {
        let relative = Path::new(source.trim());
        let is_plain = !source.trim().is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

        if !is_plain {
            return Err(LookupError::InvalidSource(source.to_string()));
        }

        Ok(self.dir.join(relative))
    }
}

impl ValueLookup for ResponseStore {
    fn get_value_of(&self, key: &str, source: &str) -> Result<Value, LookupError> {
        let document = self.load(source)?;
        lookup_key_path(&document, key, source)
    }
}
