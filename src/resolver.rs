//! Full resolution of a request document.
//!
//! Combines substitution and type restoration:
//!
//! 1. every placeholder is substituted as text; any failure aborts the document
//! 2. whole-value placeholders get their original type back
//!
//! A `Resolver` owns no mutable state, so independent documents can be resolved
//! concurrently, each with its own secrets map.

use crate::config::ResolverConfig;
use crate::variables::error::ResolveError;
use crate::variables::lookup::ValueLookup;
use crate::variables::paths::{find_paths, PathList};
use crate::variables::restore::restore_paths;
use crate::variables::secrets::SecretsMap;
use crate::variables::substitution::Substitutor;
use log::debug;
use serde_json::Value;

/// A resolved document and the placeholder paths found in its source.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub document: Value,
    pub paths: PathList,
    /// Number of leaves whose type was restored.
    pub retyped: usize,
}

impl Resolution {
    /// Recorded paths rendered with `separator`, dot references first.
    pub fn describe_paths(&self, separator: &str) -> Vec<String> {
        self.paths
            .iter()
            .map(|located| located.path.display_with(separator))
            .collect()
    }
}

/// Resolves request documents against one secrets map and one lookup.
pub struct Resolver<'a> {
    config: ResolverConfig,
    secrets: &'a SecretsMap,
    lookup: &'a dyn ValueLookup,
}

impl<'a> Resolver<'a> {
    pub fn new(secrets: &'a SecretsMap, lookup: &'a dyn ValueLookup) -> Self {
        Self::with_config(ResolverConfig::default(), secrets, lookup)
    }

    pub fn with_config(
        config: ResolverConfig,
        secrets: &'a SecretsMap,
        lookup: &'a dyn ValueLookup,
    ) -> Self {
        Self {
            config,
            secrets,
            lookup,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves `before` into a ready-to-encode document.
    ///
    /// # Errors
    ///
    /// `UnresolvedVariable`, `CyclicSubstitution` or `LookupFailure`; no
    /// partially resolved document is returned.
    pub fn resolve(&self, before: &Value) -> Result<Resolution, ResolveError> {
        let mut document = Substitutor::new(self.secrets, self.lookup)
            .with_max_rounds(self.config.max_substitution_rounds)
            .substitute(before)?;

        let paths = find_paths(before);
        debug!("found {} whole-value placeholder(s)", paths.len());

        let retyped = if self.config.restore_types {
            restore_paths(&paths, &mut document, self.secrets, self.lookup)?
        } else {
            0
        };

        Ok(Resolution {
            document,
            paths,
            retyped,
        })
    }
}

/// Resolves `before` with the default configuration and returns the document.
///
/// # Examples
///
/// ```
/// use request_resolver::resolve_document;
/// use request_resolver::variables::{NoLookup, SecretsMap};
/// use serde_json::json;
///
/// let mut secrets = SecretsMap::new();
/// secrets.insert("age", 30);
///
/// let before = json!({"age": "{{.age}}", "bio": "I am {{.age}} years old"});
/// let after = resolve_document(&before, &secrets, &NoLookup).unwrap();
///
/// assert_eq!(after, json!({"age": 30, "bio": "I am 30 years old"}));
/// ```
pub fn resolve_document(
    before: &Value,
    secrets: &SecretsMap,
    lookup: &dyn ValueLookup,
) -> Result<Value, ResolveError> {
    Resolver::new(secrets, lookup)
        .resolve(before)
        .map(|resolution| resolution.document)
}
