//! The secrets map: variable name to typed scalar value.
//!
//! Built once per invocation by whoever loads environment files and handed to
//! the resolver by reference. The resolver never writes to it.

use super::error::ResolveError;
use serde_json::Value;
use std::collections::HashMap;

/// Variables available to `{{ .name }}` references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecretsMap {
    values: HashMap<String, Value>,
}

impl SecretsMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a secrets map from a JSON object of scalar values.
    ///
    /// # Errors
    ///
    /// `ResolveError::InvalidSecrets` if `value` is not an object or one of its
    /// members is an object or array.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_resolver::variables::secrets::SecretsMap;
    /// use serde_json::json;
    ///
    /// let secrets = SecretsMap::from_json(&json!({"age": 30, "name": "Ada"})).unwrap();
    /// assert_eq!(secrets.get("age"), Some(&json!(30)));
    ///
    /// assert!(SecretsMap::from_json(&json!({"nested": {"a": 1}})).is_err());
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, ResolveError> {
        let obj = value.as_object().ok_or_else(|| {
            ResolveError::InvalidSecrets("secrets must be a JSON object".to_string())
        })?;

        let mut secrets = Self::new();
        for (name, value) in obj {
            if value.is_object() || value.is_array() {
                return Err(ResolveError::InvalidSecrets(format!(
                    "secret '{}' must be a string, number, boolean or null",
                    name
                )));
            }
            secrets.values.insert(name.clone(), value.clone());
        }

        Ok(secrets)
    }

    /// Inserts or replaces a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

impl From<HashMap<String, String>> for SecretsMap {
    fn from(values: HashMap<String, String>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(name, value)| (name, Value::String(value)))
                .collect(),
        }
    }
}

impl FromIterator<(String, Value)> for SecretsMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
