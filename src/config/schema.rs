//! Configuration schema for the request resolver.
//!
//! Defines the tunable settings and their validation.

use crate::variables::paths::DEFAULT_PATH_SEPARATOR;
use crate::variables::substitution::DEFAULT_MAX_SUBSTITUTION_ROUNDS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error returned when a configuration fails validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid configuration: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Settings for one resolver.
///
/// Read from the `"resolver"` key of a settings object. Missing settings fall
/// back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Maximum re-substitution rounds per string before the value is treated
    /// as a cyclic definition. Defaults to 10.
    ///
    /// Must be at least 1.
    #[serde(default = "default_max_substitution_rounds")]
    pub max_substitution_rounds: usize,

    /// Separator between keys when paths are rendered for diagnostics.
    /// Defaults to `" -> "`.
    #[serde(default = "default_path_separator")]
    pub path_separator: String,

    /// Whether whole-value placeholders get their original type back after
    /// substitution. Defaults to true.
    #[serde(default = "default_restore_types")]
    pub restore_types: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_substitution_rounds: default_max_substitution_rounds(),
            path_separator: default_path_separator(),
            restore_types: default_restore_types(),
        }
    }
}

impl ResolverConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` describing the first
    /// invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_substitution_rounds == 0 {
            return Err(ConfigError(
                "maxSubstitutionRounds must be greater than 0".to_string(),
            ));
        }

        if self.path_separator.is_empty() {
            return Err(ConfigError("pathSeparator must not be empty".to_string()));
        }

        Ok(())
    }
}

// Default value functions for serde

fn default_max_substitution_rounds() -> usize {
    DEFAULT_MAX_SUBSTITUTION_ROUNDS
}

fn default_path_separator() -> String {
    DEFAULT_PATH_SEPARATOR.to_string()
}

fn default_restore_types() -> bool {
    true
}
