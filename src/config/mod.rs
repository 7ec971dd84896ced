//! Configuration loading for the request resolver.
//!
//! Settings are read from the `"resolver"` key of a JSON settings object and
//! merged over the defaults. The result is a plain value handed to each
//! `Resolver`; there is no process-wide configuration.

pub mod schema;

pub use schema::{ConfigError, ResolverConfig};

use log::warn;
use serde_json::Value;

/// Settings key holding resolver configuration.
pub const SETTINGS_KEY: &str = "resolver";

/// Loads configuration from a settings object.
///
/// Unparseable resolver settings are reported and replaced by the defaults;
/// settings that parse but fail validation are an error.
///
/// # Example
///
/// ```
/// use request_resolver::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "resolver": {
///         "maxSubstitutionRounds": 5,
///         "restoreTypes": false
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.max_substitution_rounds, 5);
/// assert!(!config.restore_types);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<ResolverConfig, ConfigError> {
    let mut config = ResolverConfig::default();

    if let Some(settings) = settings_json {
        if let Some(resolver_settings) = settings.get(SETTINGS_KEY) {
            match serde_json::from_value::<ResolverConfig>(resolver_settings.clone()) {
                Ok(user_config) => config = user_config,
                Err(e) => {
                    warn!(
                        "Failed to parse resolver settings: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    config.validate()?;
    Ok(config)
}
