//! Integration tests module for the request resolver
//!
//! Common fixtures shared by the resolution and response-chaining tests.

pub mod chaining_test;
pub mod resolution_test;

use request_resolver::responses::ResponseStore;
use request_resolver::SecretsMap;
use serde_json::Value;
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize test environment (run once)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Builds a secrets map from a JSON object literal.
pub fn secrets_from(value: Value) -> SecretsMap {
    SecretsMap::from_json(&value).expect("test secrets must be a flat object")
}

/// Creates a response store in a fresh temporary directory.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn temp_store() -> (TempDir, ResponseStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = ResponseStore::new(temp_dir.path());
    (temp_dir, store)
}
