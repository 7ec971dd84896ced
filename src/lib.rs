//! Placeholder resolution for templated HTTP request documents
//!
//! A request is described as a JSON-like document whose string values may
//! embed two kinds of placeholders:
//!
//! - `{{ .name }}` reads `name` from a secrets map built from environment files
//! - `{{ getValueOf "key" "source" }}` reads `key` from a response saved by an
//!   earlier request
//!
//! Substitution is textual, so every resolved value first becomes a string.
//! A value that was *only* a placeholder then gets its original type back, so
//! `{"age": "{{.age}}"}` with `age = 30` resolves to `{"age": 30}` while
//! `"I am {{.age}}"` stays a string.
//!
//! # Architecture
//!
//! - **variables**: classification, path discovery, substitution, path
//!   mutation and type restoration
//! - **responses**: directory-backed store of saved responses implementing
//!   `getValueOf`
//! - **config**: resolver settings
//! - **resolver**: runs substitution then restoration over one document
//!
//! # Usage
//!
//! ```
//! use request_resolver::responses::ResponseStore;
//! use request_resolver::variables::SecretsMap;
//! use request_resolver::Resolver;
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = ResponseStore::new(dir.path());
//! store.persist("user_response.json", &json!({"active": false})).unwrap();
//!
//! let secrets = SecretsMap::from_json(&json!({"id": "abc-1", "limit": 25})).unwrap();
//! let before = json!({
//!     "user": {"id": "{{.id}}"},
//!     "limit": "{{ .limit }}",
//!     "flag": "{{getValueOf 'active' 'user_response.json'}}"
//! });
//!
//! let resolution = Resolver::new(&secrets, &store).resolve(&before).unwrap();
//! assert_eq!(
//!     resolution.document,
//!     json!({"user": {"id": "abc-1"}, "limit": 25, "flag": false})
//! );
//! ```

pub mod config;
pub mod resolver;
pub mod responses;
pub mod variables;

pub use config::{load_config, ResolverConfig};
pub use resolver::{resolve_document, Resolution, Resolver};
pub use variables::{LookupError, ResolveError, SecretsMap, ValueLookup};
