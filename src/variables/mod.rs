//! Variables module for the request resolver
//!
//! This module resolves `{{ .name }}` and `{{ getValueOf "key" "source" }}`
//! placeholders inside a request document and restores the original type of
//! every value that was a whole-value placeholder.

pub mod error;
pub mod lookup;
pub mod mutator;
pub mod paths;
pub mod placeholder;
pub mod restore;
pub mod secrets;
pub mod substitution;

pub use error::{LookupError, ResolveError};
pub use lookup::{lookup_key_path, parse_key_path, KeySegment, NoLookup, ValueLookup};
pub use mutator::{get_at, set_at};
pub use paths::{find_paths, DocPath, LocatedReference, PathList, PathSegment};
pub use placeholder::{classify, Reference};
pub use restore::{restore, restore_paths};
pub use secrets::SecretsMap;
pub use substitution::{string_form, substitute, Substitutor};
