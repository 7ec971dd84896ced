//! Type restoration after substitution.
//!
//! Substitution turns every placeholder into text, so `"{{.age}}"` becomes
//! `"30"` even when `age` is the number 30. For each whole-value placeholder
//! recorded in the original document, the restorer compares the substituted
//! string with the text form of the referenced value and, when they are equal,
//! writes the typed value back.
//!
//! Restoration is best effort. A path that no longer resolves, or a string
//! that differs from the expected text, is left as it is.

use super::error::ResolveError;
use super::lookup::ValueLookup;
use super::mutator::{get_at, set_at};
use super::paths::{find_paths, DocPath, PathList};
use super::placeholder::Reference;
use super::secrets::SecretsMap;
use super::substitution::string_form;
use log::{debug, trace, warn};
use serde_json::Value;

/// Outcome of writing back one recorded path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restored {
    /// The typed value replaced the substituted string.
    Retyped,
    /// The substituted string did not match; it stays a string.
    Kept,
    /// The path does not resolve to a string in the substituted document.
    Skipped,
}

/// Restores typed values in `after` for every whole-value placeholder in
/// `before`.
///
/// # Errors
///
/// Only a failing `getValueOf` lookup is an error; nothing else aborts
/// restoration.
///
/// # Examples
///
/// ```
/// use request_resolver::variables::lookup::NoLookup;
/// use request_resolver::variables::restore::restore;
/// use request_resolver::variables::secrets::SecretsMap;
/// use serde_json::json;
///
/// let mut secrets = SecretsMap::new();
/// secrets.insert("age", 30);
///
/// let before = json!({"age": "{{.age}}", "bio": "I am {{.age}} years old"});
/// let after = json!({"age": "30", "bio": "I am 30 years old"});
///
/// let restored = restore(&before, after, &secrets, &NoLookup).unwrap();
/// assert_eq!(restored, json!({"age": 30, "bio": "I am 30 years old"}));
/// ```
pub fn restore(
    before: &Value,
    mut after: Value,
    secrets: &SecretsMap,
    lookup: &dyn ValueLookup,
) -> Result<Value, ResolveError> {
    let paths = find_paths(before);
    restore_paths(&paths, &mut after, secrets, lookup)?;
    Ok(after)
}

/// Restores typed values at the given paths, in place.
///
/// Dot references are processed before function calls. Returns how many leaves
/// changed type.
pub fn restore_paths(
    paths: &PathList,
    after: &mut Value,
    secrets: &SecretsMap,
    lookup: &dyn ValueLookup,
) -> Result<usize, ResolveError> {
    let mut retyped = 0;

    for located in &paths.dot_references {
        let Reference::Dot { name } = &located.reference else {
            continue;
        };

        // Absent names were left literal on purpose
        let Some(original) = secrets.get(name) else {
            continue;
        };

        if write_back(after, &located.path, original) == Restored::Retyped {
            retyped += 1;
        }
    }

    for located in &paths.function_calls {
        let Reference::FunctionCall { args, .. } = &located.reference else {
            continue;
        };

        let [key, source] = args.as_slice() else {
            warn!(
                "function call at '{}' has {} argument(s); leaving it",
                located.path,
                args.len()
            );
            continue;
        };

        let original = lookup.get_value_of(key, source)?;
        if write_back(after, &located.path, &original) == Restored::Retyped {
            retyped += 1;
        }
    }

    debug!(
        "restored {} of {} placeholder path(s)",
        retyped,
        paths.len()
    );
    Ok(retyped)
}

/// Writes `original` at `path` if the substituted string there equals its
/// text form.
pub fn write_back(after: &mut Value, path: &DocPath, original: &Value) -> Restored {
    let candidate = string_form(original);

    let matches = match get_at(after, path) {
        Some(Value::String(actual)) => *actual == candidate,
        Some(other) => {
            warn!(
                "expected a substituted string at '{}', found {}; leaving it",
                path, other
            );
            return Restored::Skipped;
        }
        None => {
            warn!("path '{}' not found in substituted document", path);
            return Restored::Skipped;
        }
    };

    // Same string, nothing to retype
    if !matches || original.is_string() {
        return Restored::Kept;
    }

    if set_at(after, path, original.clone()) {
        trace!("retyped '{}' as {}", path, original);
        Restored::Retyped
    } else {
        Restored::Skipped
    }
}
