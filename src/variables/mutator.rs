//! Reading and replacing values at a `DocPath`.
//!
//! A missing key, an out-of-range index, or a segment of the wrong kind for the
//! value it is applied to means "not found": `get_at` returns `None` and
//! `set_at` leaves the document alone.

use super::paths::{DocPath, PathSegment};
use serde_json::Value;

/// Returns the value at `path`, or `None` if the path does not resolve.
pub fn get_at<'a>(document: &'a Value, path: &DocPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(document, |current, segment| match (segment, current) {
            (PathSegment::Key(key), Value::Object(map)) => map.get(key),
            (PathSegment::Index(index), Value::Array(items)) => items.get(*index),
            _ => None,
        })
}

/// Mutable counterpart of [`get_at`].
pub fn get_at_mut<'a>(document: &'a mut Value, path: &DocPath) -> Option<&'a mut Value> {
    let mut current = document;
    for segment in path.segments() {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(map)) => map.get_mut(key)?,
            (PathSegment::Index(index), Value::Array(items)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Replaces the value at `path` with `new_value`.
///
/// Only an existing leaf is replaced; no intermediate containers are created.
/// Returns whether the replacement happened.
///
/// # Examples
///
/// ```
/// use request_resolver::variables::mutator::set_at;
/// use request_resolver::variables::paths::DocPath;
/// use serde_json::json;
///
/// let mut doc = json!({"items": [{"v": "1"}]});
/// let path = DocPath::root().key("items").index(0).key("v");
///
/// assert!(set_at(&mut doc, &path, json!(1)));
/// assert_eq!(doc, json!({"items": [{"v": 1}]}));
/// ```
pub fn set_at(document: &mut Value, path: &DocPath, new_value: Value) -> bool {
    match get_at_mut(document, path) {
        Some(slot) => {
            *slot = new_value;
            true
        }
        None => false,
    }
}
