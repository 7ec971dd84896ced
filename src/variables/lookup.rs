//! The `getValueOf` seam.
//!
//! `{{ getValueOf "key" "source" }}` asks a [`ValueLookup`] for the value at
//! `key` inside a previously saved response identified by `source`. The key is
//! a small path language:
//!
//! ```text
//! data.user.id            field access
//! items[0].name           array index
//! headers.{x.request.id}  braces keep a literal key that contains dots
//! $.data.id               optional leading `$` or `$.`
//! ```

use super::error::LookupError;
use serde_json::Value;

/// Resolves `getValueOf(key, source)` to a typed value.
///
/// Implementations must tolerate concurrent calls from independent resolutions.
pub trait ValueLookup: Send + Sync {
    fn get_value_of(&self, key: &str, source: &str) -> Result<Value, LookupError>;
}

impl<F> ValueLookup for F
where
    F: Fn(&str, &str) -> Result<Value, LookupError> + Send + Sync,
{
    fn get_value_of(&self, key: &str, source: &str) -> Result<Value, LookupError> {
        self(key, source)
    }
}

/// A lookup for documents that never call `getValueOf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl ValueLookup for NoLookup {
    fn get_value_of(&self, _key: &str, _source: &str) -> Result<Value, LookupError> {
        Err(LookupError::Unsupported)
    }
}

/// One step of a lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySegment {
    Field(String),
    Index(usize),
}

/// Parses a lookup key into segments.
///
/// - `"user.name"` -> `[Field("user"), Field("name")]`
/// - `"items[0].id"` -> `[Field("items"), Index(0), Field("id")]`
/// - `"meta.{a.b}"` -> `[Field("meta"), Field("a.b")]`
pub fn parse_key_path(key: &str) -> Result<Vec<KeySegment>, LookupError> {
    let key = key.trim();
    let key = key.strip_prefix('$').unwrap_or(key);
    let key = key.strip_prefix('.').unwrap_or(key);

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = key.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if !current.is_empty() {
                    segments.push(KeySegment::Field(std::mem::take(&mut current)));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(KeySegment::Field(std::mem::take(&mut current)));
                }

                let mut index_str = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == ']' {
                        closed = true;
                        break;
                    }
                    index_str.push(next);
                }
                if !closed {
                    return Err(LookupError::InvalidKey(format!(
                        "unclosed '[' in '{}'",
                        key
                    )));
                }

                let index = index_str.trim().parse::<usize>().map_err(|_| {
                    LookupError::InvalidKey(format!(
                        "array index '{}' in '{}' is not a number",
                        index_str, key
                    ))
                })?;
                segments.push(KeySegment::Index(index));
            }
            '{' => {
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == '}' {
                        closed = true;
                        break;
                    }
                    current.push(next);
                }
                if !closed {
                    return Err(LookupError::InvalidKey(format!(
                        "unclosed '{{' in '{}'",
                        key
                    )));
                }
            }
            ']' | '}' => {
                return Err(LookupError::InvalidKey(format!(
                    "unexpected '{}' in '{}'",
                    ch, key
                )));
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(KeySegment::Field(current));
    }

    Ok(segments)
}

/// Finds `key` inside `document`. `source` is only used for error messages.
///
/// # Examples
///
/// ```
/// use request_resolver::variables::lookup::lookup_key_path;
/// use serde_json::json;
///
/// let doc = json!({"data": {"users": [{"id": 7}]}});
/// let id = lookup_key_path(&doc, "data.users[0].id", "users.json").unwrap();
/// assert_eq!(id, json!(7));
/// ```
pub fn lookup_key_path(document: &Value, key: &str, source: &str) -> Result<Value, LookupError> {
    let missing = || LookupError::MissingKey {
        key: key.to_string(),
        source: source.to_string(),
    };

    let mut current = document;
    for segment in parse_key_path(key)? {
        current = match (&segment, current) {
            (KeySegment::Field(name), Value::Object(map)) => map.get(name).ok_or_else(missing)?,
            (KeySegment::Index(index), Value::Array(items)) => {
                items.get(*index).ok_or_else(missing)?
            }
            _ => return Err(missing()),
        };
    }

    Ok(current.clone())
}
