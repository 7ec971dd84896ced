//! Placeholder location discovery.
//!
//! Walks an unsubstituted document and records where every whole-value
//! placeholder lives. Only string leaves that are exactly one placeholder are
//! recorded: a string such as `"Bearer {{.token}}"` can only ever stay a
//! string, so it is never a candidate for type restoration.

use super::placeholder::{classify, Reference};
use serde_json::Value;
use std::fmt;

/// Separator used by `Display` for paths.
pub const DEFAULT_PATH_SEPARATOR: &str = " -> ";

/// One step into a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Descend into an object member.
    Key(String),

    /// Descend into an array element.
    Index(usize),
}

/// Location of a value inside a document, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocPath(Vec<PathSegment>);

impl DocPath {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new path extended with an object key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    /// Returns a new path extended with an array index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// Renders the path for diagnostics, e.g. `items[2] -> field`.
    ///
    /// An index is glued to the segment before it; keys are joined with
    /// `separator`.
    pub fn display_with(&self, separator: &str) -> String {
        let mut out = String::new();
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if i > 0 {
                        out.push_str(separator);
                    }
                    out.push_str(key);
                }
                PathSegment::Index(index) => {
                    out.push('[');
                    out.push_str(&index.to_string());
                    out.push(']');
                }
            }
        }
        out
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_with(DEFAULT_PATH_SEPARATOR))
    }
}

impl From<Vec<PathSegment>> for DocPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

/// A placeholder together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedReference {
    pub path: DocPath,
    pub reference: Reference,
}

/// Placeholders found in one document, split by kind.
///
/// Dot references resolve against the secrets map and function calls against
/// the lookup collaborator, so the two are kept apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathList {
    pub dot_references: Vec<LocatedReference>,
    pub function_calls: Vec<LocatedReference>,
}

impl PathList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.dot_references.len() + self.function_calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dot references first, then function calls.
    pub fn iter(&self) -> impl Iterator<Item = &LocatedReference> {
        self.dot_references.iter().chain(self.function_calls.iter())
    }

    fn record(&mut self, path: DocPath, reference: Reference) {
        let partition = match &reference {
            Reference::Dot { .. } => &mut self.dot_references,
            Reference::FunctionCall { .. } => &mut self.function_calls,
            Reference::Invalid => return,
        };
        partition.push(LocatedReference { path, reference });
    }
}

/// Records every whole-value placeholder in `document`.
///
/// The document is not modified. Numbers, booleans and null are skipped.
///
/// # Examples
///
/// ```
/// use request_resolver::variables::paths::find_paths;
/// use serde_json::json;
///
/// let doc = json!({"items": [{"v": "{{.x}}"}], "note": "id {{.x}}"});
/// let paths = find_paths(&doc);
///
/// assert_eq!(paths.dot_references.len(), 1);
/// assert_eq!(paths.dot_references[0].path.to_string(), "items[0] -> v");
/// ```
pub fn find_paths(document: &Value) -> PathList {
    let mut paths = PathList::new();
    walk(document, &DocPath::root(), &mut paths);
    paths
}

fn walk(value: &Value, path: &DocPath, paths: &mut PathList) {
    match value {
        Value::String(text) => {
            let reference = classify(text);
            if reference.is_placeholder() {
                paths.record(path.clone(), reference);
            }
        }
        Value::Object(map) => {
            for (key, child) in map {
                walk(child, &path.key(key.as_str()), paths);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(child, &path.index(index), paths);
            }
        }
        Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}
