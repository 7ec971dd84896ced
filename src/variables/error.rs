//! Error types for placeholder resolution.
//!
//! Substitution and lookup failures abort resolution of the whole document.
//! Type restoration never produces an error: a path that cannot be matched is
//! skipped and the substituted string is kept.

use std::fmt;

/// Errors raised by a `getValueOf` lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The persisted response document named by `source` does not exist.
    ///
    /// Usually means the request that produces it was never run.
    MissingSource { source: String },

    /// The key path does not exist inside the response document.
    MissingKey { key: String, source: String },

    /// The key path itself is malformed (unbalanced `[` or `{`).
    InvalidKey(String),

    /// The source identifier is not a relative file name.
    InvalidSource(String),

    /// The response document exists but is not valid JSON.
    InvalidDocument { source: String, message: String },

    /// Reading the response document failed.
    Io { source: String, message: String },

    /// No lookup capability was configured for this resolution.
    Unsupported,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::MissingSource { source } => {
                write!(f, "Response file '{}' not found", source)
            }
            LookupError::MissingKey { key, source } => {
                write!(f, "Key '{}' not found in '{}'", key, source)
            }
            LookupError::InvalidKey(msg) => write!(f, "Invalid key path: {}", msg),
            LookupError::InvalidSource(source) => write!(f, "Invalid source: {}", source),
            LookupError::InvalidDocument { source, message } => {
                write!(f, "Failed to parse '{}': {}", source, message)
            }
            LookupError::Io { source, message } => {
                write!(f, "Failed to read '{}': {}", source, message)
            }
            LookupError::Unsupported => write!(f, "getValueOf is not available"),
        }
    }
}

impl std::error::Error for LookupError {}

/// Errors that abort resolution of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// A `{{ .name }}` reference has no non-empty value in the secrets map.
    UnresolvedVariable { name: String },

    /// Re-substitution kept changing the value past the round limit.
    CyclicSubstitution { value: String, rounds: usize },

    /// A `getValueOf` reference could not be resolved.
    LookupFailure(LookupError),

    /// The secrets map could not be built from the supplied value.
    InvalidSecrets(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::UnresolvedVariable { name } => {
                write!(f, "Unresolved variable: {}", name)
            }
            ResolveError::CyclicSubstitution { value, rounds } => write!(
                f,
                "Substitution did not converge after {} rounds: '{}'",
                rounds, value
            ),
            ResolveError::LookupFailure(err) => write!(f, "getValueOf failed: {}", err),
            ResolveError::InvalidSecrets(msg) => write!(f, "Invalid secrets: {}", msg),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::LookupFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LookupError> for ResolveError {
    fn from(err: LookupError) -> Self {
        ResolveError::LookupFailure(err)
    }
}
