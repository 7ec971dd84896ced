//! Textual placeholder substitution over a whole document.
//!
//! Every string leaf has its `{{ ... }}` spans replaced with the text form of
//! the value they reference. A value may itself contain placeholders, so
//! strings are re-scanned until a round replaces nothing. The number of rounds
//! is capped to guarantee termination on cyclic definitions.
//!
//! Spans that are not a recognised placeholder are copied through untouched,
//! and `\{{` / `\}}` produce literal braces.

use super::error::ResolveError;
use super::lookup::ValueLookup;
use super::placeholder::{classify_content, Reference};
use super::secrets::SecretsMap;
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Default cap on re-substitution rounds per string.
pub const DEFAULT_MAX_SUBSTITUTION_ROUNDS: usize = 10;

/// Matches `{{ content }}`, capturing the trimmed content.
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*(.*?)\s*\}\}").expect("Failed to compile placeholder regex")
});

/// Renders a value the way it appears once substituted into text.
///
/// Whole floats below 1e15 drop their fractional part (`3.0` -> `"3"`); every
/// other number uses its shortest round-tripping form. Containers render as
/// compact JSON.
///
/// # Examples
///
/// ```
/// use request_resolver::variables::substitution::string_form;
/// use serde_json::json;
///
/// assert_eq!(string_form(&json!(30)), "30");
/// assert_eq!(string_form(&json!(2.5)), "2.5");
/// assert_eq!(string_form(&json!(3.0)), "3");
/// assert_eq!(string_form(&json!(false)), "false");
/// assert_eq!(string_form(&json!(null)), "null");
/// assert_eq!(string_form(&json!("abc")), "abc");
/// ```
pub fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                (f as i64).to_string()
            }
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Substitutes placeholders using a secrets map and a `getValueOf` lookup.
pub struct Substitutor<'a> {
    secrets: &'a SecretsMap,
    lookup: &'a dyn ValueLookup,
    max_rounds: usize,
}

impl<'a> Substitutor<'a> {
    pub fn new(secrets: &'a SecretsMap, lookup: &'a dyn ValueLookup) -> Self {
        Self {
            secrets,
            lookup,
            max_rounds: DEFAULT_MAX_SUBSTITUTION_ROUNDS,
        }
    }

    /// Overrides the round cap. Values below 1 are treated as 1.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    /// Returns a copy of `document` with every string leaf substituted.
    ///
    /// Object keys are left as they are. Numbers, booleans and null pass
    /// through unchanged.
    ///
    /// # Errors
    ///
    /// The first unresolved variable, failed lookup or non-converging string
    /// aborts the whole document.
    pub fn substitute(&self, document: &Value) -> Result<Value, ResolveError> {
        match document {
            Value::String(text) => Ok(Value::String(self.substitute_str(text)?)),
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, child) in map {
                    out.insert(key.clone(), self.substitute(child)?);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => items
                .iter()
                .map(|child| self.substitute(child))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Number(_) | Value::Bool(_) | Value::Null => Ok(document.clone()),
        }
    }

    /// Substitutes placeholders in a single string until nothing is left to
    /// replace.
    pub fn substitute_str(&self, text: &str) -> Result<String, ResolveError> {
        // Fast path: no placeholder markers at all
        if !text.contains("{{") {
            return Ok(text.to_string());
        }

        let mut current = text.to_string();

        for round in 1..=self.max_rounds {
            let (next, replaced) = self.substitute_once(&current)?;
            if replaced == 0 {
                return Ok(unescape_braces(&next));
            }
            trace!("round {}: replaced {} placeholder(s)", round, replaced);
            current = next;
        }

        // The cap is reached; only a round with nothing left to do is acceptable.
        let (next, replaced) = self.substitute_once(&current)?;
        if replaced == 0 {
            return Ok(unescape_braces(&next));
        }

        Err(ResolveError::CyclicSubstitution {
            value: text.to_string(),
            rounds: self.max_rounds,
        })
    }

    /// Replaces every resolvable span once. Returns the new text and how many
    /// spans were replaced.
    ///
    /// Escaped braces are left in place; they are unescaped once the string
    /// has converged.
    fn substitute_once(&self, text: &str) -> Result<(String, usize), ResolveError> {
        let mut result = String::with_capacity(text.len() + (text.len() / 4));
        let mut last_match_end = 0;
        let mut search_from = 0;
        let mut replaced = 0;

        while let Some(cap) = PLACEHOLDER_REGEX.captures_at(text, search_from) {
            let (Some(full_match), Some(content)) = (cap.get(0), cap.get(1)) else {
                break;
            };

            // `\{{` is a literal brace pair; a real span may still start after it
            if text[..full_match.start()].ends_with('\\') {
                search_from = full_match.start() + 2;
                continue;
            }

            result.push_str(&text[last_match_end..full_match.start()]);

            // `\}}` closes nothing
            let resolved = if content.as_str().ends_with('\\') {
                None
            } else {
                self.resolve_content(content.as_str())?
            };

            match resolved {
                Some(value) => {
                    result.push_str(&value);
                    replaced += 1;
                }
                None => result.push_str(full_match.as_str()),
            }

            last_match_end = full_match.end();
            search_from = last_match_end;
        }

        result.push_str(&text[last_match_end..]);
        Ok((result, replaced))
    }

    /// Resolves the content of one span. `None` means "not a placeholder,
    /// keep the text".
    fn resolve_content(&self, content: &str) -> Result<Option<String>, ResolveError> {
        match classify_content(content) {
            Reference::Dot { name } => self.resolve_variable(&name).map(Some),
            Reference::FunctionCall { args, .. } => match args.as_slice() {
                [key, source] => {
                    let value = self.lookup.get_value_of(key, source)?;
                    Ok(Some(string_form(&value)))
                }
                _ => Ok(None),
            },
            Reference::Invalid => Ok(None),
        }
    }

    fn resolve_variable(&self, name: &str) -> Result<String, ResolveError> {
        let unresolved = || ResolveError::UnresolvedVariable {
            name: name.to_string(),
        };

        match self.secrets.get(name) {
            None | Some(Value::Null) => Err(unresolved()),
            Some(Value::String(s)) if s.is_empty() => Err(unresolved()),
            Some(value) => Ok(string_form(value)),
        }
    }
}

fn unescape_braces(text: &str) -> String {
    text.replace("\\{{", "{{").replace("\\}}", "}}")
}

/// Substitutes `document` with the default round cap.
///
/// # Examples
///
/// ```
/// use request_resolver::variables::lookup::NoLookup;
/// use request_resolver::variables::secrets::SecretsMap;
/// use request_resolver::variables::substitution::substitute;
/// use serde_json::json;
///
/// let mut secrets = SecretsMap::new();
/// secrets.insert("age", 30);
///
/// let doc = json!({"age": "{{.age}}", "bio": "I am {{ .age }} years old"});
/// let out = substitute(&doc, &secrets, &NoLookup).unwrap();
/// assert_eq!(out, json!({"age": "30", "bio": "I am 30 years old"}));
/// ```
pub fn substitute(
    document: &Value,
    secrets: &SecretsMap,
    lookup: &dyn ValueLookup,
) -> Result<Value, ResolveError> {
    Substitutor::new(secrets, lookup).substitute(document)
}
