//! Placeholder classification.
//!
//! Decides whether a single string is exactly one placeholder and, if so,
//! which kind:
//!
//! ```text
//! {{ .name }}                          -> Reference::Dot
//! {{ getValueOf "key" 'source.json' }} -> Reference::FunctionCall
//! ```
//!
//! Anything else, including text around a placeholder, is `Reference::Invalid`.

/// The only function name recognised inside a placeholder.
pub const GET_VALUE_OF: &str = "getValueOf";

/// Result of classifying a candidate string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Not a recognised placeholder; the text is literal.
    Invalid,

    /// `{{ .name }}`, resolved against the secrets map.
    Dot { name: String },

    /// `{{ getValueOf key source }}`, resolved by the lookup collaborator.
    FunctionCall { function: String, args: Vec<String> },
}

impl Reference {
    /// Returns true for every variant except `Invalid`.
    pub fn is_placeholder(&self) -> bool {
        !matches!(self, Reference::Invalid)
    }
}

/// A whitespace-separated token of placeholder content.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    quoted: bool,
}

/// Classifies `candidate` as a whole-value placeholder.
///
/// # Examples
///
/// ```
/// use request_resolver::variables::placeholder::{classify, Reference};
///
/// assert_eq!(
///     classify("{{ .token }}"),
///     Reference::Dot { name: "token".to_string() }
/// );
/// assert_eq!(classify("Bearer {{ .token }}"), Reference::Invalid);
/// ```
pub fn classify(candidate: &str) -> Reference {
    let trimmed = candidate.trim();

    let inner = match trimmed
        .strip_prefix("{{")
        .and_then(|rest| rest.strip_suffix("}}"))
    {
        Some(inner) => inner,
        None => return Reference::Invalid,
    };

    // `{{{x}}}` and friends
    if inner.starts_with('{') || inner.ends_with('}') {
        return Reference::Invalid;
    }

    // Two adjacent placeholders, `{{.a}}{{.b}}`
    if has_delimiter(inner) {
        return Reference::Invalid;
    }

    classify_content(inner)
}

/// Classifies the content between the braces of a placeholder.
///
/// Used by the substitutor, which has already isolated a `{{ ... }}` span.
pub fn classify_content(content: &str) -> Reference {
    let content = content.trim();
    if content.is_empty() {
        return Reference::Invalid;
    }

    let tokens = match tokenize(content) {
        Some(tokens) => tokens,
        None => return Reference::Invalid,
    };

    if tokens.iter().any(|token| has_delimiter(&token.text)) {
        return Reference::Invalid;
    }

    match tokens.as_slice() {
        [single] if !single.quoted => match single.text.strip_prefix('.') {
            Some(name) if is_variable_name(name) => Reference::Dot {
                name: name.to_string(),
            },
            _ => Reference::Invalid,
        },
        [function, key, source] if !function.quoted && function.text == GET_VALUE_OF => {
            Reference::FunctionCall {
                function: GET_VALUE_OF.to_string(),
                args: vec![key.text.clone(), source.text.clone()],
            }
        }
        _ => Reference::Invalid,
    }
}

/// Any non-empty name without braces; unknown names fail later as unresolved.
fn is_variable_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['{', '}'])
}

fn has_delimiter(text: &str) -> bool {
    text.contains("{{") || text.contains("}}")
}

/// Splits content on whitespace, keeping single- or double-quoted segments
/// together and stripping their quotes.
///
/// Returns `None` for an unterminated quote or a closing quote glued to more text.
fn tokenize(content: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = content.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch == '"' || ch == '\'' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            for next in chars.by_ref() {
                if next == ch {
                    closed = true;
                    break;
                }
                text.push(next);
            }
            if !closed {
                return None;
            }
            if matches!(chars.peek(), Some(next) if !next.is_whitespace()) {
                return None;
            }
            tokens.push(Token { text, quoted: true });
        } else {
            let mut text = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_whitespace() {
                    break;
                }
                text.push(next);
                chars.next();
            }
            tokens.push(Token {
                text,
                quoted: false,
            });
        }
    }

    Some(tokens)
}
