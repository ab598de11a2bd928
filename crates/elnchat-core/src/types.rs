//! Core types - the role-tagged transcript sent to a provider and the reply
//! that comes back.
//!
//! The transcript also owns its *stringified* form, which feeds the proof hash.
//! That form is the Python `repr` of a list of `(role, text)` 2-tuples and must
//! stay byte-stable: changing it changes every proof file name.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use unicode_general_category::{get_general_category, GeneralCategory};

/// System prompt of the tutorial conversation.
pub const TUTORIAL_SYSTEM_PROMPT: &str = concat!(
    "You are a helpful assistant called 'LLM4ELN'.",
    "Your purpose is to help users of electronic lab notebook."
);

/// The single human question of the tutorial conversation.
pub const TUTORIAL_QUESTION: &str = "What is your purpose?";

// ─────────────────────────────────────────────
// Roles & turns
// ─────────────────────────────────────────────

/// Who authored a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Human,
    Assistant,
}

impl Role {
    /// Lowercase role tag as used in the stringified transcript.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::Human => "human",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Turn {
            role,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    pub fn human(text: impl Into<String>) -> Self {
        Self::new(Role::Human, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }
}

// ─────────────────────────────────────────────
// Transcript
// ─────────────────────────────────────────────

/// An ordered, immutable sequence of turns sent to a provider in one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new(turns: Vec<Turn>) -> Self {
        Transcript { turns }
    }

    /// The fixed two-turn conversation of the tutorial.
    pub fn tutorial() -> Self {
        Transcript::new(vec![
            Turn::system(TUTORIAL_SYSTEM_PROMPT),
            Turn::human(TUTORIAL_QUESTION),
        ])
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render as a Python list of `(role, text)` tuples,
    /// e.g. `[('system', 'S'), ('human', 'H')]`.
    pub fn stringify(&self) -> String {
        let items: Vec<String> = self
            .turns
            .iter()
            .map(|t| format!("({}, {})", py_repr(t.role.as_str()), py_repr(&t.text)))
            .collect();
        format!("[{}]", items.join(", "))
    }
}

/// Python `repr()` of a string.
///
/// Single quotes unless the text contains `'` and no `"`. Backslash, the active
/// quote, `\t`, `\n`, `\r` and non-printable characters are escaped, the
/// latter as `\xHH`, `\uHHHH` or `\UHHHHHHHH` by code point width.
pub fn py_repr(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if !is_py_printable(c) => {
                let code = c as u32;
                if code <= 0xff {
                    out.push_str(&format!("\\x{:02x}", code));
                } else if code <= 0xffff {
                    out.push_str(&format!("\\u{:04x}", code));
                } else {
                    out.push_str(&format!("\\U{:08x}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// `str.isprintable()`: everything except the Other and Separator categories,
/// with the ASCII space allowed.
fn is_py_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

// ─────────────────────────────────────────────
// Reply
// ─────────────────────────────────────────────

/// Reply normalization failure.
#[derive(Debug, Error, PartialEq)]
pub enum ReplyError {
    #[error("unsupported reply shape: expected text or an object with a text field, got {0}")]
    UnsupportedShape(String),
}

/// Raw reply from a provider - plain text, or a structured object that
/// exposes its text through a `content` or `text` field.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Text(String),
    Structured(Value),
}

impl Reply {
    /// Normalize to plain text.
    pub fn into_text(self) -> Result<String, ReplyError> {
        match self {
            Reply::Text(text) => Ok(text),
            Reply::Structured(Value::String(text)) => Ok(text),
            Reply::Structured(Value::Object(mut map)) => {
                for field in ["content", "text"] {
                    if let Some(Value::String(text)) = map.remove(field) {
                        return Ok(text);
                    }
                }
                Err(ReplyError::UnsupportedShape(describe_object(&map)))
            }
            Reply::Structured(other) => Err(ReplyError::UnsupportedShape(
                json_kind(&other).to_string(),
            )),
        }
    }
}

fn describe_object(map: &serde_json::Map<String, Value>) -> String {
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    format!("object with keys [{}]", keys.join(", "))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(text)
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Structured(value)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
