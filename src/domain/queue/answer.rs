//! Answer value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of an uploaded file, resolved by the transport layer.
///
/// The engine never opens these; they are plain strings it stores and
/// returns, so disposal is garbage collection only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRef(String);

impl FileRef {
    /// Wraps a transport-layer file identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized, locale-independent representation of an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalValue {
    /// A text answer (possibly a quick-option canonical key).
    Text(String),

    /// A single file reference.
    File(FileRef),

    /// Multiple file references for multi-file steps.
    Files(Vec<FileRef>),
}

impl CanonicalValue {
    /// The text value, if this is a text answer. Branch dispatch only
    /// looks at text; file answers never select an arm.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CanonicalValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CanonicalValue {
    fn from(s: &str) -> Self {
        CanonicalValue::Text(s.to_string())
    }
}

impl From<String> for CanonicalValue {
    fn from(s: String) -> Self {
        CanonicalValue::Text(s)
    }
}

/// One recorded answer: the canonical value plus the human-readable form
/// shown back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub canonical: CanonicalValue,
    pub display: String,
}

impl Answer {
    /// Creates an answer.
    pub fn new(canonical: impl Into<CanonicalValue>, display: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            display: display.into(),
        }
    }

    /// Creates a text answer whose display equals its canonical value.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            display: value.clone(),
            canonical: CanonicalValue::Text(value),
        }
    }

    /// Creates a multi-file answer; the display is the file count.
    pub fn files(refs: Vec<FileRef>) -> Self {
        Self {
            display: format!("{} file(s)", refs.len()),
            canonical: CanonicalValue::Files(refs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_answer_mirrors_display() {
        let answer = Answer::text("Employed");
        assert_eq!(answer.canonical.as_text(), Some("Employed"));
        assert_eq!(answer.display, "Employed");
    }

    #[test]
    fn files_answer_has_no_text() {
        let answer = Answer::files(vec![FileRef::new("f1"), FileRef::new("f2")]);
        assert_eq!(answer.canonical.as_text(), None);
        assert_eq!(answer.display, "2 file(s)");
    }

    #[test]
    fn canonical_value_from_str() {
        let value: CanonicalValue = "Yes".into();
        assert_eq!(value.as_text(), Some("Yes"));
    }
}
