use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a subject question bank (e.g. `"1"` for Data Structures).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    /// Creates a new `SubjectId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// UI-facing lesson identifier, translated into a `SubjectId` by the bank.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(String);

impl LessonId {
    /// Creates a new `LessonId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a question, unique within its subject.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of one adaptive session (one lesson attempt).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh random `SessionId`
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl From<&str> for SubjectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<&str> for LessonId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for QuestionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ─── Debug Implementations ─────────────────────────────────────────────────────

impl fmt::Debug for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubjectId({})", self.0)
    }
}

impl fmt::Debug for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonId({})", self.0)
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_id_display() {
        let id = SubjectId::new("4");
        assert_eq!(id.to_string(), "4");
        assert_eq!(format!("{id:?}"), "SubjectId(4)");
    }

    #[test]
    fn question_id_from_str() {
        let id: QuestionId = "ds-12".into();
        assert_eq!(id.as_str(), "ds-12");
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&LessonId::new("3")).unwrap();
        assert_eq!(json, "\"3\"");
    }
}
