use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{QuestionId, SubjectId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question {id}: prompt cannot be empty")]
    EmptyPrompt { id: String },

    #[error("question {id}: answer cannot be empty")]
    EmptyAnswer { id: String },

    #[error("question {id}: topic label cannot be empty")]
    EmptyTopic { id: String },

    #[error("question {id}: options list is empty or contains a blank option")]
    InvalidOptions { id: String },

    #[error("question {id}: answer is not one of the options")]
    AnswerNotInOptions { id: String },

    #[error("unknown difficulty level: {0}")]
    InvalidDifficulty(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Ordered difficulty ladder used for progression and remediation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// All levels from easiest to hardest.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    /// The level directly below this one, if any.
    #[must_use]
    pub fn easier(self) -> Option<Self> {
        match self {
            Difficulty::Beginner => None,
            Difficulty::Intermediate => Some(Difficulty::Beginner),
            Difficulty::Advanced => Some(Difficulty::Intermediate),
            Difficulty::Expert => Some(Difficulty::Advanced),
        }
    }

    /// The level directly above this one, if any.
    #[must_use]
    pub fn harder(self) -> Option<Self> {
        match self {
            Difficulty::Beginner => Some(Difficulty::Intermediate),
            Difficulty::Intermediate => Some(Difficulty::Advanced),
            Difficulty::Advanced => Some(Difficulty::Expert),
            Difficulty::Expert => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(QuestionError::InvalidDifficulty(s.to_owned())),
        }
    }
}

//
// ─── SELF ASSESSMENT ───────────────────────────────────────────────────────────
//

/// Flashcard-style self rating given after revealing the answer.
///
/// Only `Easy` counts as a correct answer; `Medium` is treated as partially
/// recalled and therefore incorrect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfAssessment {
    Easy,
    Medium,
    Hard,
}

impl SelfAssessment {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, SelfAssessment::Easy)
    }
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated question as read from a corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: String,
    pub subject_id: SubjectId,
    pub prompt: String,
    pub answer: String,
    pub explanation: String,
    pub difficulty: Difficulty,
    pub topic: String,
    pub options: Option<Vec<String>>,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id, prompt, answer or topic is blank, or
    /// if a multiple-choice option list is malformed or misses the answer.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = self.id.trim().to_owned();
        if id.is_empty() {
            return Err(QuestionError::EmptyId);
        }
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { id });
        }
        if self.answer.trim().is_empty() {
            return Err(QuestionError::EmptyAnswer { id });
        }
        let topic = self.topic.trim().to_owned();
        if topic.is_empty() {
            return Err(QuestionError::EmptyTopic { id });
        }
        if let Some(options) = &self.options {
            if options.is_empty() || options.iter().any(|o| o.trim().is_empty()) {
                return Err(QuestionError::InvalidOptions { id });
            }
            if !options.iter().any(|o| *o == self.answer) {
                return Err(QuestionError::AnswerNotInOptions { id });
            }
        }

        Ok(Question {
            id: QuestionId::new(id),
            subject_id: self.subject_id,
            prompt: self.prompt,
            answer: self.answer,
            explanation: self.explanation,
            difficulty: self.difficulty,
            topic,
            options: self.options,
        })
    }
}

/// Immutable question record owned by exactly one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    subject_id: SubjectId,
    prompt: String,
    answer: String,
    explanation: String,
    difficulty: Difficulty,
    topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Topic label ("subcategory") used for mastery tracking.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref()
    }

    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        self.options.is_some()
    }

    /// Exact comparison of a chosen option against the canonical answer.
    #[must_use]
    pub fn is_correct_option(&self, option: &str) -> bool {
        option == self.answer
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            id: "ds-1".into(),
            subject_id: SubjectId::new("1"),
            prompt: "What is a stack?".into(),
            answer: "LIFO".into(),
            explanation: "Last in, first out.".into(),
            difficulty: Difficulty::Beginner,
            topic: "Stacks".into(),
            options: Some(vec!["LIFO".into(), "FIFO".into()]),
        }
    }

    #[test]
    fn difficulty_ladder_is_ordered() {
        assert!(Difficulty::Beginner < Difficulty::Intermediate);
        assert!(Difficulty::Advanced < Difficulty::Expert);
        assert_eq!(Difficulty::Beginner.easier(), None);
        assert_eq!(Difficulty::Expert.harder(), None);
        assert_eq!(Difficulty::Advanced.easier(), Some(Difficulty::Intermediate));
        assert_eq!(Difficulty::Intermediate.harder(), Some(Difficulty::Advanced));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Expert".parse::<Difficulty>().unwrap(), Difficulty::Expert);
        assert!(matches!(
            "guru".parse::<Difficulty>(),
            Err(QuestionError::InvalidDifficulty(_))
        ));
    }

    #[test]
    fn valid_draft_validates() {
        let q = draft().validate().unwrap();
        assert_eq!(q.id().as_str(), "ds-1");
        assert_eq!(q.topic(), "Stacks");
        assert!(q.is_multiple_choice());
        assert!(q.is_correct_option("LIFO"));
        assert!(!q.is_correct_option("FIFO"));
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let mut d = draft();
        d.prompt = "  ".into();
        assert!(matches!(d.validate(), Err(QuestionError::EmptyPrompt { .. })));
    }

    #[test]
    fn answer_must_be_an_option() {
        let mut d = draft();
        d.options = Some(vec!["FIFO".into(), "Random".into()]);
        assert!(matches!(
            d.validate(),
            Err(QuestionError::AnswerNotInOptions { .. })
        ));
    }

    #[test]
    fn free_text_question_has_no_options() {
        let mut d = draft();
        d.options = None;
        let q = d.validate().unwrap();
        assert!(!q.is_multiple_choice());
        assert_eq!(q.options(), None);
    }

    #[test]
    fn only_easy_self_assessment_counts_as_correct() {
        assert!(SelfAssessment::Easy.is_correct());
        assert!(!SelfAssessment::Medium.is_correct());
        assert!(!SelfAssessment::Hard.is_correct());
    }
}
