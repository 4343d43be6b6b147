//! Subject isolation audit.
//!
//! A session for a lesson may only draw from the subject that lesson maps to.
//! Question ownership is enforced when the catalog is built: `Subject::new`
//! rejects any question filed under another subject with
//! `CatalogError::SubjectMismatch`, so a pool can never hold a foreign
//! question. The audit therefore reports how each lesson resolves: the
//! subject it reaches, whether that came from the identity fallback, and
//! what the resulting pool contains.

use serde::Serialize;
use tracing::warn;

use quiz_core::QuestionBank;
use quiz_core::model::{LessonId, SubjectId};

/// Audit result for a single lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonIsolation {
    pub lesson: LessonId,
    pub subject: SubjectId,
    /// True when the lesson has no entry in the lesson table.
    pub fallback: bool,
    pub questions: usize,
    pub topics: Vec<String>,
}

impl LessonIsolation {
    /// A session for this lesson would have nothing to ask.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IsolationReport {
    pub lessons: Vec<LessonIsolation>,
}

impl IsolationReport {
    /// Lessons that resolve to an empty pool.
    pub fn empty_lessons(&self) -> impl Iterator<Item = &LessonIsolation> {
        self.lessons.iter().filter(|l| l.is_empty())
    }
}

/// Resolve every given lesson against the bank.
#[must_use]
pub fn audit_subject_isolation<'a>(
    bank: &QuestionBank,
    lessons: impl IntoIterator<Item = &'a LessonId>,
) -> IsolationReport {
    let lessons = lessons
        .into_iter()
        .map(|lesson| {
            let subject = bank.map_lesson_to_subject(lesson);
            let fallback = !bank.lessons().any(|(mapped, _)| mapped == lesson);
            let questions = bank.total_question_count(&subject);
            if questions == 0 {
                warn!(lesson = %lesson, subject = %subject, fallback, "lesson resolves to an empty pool");
            }
            LessonIsolation {
                lesson: lesson.clone(),
                fallback,
                questions,
                topics: bank
                    .topics_for_subject(&subject)
                    .into_iter()
                    .map(str::to_owned)
                    .collect(),
                subject,
            }
        })
        .collect();
    IsolationReport { lessons }
}
