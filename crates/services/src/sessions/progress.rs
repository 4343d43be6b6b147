use quiz_core::mastery::CompletionReason;
use quiz_core::model::{Question, SessionId, SubjectId, TopicMetrics};
use serde::Serialize;

/// Point-in-time view of an adaptive session, shaped for a UI to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub session_id: SessionId,
    pub subject_id: SubjectId,
    pub current_question: Option<Question>,
    pub progress_percent: u8,
    pub answered: usize,
    pub displayed_total: usize,
    pub pool_size: usize,
    pub is_complete: bool,
    pub completion: Option<CompletionReason>,
    pub overall_mastery: u8,
    pub weak_areas: Vec<String>,
    pub metrics: Vec<TopicMetrics>,
}
