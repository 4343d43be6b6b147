use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::mastery::{CompletionReason, overall_mastery};
use crate::model::{SessionId, SubjectId, TopicMetrics};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("answered count ({answered}) does not match topic attempts ({attempts})")]
    CountMismatch { answered: u32, attempts: u32 },
}

/// Final outcome of a completed adaptive session, ready to be persisted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    session_id: SessionId,
    subject_id: SubjectId,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    reason: CompletionReason,
    answered: u32,
    correct: u32,
    overall_mastery: u8,
    topics: Vec<TopicMetrics>,
}

impl SessionSummary {
    /// Build a summary from the final per-topic metrics.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SessionSummaryError::CountMismatch` if `answered` differs from the summed attempts.
    pub fn from_metrics(
        session_id: SessionId,
        subject_id: SubjectId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        reason: CompletionReason,
        answered: u32,
        topics: Vec<TopicMetrics>,
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        let attempts = topics
            .iter()
            .fold(0_u32, |acc, m| acc.saturating_add(m.total_attempts()));
        if attempts != answered {
            return Err(SessionSummaryError::CountMismatch { answered, attempts });
        }
        let correct = topics
            .iter()
            .fold(0_u32, |acc, m| acc.saturating_add(m.correct_answers()));

        Ok(Self {
            session_id,
            subject_id,
            started_at,
            completed_at,
            reason,
            answered,
            correct,
            overall_mastery: overall_mastery(&topics),
            topics,
        })
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn reason(&self) -> CompletionReason {
        self.reason
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn overall_mastery(&self) -> u8 {
        self.overall_mastery
    }

    #[must_use]
    pub fn topics(&self) -> &[TopicMetrics] {
        &self.topics
    }
}
