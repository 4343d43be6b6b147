use serde::Serialize;

use crate::mastery::percent;
use crate::model::ids::QuestionId;
use crate::model::settings::QuizSettings;

/// One recorded answer, in chronological order within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerEvent {
    pub question_id: QuestionId,
    pub is_correct: bool,
}

/// Running performance on a single topic within one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicMetrics {
    topic: String,
    total_attempts: u32,
    correct_answers: u32,
    incorrect_answers: u32,
    mastery: u8,
    needs_reinforcement: bool,
}

impl TopicMetrics {
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            total_attempts: 0,
            correct_answers: 0,
            incorrect_answers: 0,
            mastery: 0,
            needs_reinforcement: false,
        }
    }

    /// Count one answer and refresh the derived mastery and reinforcement flag.
    pub fn record(&mut self, is_correct: bool, settings: &QuizSettings) {
        self.total_attempts = self.total_attempts.saturating_add(1);
        if is_correct {
            self.correct_answers = self.correct_answers.saturating_add(1);
        } else {
            self.incorrect_answers = self.incorrect_answers.saturating_add(1);
        }
        self.mastery = percent(self.correct_answers, self.total_attempts);
        self.needs_reinforcement = self.total_attempts >= settings.min_attempts_for_mastery()
            && self.mastery < settings.mastery_threshold();
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> u32 {
        self.incorrect_answers
    }

    /// Rounded percentage of correct answers, 0 when unattempted.
    #[must_use]
    pub fn mastery(&self) -> u8 {
        self.mastery
    }

    #[must_use]
    pub fn needs_reinforcement(&self) -> bool {
        self.needs_reinforcement
    }

    /// Remedial heuristic: enough attempts and mastery under the struggle threshold.
    #[must_use]
    pub fn is_struggling(&self, settings: &QuizSettings) -> bool {
        self.total_attempts >= settings.struggle_min_attempts()
            && self.mastery < settings.struggle_threshold()
    }

    /// Learner-facing weak area: strictly between 0% and the weak-area threshold.
    #[must_use]
    pub fn is_weak_area(&self, settings: &QuizSettings) -> bool {
        self.mastery > 0 && self.mastery < settings.weak_area_threshold()
    }
}
