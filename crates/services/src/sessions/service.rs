use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use quiz_core::mastery::{
    self, CompletionReason, completion_reason, displayed_total, progress_percent,
};
use quiz_core::model::{
    AnswerEvent, LessonId, Question, QuestionId, QuizSettings, SessionId, SessionSummary,
    SubjectId, TopicMetrics,
};
use quiz_core::{Clock, QuestionBank};

use super::progress::SessionProgress;
use super::selection::select_next;
use super::view::MasteryReport;
use crate::error::SessionError;
use crate::random::RandomSource;

//
// ─── OPTIONS ───────────────────────────────────────────────────────────────────
//

/// Policy knobs for a new session: thresholds, tie-break randomness and time.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub settings: QuizSettings,
    pub random: RandomSource,
    pub clock: Clock,
}

impl SessionOptions {
    #[must_use]
    pub fn with_settings(mut self, settings: QuizSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_random(mut self, random: RandomSource) -> Self {
        self.random = random;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One learner's adaptive run over the question pool of a single subject.
///
/// The session never leaves its subject: every question it asks comes from
/// `bank.questions_for_subject(subject_id)`. It is driven by alternating
/// [`record_answer`](Self::record_answer) and [`advance`](Self::advance) calls
/// and becomes complete once a completion rule holds.
pub struct AdaptiveSession {
    id: SessionId,
    bank: Arc<QuestionBank>,
    lesson: LessonId,
    subject_id: SubjectId,
    settings: QuizSettings,
    random: RandomSource,
    clock: Clock,
    current: Option<usize>,
    answers: Vec<AnswerEvent>,
    metrics: BTreeMap<String, TopicMetrics>,
    weak_areas: Vec<String>,
    overall_mastery: u8,
    completion: Option<CompletionReason>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl AdaptiveSession {
    /// Start a session for `lesson`, seeding metrics for every topic of the
    /// mapped subject and picking the opening question.
    ///
    /// An unknown or empty subject yields a session with no current question.
    #[must_use]
    pub fn start(bank: Arc<QuestionBank>, lesson: &LessonId, options: SessionOptions) -> Self {
        let SessionOptions {
            settings,
            random,
            clock,
        } = options;
        let subject_id = bank.map_lesson_to_subject(lesson);
        let pool = bank.questions_for_subject(&subject_id);

        let metrics: BTreeMap<String, TopicMetrics> = bank
            .topics_for_subject(&subject_id)
            .into_iter()
            .map(|topic| (topic.to_owned(), TopicMetrics::new(topic)))
            .collect();

        let current = bank
            .initial_question_set(&subject_id, 1)
            .first()
            .and_then(|first| pool.iter().position(|q| q.id() == first.id()))
            .or_else(|| (!pool.is_empty()).then_some(0));

        let id = SessionId::generate();
        info!(
            session = %id,
            lesson = %lesson,
            subject = %subject_id,
            pool = pool.len(),
            topics = metrics.len(),
            "adaptive session started"
        );

        let started_at = clock.now();
        Self {
            id,
            lesson: lesson.clone(),
            subject_id,
            settings,
            random,
            clock,
            current,
            answers: Vec::new(),
            metrics,
            weak_areas: Vec::new(),
            overall_mastery: 0,
            completion: None,
            started_at,
            completed_at: None,
            bank,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn lesson(&self) -> &LessonId {
        &self.lesson
    }

    #[must_use]
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// The subject's full question pool.
    #[must_use]
    pub fn pool(&self) -> &[Question] {
        self.bank.questions_for_subject(&self.subject_id)
    }

    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool().len()
    }

    /// True when the mapped subject has no questions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool().is_empty()
    }

    /// Question awaiting an answer, if any.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.and_then(|i| self.pool().get(i))
    }

    /// Answer log in chronological order.
    #[must_use]
    pub fn answers(&self) -> &[AnswerEvent] {
        &self.answers
    }

    /// True once `question_id` has an entry in the answer log.
    #[must_use]
    pub fn is_answered(&self, question_id: &QuestionId) -> bool {
        self.answers.iter().any(|e| &e.question_id == question_id)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn metrics(&self) -> &BTreeMap<String, TopicMetrics> {
        &self.metrics
    }

    #[must_use]
    pub fn topic_metrics(&self, topic: &str) -> Option<&TopicMetrics> {
        self.metrics.get(topic)
    }

    /// Topics with some but insufficient mastery, alphabetically.
    #[must_use]
    pub fn weak_areas(&self) -> &[String] {
        &self.weak_areas
    }

    #[must_use]
    pub fn overall_mastery(&self) -> u8 {
        self.overall_mastery
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completion.is_some()
    }

    #[must_use]
    pub fn completion(&self) -> Option<CompletionReason> {
        self.completion
    }

    #[must_use]
    pub fn displayed_total(&self) -> usize {
        displayed_total(self.pool_size(), &self.settings)
    }

    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.answered_count(), self.pool_size(), &self.settings)
    }

    /// Record the outcome for the active question and refresh aggregates.
    ///
    /// Metrics are charged to the topic of the active question. Returns the
    /// updated topic metrics, or `None` when nothing is being asked or the
    /// active question already has an answer.
    pub fn record_answer(
        &mut self,
        question_id: &QuestionId,
        is_correct: bool,
    ) -> Option<&TopicMetrics> {
        if self.is_complete() {
            debug!(session = %self.id, question = %question_id, "answer ignored, session complete");
            return None;
        }
        let bank = Arc::clone(&self.bank);
        let Some(active) = self
            .current
            .and_then(|i| bank.questions_for_subject(&self.subject_id).get(i))
        else {
            debug!(session = %self.id, question = %question_id, "answer ignored, no active question");
            return None;
        };
        if self.is_answered(active.id()) {
            debug!(session = %self.id, question = %active.id(), "answer ignored, already answered");
            return None;
        }
        if active.id() != question_id {
            warn!(
                session = %self.id,
                expected = %active.id(),
                given = %question_id,
                "answer id does not match the active question"
            );
        }

        let topic = active.topic();
        self.metrics
            .entry(topic.to_owned())
            .or_insert_with(|| TopicMetrics::new(topic))
            .record(is_correct, &self.settings);
        self.answers.push(AnswerEvent {
            question_id: active.id().clone(),
            is_correct,
        });
        self.overall_mastery = mastery::overall_mastery(self.metrics.values());
        self.weak_areas = mastery::weak_areas(self.metrics.values(), &self.settings);

        debug!(
            session = %self.id,
            question = %active.id(),
            topic,
            is_correct,
            overall = self.overall_mastery,
            "answer recorded"
        );
        self.metrics.get(topic)
    }

    /// Select the next question after the active one has been answered.
    ///
    /// Returns `None` once nothing is left to ask. Answers are logged once per
    /// question, so at that point the whole pool has been answered and the
    /// session completes. An empty pool never completes.
    pub fn advance(&mut self) -> Option<&Question> {
        if self.is_complete() {
            return None;
        }
        let bank = Arc::clone(&self.bank);
        let pool = bank.questions_for_subject(&self.subject_id);
        let Some(current) = self.current.and_then(|i| pool.get(i)) else {
            self.evaluate_completion();
            return None;
        };

        let struggling = self
            .metrics
            .get(current.topic())
            .is_some_and(|m| m.is_struggling(&self.settings));
        let answered: HashSet<&QuestionId> =
            self.answers.iter().map(|e| &e.question_id).collect();

        match select_next(pool, current, &answered, struggling, &mut self.random) {
            Some(selection) => {
                debug!(
                    session = %self.id,
                    question = %pool[selection.index].id(),
                    branch = ?selection.branch,
                    struggling,
                    "next question selected"
                );
                self.current = Some(selection.index);
                self.current_question()
            }
            None => {
                debug!(session = %self.id, "no candidate question left");
                self.evaluate_completion();
                None
            }
        }
    }

    /// Check the completion rules against the current counters.
    ///
    /// Completes the session when a rule holds. Callers may use this to end a
    /// session early, e.g. when the learner leaves after reaching mastery.
    pub fn evaluate_completion(&mut self) -> Option<CompletionReason> {
        if self.completion.is_some() {
            return self.completion;
        }
        let reason = completion_reason(
            self.metrics.values(),
            self.answered_count(),
            self.pool_size(),
            self.overall_mastery,
            &self.settings,
        )?;
        self.complete(reason);
        Some(reason)
    }

    fn complete(&mut self, reason: CompletionReason) {
        let now = self.clock.now();
        self.completion = Some(reason);
        self.completed_at = Some(now);
        self.current = None;
        info!(
            session = %self.id,
            subject = %self.subject_id,
            ?reason,
            answered = self.answered_count(),
            overall = self.overall_mastery,
            "adaptive session complete"
        );
    }

    /// Snapshot of everything a UI shows about the session.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            session_id: self.id,
            subject_id: self.subject_id.clone(),
            current_question: self.current_question().cloned(),
            progress_percent: self.progress_percent(),
            answered: self.answered_count(),
            displayed_total: self.displayed_total(),
            pool_size: self.pool_size(),
            is_complete: self.is_complete(),
            completion: self.completion,
            overall_mastery: self.overall_mastery,
            weak_areas: self.weak_areas.clone(),
            metrics: self.metrics.values().cloned().collect(),
        }
    }

    /// Topics grouped by mastery tier.
    #[must_use]
    pub fn report(&self) -> MasteryReport {
        MasteryReport::from_metrics(self.metrics.values(), &self.settings)
    }

    /// Final summary of a completed session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` before completion, or
    /// `SessionError::Summary` if the recorded counters are inconsistent.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        let (Some(reason), Some(completed_at)) = (self.completion, self.completed_at) else {
            return Err(SessionError::NotComplete);
        };
        let answered = u32::try_from(self.answered_count()).unwrap_or(u32::MAX);
        Ok(SessionSummary::from_metrics(
            self.id,
            self.subject_id.clone(),
            self.started_at,
            completed_at,
            reason,
            answered,
            self.metrics.values().cloned().collect(),
        )?)
    }
}

impl fmt::Debug for AdaptiveSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveSession")
            .field("id", &self.id)
            .field("lesson", &self.lesson)
            .field("subject_id", &self.subject_id)
            .field("current", &self.current_question().map(Question::id))
            .field("answers_len", &self.answers.len())
            .field("overall_mastery", &self.overall_mastery)
            .field("completion", &self.completion)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
