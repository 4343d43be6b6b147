use std::sync::Arc;

use tracing::info;

use quiz_core::model::{
    LessonId, Question, QuestionId, QuizSettings, SelfAssessment, SessionSummary, TopicMetrics,
};
use quiz_core::{Clock, QuestionBank};
use storage::CorpusSource;

use super::service::{AdaptiveSession, SessionOptions};
use crate::error::SessionError;
use crate::random::RandomSource;

/// Result of answering the active question through the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub canonical_answer: String,
    pub explanation: String,
    pub topic: TopicMetrics,
    pub overall_mastery: u8,
}

/// Orchestrates adaptive sessions over a shared question bank.
#[derive(Debug, Clone)]
pub struct AdaptiveQuizService {
    bank: Arc<QuestionBank>,
    settings: QuizSettings,
    clock: Clock,
    seed: Option<u64>,
}

impl AdaptiveQuizService {
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>, settings: QuizSettings) -> Self {
        Self {
            bank,
            settings,
            clock: Clock::default(),
            seed: None,
        }
    }

    /// Load the bank and its settings from a corpus source.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the corpus cannot be loaded.
    pub fn from_source(source: &dyn CorpusSource) -> Result<Self, SessionError> {
        let corpus = source.load()?;
        Ok(Self::new(Arc::new(corpus.bank), corpus.settings))
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Make tie-breaks reproducible: every session started afterwards draws
    /// from a source seeded with `seed`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn bank(&self) -> &Arc<QuestionBank> {
        &self.bank
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Start a new session for a lesson.
    #[must_use]
    pub fn start_session(&self, lesson: &LessonId) -> AdaptiveSession {
        let random = self.seed.map_or(RandomSource::Thread, RandomSource::seeded);
        let options = SessionOptions::default()
            .with_settings(self.settings.clone())
            .with_random(random)
            .with_clock(self.clock);
        AdaptiveSession::start(Arc::clone(&self.bank), lesson, options)
    }

    /// Answer a multiple-choice question; correct iff `option` is the canonical answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session is over,
    /// `SessionError::NoActiveQuestion` when nothing is being asked, or
    /// `SessionError::AlreadyAnswered` if the active question has an answer.
    pub fn answer_option(
        &self,
        session: &mut AdaptiveSession,
        option: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        let is_correct = active_question(session)?.is_correct_option(option);
        record(session, is_correct)
    }

    /// Record a flashcard-style self assessment for the active question.
    ///
    /// # Errors
    ///
    /// Same as [`answer_option`](Self::answer_option).
    pub fn self_evaluate(
        &self,
        session: &mut AdaptiveSession,
        assessment: SelfAssessment,
    ) -> Result<AnswerOutcome, SessionError> {
        active_question(session)?;
        record(session, assessment.is_correct())
    }

    /// Move on to the next question; `None` once the session has nothing left.
    pub fn next_question<'s>(&self, session: &'s mut AdaptiveSession) -> Option<&'s Question> {
        session.advance()
    }

    /// Summary of a completed session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` while the session is still running.
    pub fn finish(&self, session: &AdaptiveSession) -> Result<SessionSummary, SessionError> {
        let summary = session.summary()?;
        info!(
            session = %summary.session_id(),
            subject = %summary.subject_id(),
            answered = summary.answered(),
            correct = summary.correct(),
            overall = summary.overall_mastery(),
            "session finished"
        );
        Ok(summary)
    }
}

fn active_question(session: &AdaptiveSession) -> Result<&Question, SessionError> {
    if session.is_complete() {
        return Err(SessionError::Completed);
    }
    session.current_question().ok_or(SessionError::NoActiveQuestion)
}

fn record(session: &mut AdaptiveSession, is_correct: bool) -> Result<AnswerOutcome, SessionError> {
    let question = active_question(session)?.clone();
    if session.is_answered(question.id()) {
        return Err(SessionError::AlreadyAnswered);
    }
    let topic = session
        .record_answer(question.id(), is_correct)
        .cloned()
        .ok_or(SessionError::NoActiveQuestion)?;
    Ok(AnswerOutcome {
        question_id: question.id().clone(),
        is_correct,
        canonical_answer: question.answer().to_owned(),
        explanation: question.explanation().to_owned(),
        topic,
        overall_mastery: session.overall_mastery(),
    })
}
