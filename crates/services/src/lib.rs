#![forbid(unsafe_code)]

pub mod error;
pub mod isolation;
pub mod random;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::SessionError;
pub use isolation::{IsolationReport, LessonIsolation, audit_subject_isolation};
pub use random::RandomSource;

pub use sessions::{
    AdaptiveQuizService, AdaptiveSession, AnswerOutcome, MasteryReport, SessionOptions,
    SessionProgress,
};
