mod ids;
mod metrics;
mod question;
mod settings;
mod subject;
mod summary;

pub use ids::{LessonId, QuestionId, SessionId, SubjectId};
pub use metrics::{AnswerEvent, TopicMetrics};
pub use question::{Difficulty, Question, QuestionDraft, QuestionError, SelfAssessment};
pub use settings::{QuizSettings, SettingsError};
pub use subject::{CatalogError, Subject, Topic, TopicDraft};
pub use summary::{SessionSummary, SessionSummaryError};
