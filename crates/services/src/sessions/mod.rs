mod progress;
mod selection;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use selection::{Selection, SelectionBranch, select_next};
pub use service::{AdaptiveSession, SessionOptions};
pub use view::{MasteryReport, TopicMasteryItem};
pub use workflow::{AdaptiveQuizService, AnswerOutcome};
