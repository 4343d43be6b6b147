//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::SessionSummaryError;
use storage::StorageError;

/// Errors emitted by session workflows.
///
/// The engine itself never fails on missing data; these cover caller misuse
/// such as answering when nothing is being asked.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no question is currently active")]
    NoActiveQuestion,
    #[error("the active question has already been answered")]
    AlreadyAnswered,
    #[error("session already completed")]
    Completed,
    #[error("session is not complete yet")]
    NotComplete,
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
