use thiserror::Error;

use crate::model::{CatalogError, QuestionError, SessionSummaryError, SettingsError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}
