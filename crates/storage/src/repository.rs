use std::path::PathBuf;

use quiz_core::QuestionBank;
use quiz_core::model::{CatalogError, LessonId, QuizSettings, Subject, SubjectId};
use thiserror::Error;

/// Errors surfaced while loading a question corpus.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("failed to read corpus {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed corpus: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid corpus entry at {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: quiz_core::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A validated corpus: the shared question bank plus the session policy it ships with.
#[derive(Debug, Clone)]
pub struct LoadedCorpus {
    pub bank: QuestionBank,
    pub settings: QuizSettings,
}

/// Source of the static question corpus, read once at process start.
pub trait CorpusSource: Send + Sync {
    /// Load and validate the whole corpus.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the corpus cannot be read or fails validation.
    fn load(&self) -> Result<LoadedCorpus, StorageError>;
}

/// Corpus assembled in code, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    subjects: Vec<Subject>,
    lessons: Vec<(LessonId, SubjectId)>,
    settings: QuizSettings,
}

impl InMemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    #[must_use]
    pub fn with_lesson(mut self, lesson: impl Into<String>, subject: impl Into<String>) -> Self {
        self.lessons
            .push((LessonId::new(lesson), SubjectId::new(subject)));
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: QuizSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl CorpusSource for InMemorySource {
    fn load(&self) -> Result<LoadedCorpus, StorageError> {
        let bank = QuestionBank::new(self.subjects.clone(), self.lessons.clone())?;
        Ok(LoadedCorpus {
            bank,
            settings: self.settings.clone(),
        })
    }
}
