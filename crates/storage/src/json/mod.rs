use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::repository::{CorpusSource, LoadedCorpus, StorageError};

mod mapping;
mod records;

#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Text(String),
}

/// Question corpus stored as a JSON document.
#[derive(Debug, Clone)]
pub struct JsonCorpus {
    origin: Origin,
}

impl JsonCorpus {
    /// Corpus read from a file each time it is loaded.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            origin: Origin::File(path.as_ref().to_path_buf()),
        }
    }

    /// Corpus held in memory, e.g. embedded with `include_str!`.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::Text(text.into()),
        }
    }

    fn parse(text: &str) -> Result<LoadedCorpus, StorageError> {
        let record: records::CorpusRecord = serde_json::from_str(text)?;
        let corpus = mapping::map_corpus(record)?;
        for subject in corpus.bank.subjects() {
            debug!(
                subject = %subject.id(),
                name = subject.name(),
                topics = subject.topics().len(),
                questions = subject.questions().len(),
                "subject loaded"
            );
        }
        Ok(corpus)
    }
}

impl CorpusSource for JsonCorpus {
    fn load(&self) -> Result<LoadedCorpus, StorageError> {
        let corpus = match &self.origin {
            Origin::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
                    path: path.clone(),
                    source,
                })?;
                Self::parse(&text)?
            }
            Origin::Text(text) => Self::parse(text)?,
        };
        info!(
            subjects = corpus.bank.subjects().count(),
            lessons = corpus.bank.lessons().count(),
            "question corpus loaded"
        );
        Ok(corpus)
    }
}
