#![forbid(unsafe_code)]

pub mod json;
pub mod repository;

pub use json::JsonCorpus;
pub use repository::{CorpusSource, InMemorySource, LoadedCorpus, StorageError};

/// Small bundled corpus (Data Structures, Operating Systems and an empty Algorithms bank).
pub const SAMPLE_CORPUS: &str = include_str!("../data/sample_corpus.json");

/// The bundled corpus as a loadable source.
#[must_use]
pub fn sample_corpus() -> JsonCorpus {
    JsonCorpus::from_text(SAMPLE_CORPUS)
}
