use serde::Deserialize;
use std::collections::BTreeMap;

/// Top-level corpus document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CorpusRecord {
    #[serde(default)]
    pub settings: Option<SettingsRecord>,
    #[serde(default)]
    pub lessons: BTreeMap<String, String>,
    pub subjects: Vec<SubjectRecord>,
}

/// Partial settings override; missing fields keep the standard value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SettingsRecord {
    pub mastery_threshold: Option<u8>,
    pub min_attempts_for_mastery: Option<u32>,
    pub struggle_min_attempts: Option<u32>,
    pub struggle_threshold: Option<u8>,
    pub weak_area_threshold: Option<u8>,
    pub display_cap: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SubjectRecord {
    pub id: String,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub topics: Vec<TopicRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TopicRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct QuestionRecord {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
    pub difficulty: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
}
