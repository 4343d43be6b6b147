use quiz_core::mastery::MasteryTier;
use quiz_core::model::{QuizSettings, SessionSummary, TopicMetrics};
use serde::Serialize;

/// One row of a mastery report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicMasteryItem {
    pub topic: String,
    pub mastery: u8,
    pub attempts: u32,
    pub correct: u32,
}

impl TopicMasteryItem {
    #[must_use]
    pub fn from_metrics(metrics: &TopicMetrics) -> Self {
        Self {
            topic: metrics.topic().to_owned(),
            mastery: metrics.mastery(),
            attempts: metrics.total_attempts(),
            correct: metrics.correct_answers(),
        }
    }
}

/// Topics grouped by mastery tier for an end-of-session screen.
///
/// This is intentionally **not** a UI view-model: no pre-formatted strings,
/// and each tier keeps the order the metrics were given in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MasteryReport {
    pub mastered: Vec<TopicMasteryItem>,
    pub progressing: Vec<TopicMasteryItem>,
    pub needs_work: Vec<TopicMasteryItem>,
    pub unattempted: Vec<String>,
}

impl MasteryReport {
    #[must_use]
    pub fn from_metrics<'a>(
        metrics: impl IntoIterator<Item = &'a TopicMetrics>,
        settings: &QuizSettings,
    ) -> Self {
        let mut report = Self::default();
        for m in metrics {
            match MasteryTier::of(m, settings) {
                MasteryTier::Mastered => report.mastered.push(TopicMasteryItem::from_metrics(m)),
                MasteryTier::Progressing => {
                    report.progressing.push(TopicMasteryItem::from_metrics(m));
                }
                MasteryTier::NeedsWork => report.needs_work.push(TopicMasteryItem::from_metrics(m)),
                MasteryTier::Unattempted => report.unattempted.push(m.topic().to_owned()),
            }
        }
        report
    }

    #[must_use]
    pub fn from_summary(summary: &SessionSummary, settings: &QuizSettings) -> Self {
        Self::from_metrics(summary.topics(), settings)
    }

    /// Number of topics that received at least one answer.
    #[must_use]
    pub fn attempted_topics(&self) -> usize {
        self.mastered.len() + self.progressing.len() + self.needs_work.len()
    }
}
