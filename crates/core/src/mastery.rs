//! Mastery arithmetic and completion rules shared by adaptive sessions.
//!
//! All functions are pure; the session layer feeds them its running counters.

use serde::Serialize;

use crate::model::{QuizSettings, TopicMetrics};

/// Lower bound of the "progressing" tier in mastery reports.
pub const PROGRESSING_FLOOR: u8 = 50;

fn rounded_percent(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    // round half up, matching the usual display rounding of percentages
    let scaled = (part.saturating_mul(200) + whole) / whole.saturating_mul(2);
    u8::try_from(scaled.min(100)).unwrap_or(100)
}

/// Rounded percentage `part / whole × 100`, 0 when `whole` is 0, capped at 100.
#[must_use]
pub fn percent(part: u32, whole: u32) -> u8 {
    rounded_percent(u64::from(part), u64::from(whole))
}

/// Pooled mastery across all topics: total correct over total attempts.
///
/// This is not an average of per-topic mastery values.
#[must_use]
pub fn overall_mastery<'a>(metrics: impl IntoIterator<Item = &'a TopicMetrics>) -> u8 {
    let (correct, attempts) = metrics.into_iter().fold((0_u64, 0_u64), |(c, a), m| {
        (
            c + u64::from(m.correct_answers()),
            a + u64::from(m.total_attempts()),
        )
    });
    rounded_percent(correct, attempts)
}

/// Topics flagged as weak areas, in iteration order.
#[must_use]
pub fn weak_areas<'a>(
    metrics: impl IntoIterator<Item = &'a TopicMetrics>,
    settings: &QuizSettings,
) -> Vec<String> {
    metrics
        .into_iter()
        .filter(|m| m.is_weak_area(settings))
        .map(|m| m.topic().to_owned())
        .collect()
}

/// Number of questions progress is displayed against.
#[must_use]
pub fn displayed_total(pool_size: usize, settings: &QuizSettings) -> usize {
    pool_size.min(settings.display_cap())
}

/// Displayed progress, `answered / min(cap, pool)`, capped at 100.
#[must_use]
pub fn progress_percent(answered: usize, pool_size: usize, settings: &QuizSettings) -> u8 {
    let total = displayed_total(pool_size, settings);
    rounded_percent(
        u64::try_from(answered).unwrap_or(u64::MAX),
        u64::try_from(total).unwrap_or(u64::MAX),
    )
}

//
// ─── COMPLETION ────────────────────────────────────────────────────────────────
//

/// Why a session transitioned to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// Every sufficiently attempted topic reached the mastery threshold.
    TopicsMastered,
    /// Every question of the subject pool was answered.
    AllAnswered,
    /// Enough questions answered with overall mastery at the threshold.
    MasteryReached,
}

/// Evaluate the completion rules in order; `None` while the session should continue.
#[must_use]
pub fn completion_reason<'a>(
    metrics: impl IntoIterator<Item = &'a TopicMetrics>,
    answered: usize,
    pool_size: usize,
    overall: u8,
    settings: &QuizSettings,
) -> Option<CompletionReason> {
    let mut measured = 0_usize;
    let mut all_mastered = true;
    for m in metrics {
        if m.total_attempts() >= settings.min_attempts_for_mastery() {
            measured += 1;
            all_mastered &= m.mastery() >= settings.mastery_threshold();
        }
    }

    if measured > 0 && all_mastered {
        return Some(CompletionReason::TopicsMastered);
    }
    if pool_size > 0 && answered >= pool_size {
        return Some(CompletionReason::AllAnswered);
    }
    if answered >= displayed_total(pool_size, settings) && overall >= settings.mastery_threshold() {
        return Some(CompletionReason::MasteryReached);
    }
    None
}

//
// ─── TIERS ─────────────────────────────────────────────────────────────────────
//

/// Bucket of a topic in an end-of-session mastery report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryTier {
    Mastered,
    Progressing,
    NeedsWork,
    Unattempted,
}

impl MasteryTier {
    #[must_use]
    pub fn of(metrics: &TopicMetrics, settings: &QuizSettings) -> Self {
        if metrics.total_attempts() == 0 {
            MasteryTier::Unattempted
        } else if metrics.mastery() >= settings.mastery_threshold() {
            MasteryTier::Mastered
        } else if metrics.mastery() >= PROGRESSING_FLOOR {
            MasteryTier::Progressing
        } else {
            MasteryTier::NeedsWork
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(topic: &str, answers: &[bool]) -> TopicMetrics {
        let settings = QuizSettings::standard();
        let mut m = TopicMetrics::new(topic);
        for &a in answers {
            m.record(a, &settings);
        }
        m
    }

    #[test]
    fn percent_handles_zero_and_rounding() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(5, 5), 100);
    }

    #[test]
    fn overall_mastery_is_pooled_not_averaged() {
        // topic A: 1/1 = 100%, topic B: 1/3 = 33%; average would be 67, pooled is 2/4
        let a = metrics("A", &[true]);
        let b = metrics("B", &[true, false, false]);
        assert_eq!(overall_mastery([&a, &b]), 50);
    }

    #[test]
    fn weak_areas_exclude_zero_and_threshold() {
        let settings = QuizSettings::standard();
        let zero = metrics("Zero", &[false, false]);
        let half = metrics("Half", &[true, false]);
        let good = metrics("Good", &[true, true, true]);
        assert_eq!(weak_areas([&zero, &half, &good], &settings), vec!["Half"]);
    }

    #[test]
    fn progress_uses_display_cap() {
        let settings = QuizSettings::standard();
        assert_eq!(displayed_total(40, &settings), 15);
        assert_eq!(displayed_total(8, &settings), 8);
        assert_eq!(progress_percent(3, 40, &settings), 20);
        assert_eq!(progress_percent(30, 40, &settings), 100);
        assert_eq!(progress_percent(0, 0, &settings), 0);
    }

    #[test]
    fn completion_requires_a_measured_topic() {
        let settings = QuizSettings::standard();
        let a = metrics("A", &[true, true]);
        assert_eq!(completion_reason([&a], 2, 10, 100, &settings), None);

        let a = metrics("A", &[true, true, true]);
        assert_eq!(
            completion_reason([&a], 3, 10, 100, &settings),
            Some(CompletionReason::TopicsMastered)
        );
    }

    #[test]
    fn completion_on_exhaustion_ignores_score() {
        let settings = QuizSettings::standard();
        let a = metrics("A", &[false, false]);
        assert_eq!(
            completion_reason([&a], 2, 2, 0, &settings),
            Some(CompletionReason::AllAnswered)
        );
    }

    #[test]
    fn completion_by_overall_mastery_after_minimum() {
        let settings = QuizSettings::standard();
        let a = metrics("A", &[true, true, true, false]);
        let b = metrics("B", &[true, true, true, true, true, true, true, true, true, true, true]);
        // A is measured but below 80%, so topic rule fails; 14/15 overall passes
        assert_eq!(
            completion_reason([&a, &b], 15, 40, 93, &settings),
            Some(CompletionReason::MasteryReached)
        );
        assert_eq!(completion_reason([&a, &b], 14, 40, 93, &settings), None);
    }

    #[test]
    fn tiers_follow_thresholds() {
        let settings = QuizSettings::standard();
        assert_eq!(MasteryTier::of(&metrics("A", &[]), &settings), MasteryTier::Unattempted);
        assert_eq!(MasteryTier::of(&metrics("A", &[true]), &settings), MasteryTier::Mastered);
        assert_eq!(
            MasteryTier::of(&metrics("A", &[true, false]), &settings),
            MasteryTier::Progressing
        );
        assert_eq!(
            MasteryTier::of(&metrics("A", &[false, false, true]), &settings),
            MasteryTier::NeedsWork
        );
        assert_eq!(MasteryTier::of(&metrics("A", &[false]), &settings), MasteryTier::NeedsWork);
    }
}
