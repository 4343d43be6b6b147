use serde::Serialize;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("{name} must be between 1 and 100, got {value}")]
    InvalidThreshold { name: &'static str, value: u8 },

    #[error("minimum attempts for mastery must be > 0")]
    InvalidMinAttempts,

    #[error("struggle detection attempts must be > 0")]
    InvalidStruggleAttempts,

    #[error("display cap must be > 0")]
    InvalidDisplayCap,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Policy thresholds for adaptive sessions.
///
/// Two separate "weak" signals exist on purpose:
/// - `weak_area_threshold` flags topics surfaced to the learner (any attempts);
/// - `mastery_threshold` with `min_attempts_for_mastery` drives reinforcement
///   and completion inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizSettings {
    mastery_threshold: u8,
    min_attempts_for_mastery: u32,
    struggle_min_attempts: u32,
    struggle_threshold: u8,
    weak_area_threshold: u8,
    display_cap: usize,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self::standard()
    }
}

impl QuizSettings {
    /// Standard thresholds:
    /// - 80% mastery after at least 3 attempts
    /// - struggling below 70% after 2 attempts
    /// - weak areas below 70%
    /// - progress displayed against at most 15 questions
    #[must_use]
    pub fn standard() -> Self {
        Self {
            mastery_threshold: 80,
            min_attempts_for_mastery: 3,
            struggle_min_attempts: 2,
            struggle_threshold: 70,
            weak_area_threshold: 70,
            display_cap: 15,
        }
    }

    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a threshold is outside 1..=100 or a count is zero.
    pub fn new(
        mastery_threshold: u8,
        min_attempts_for_mastery: u32,
        struggle_min_attempts: u32,
        struggle_threshold: u8,
        weak_area_threshold: u8,
        display_cap: usize,
    ) -> Result<Self, SettingsError> {
        for (name, value) in [
            ("mastery threshold", mastery_threshold),
            ("struggle threshold", struggle_threshold),
            ("weak area threshold", weak_area_threshold),
        ] {
            if !(1..=100).contains(&value) {
                return Err(SettingsError::InvalidThreshold { name, value });
            }
        }
        if min_attempts_for_mastery == 0 {
            return Err(SettingsError::InvalidMinAttempts);
        }
        if struggle_min_attempts == 0 {
            return Err(SettingsError::InvalidStruggleAttempts);
        }
        if display_cap == 0 {
            return Err(SettingsError::InvalidDisplayCap);
        }

        Ok(Self {
            mastery_threshold,
            min_attempts_for_mastery,
            struggle_min_attempts,
            struggle_threshold,
            weak_area_threshold,
            display_cap,
        })
    }

    /// Mastery percentage a topic (or the whole session) must reach.
    #[must_use]
    pub fn mastery_threshold(&self) -> u8 {
        self.mastery_threshold
    }

    /// Attempts required before a topic's mastery is judged.
    #[must_use]
    pub fn min_attempts_for_mastery(&self) -> u32 {
        self.min_attempts_for_mastery
    }

    #[must_use]
    pub fn struggle_min_attempts(&self) -> u32 {
        self.struggle_min_attempts
    }

    #[must_use]
    pub fn struggle_threshold(&self) -> u8 {
        self.struggle_threshold
    }

    #[must_use]
    pub fn weak_area_threshold(&self) -> u8 {
        self.weak_area_threshold
    }

    /// Upper bound on the question count progress is displayed against.
    #[must_use]
    pub fn display_cap(&self) -> usize {
        self.display_cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_settings_match_defaults() {
        let s = QuizSettings::default();
        assert_eq!(s.mastery_threshold(), 80);
        assert_eq!(s.min_attempts_for_mastery(), 3);
        assert_eq!(s.struggle_min_attempts(), 2);
        assert_eq!(s.struggle_threshold(), 70);
        assert_eq!(s.weak_area_threshold(), 70);
        assert_eq!(s.display_cap(), 15);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = QuizSettings::new(101, 3, 2, 70, 70, 15).unwrap_err();
        assert_eq!(
            err,
            SettingsError::InvalidThreshold {
                name: "mastery threshold",
                value: 101
            }
        );
    }

    #[test]
    fn rejects_zero_display_cap() {
        assert_eq!(
            QuizSettings::new(80, 3, 2, 70, 70, 0).unwrap_err(),
            SettingsError::InvalidDisplayCap
        );
    }
}
