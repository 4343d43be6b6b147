use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, rng};

/// Source of randomness for tie-breaks among equally eligible questions.
///
/// `Thread` is the production default; `Seeded` makes selection reproducible.
#[derive(Debug, Clone, Default)]
pub enum RandomSource {
    #[default]
    Thread,
    Seeded(StdRng),
}

impl RandomSource {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(StdRng::seed_from_u64(seed))
    }

    fn index(&mut self, len: usize) -> usize {
        match self {
            RandomSource::Thread => rng().random_range(0..len),
            RandomSource::Seeded(r) => r.random_range(0..len),
        }
    }

    /// Uniformly pick one item; `None` for an empty slice.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let i = self.index(items.len());
        Some(items[i])
    }

    /// True with the given probability (clamped to `[0, 1]`).
    pub fn chance(&mut self, probability: f64) -> bool {
        let p = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        match self {
            RandomSource::Thread => rng().random_bool(p),
            RandomSource::Seeded(r) => r.random_bool(p),
        }
    }
}
