use std::collections::HashSet;

use quiz_core::model::{Difficulty, Question, QuestionId};
use serde::Serialize;

use crate::random::RandomSource;

/// Rule of the selection policy that produced a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionBranch {
    /// Remediation: same topic and difficulty as the question just answered.
    SameTopicSameDifficulty,
    /// Remediation: same topic, one level easier.
    SameTopicEasier,
    /// Remediation: same topic, any level.
    SameTopicAny,
    /// Breadth: beginner question of another topic with questions left.
    OtherTopicBeginner,
    /// Breadth: any question of that other topic.
    OtherTopicAny,
    /// Progression: one level harder, any topic.
    NextDifficulty,
    /// Whatever is left.
    AnyRemaining,
}

/// Chosen question as an index into the subject pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub branch: SelectionBranch,
}

/// Picks the next question after `current` has been answered.
///
/// Rules are tried in order and the first non-empty candidate set wins;
/// within it the pick is uniform. Questions in `answered` are never returned.
/// `None` means the pool is exhausted.
pub fn select_next(
    pool: &[Question],
    current: &Question,
    answered: &HashSet<&QuestionId>,
    struggling: bool,
    random: &mut RandomSource,
) -> Option<Selection> {
    let available: Vec<usize> = pool
        .iter()
        .enumerate()
        .filter(|(_, q)| !answered.contains(q.id()))
        .map(|(i, _)| i)
        .collect();
    if available.is_empty() {
        return None;
    }

    let candidates = |accept: &dyn Fn(&Question) -> bool| -> Vec<usize> {
        available
            .iter()
            .copied()
            .filter(|&i| accept(&pool[i]))
            .collect()
    };

    let topic = current.topic();
    let difficulty = current.difficulty();

    if struggling {
        let same = candidates(&|q| q.topic() == topic && q.difficulty() == difficulty);
        if let Some(s) = choose(random, SelectionBranch::SameTopicSameDifficulty, &same) {
            return Some(s);
        }
        if let Some(easier) = difficulty.easier() {
            let easier = candidates(&|q| q.topic() == topic && q.difficulty() == easier);
            if let Some(s) = choose(random, SelectionBranch::SameTopicEasier, &easier) {
                return Some(s);
            }
        }
        let same_topic = candidates(&|q| q.topic() == topic);
        if let Some(s) = choose(random, SelectionBranch::SameTopicAny, &same_topic) {
            return Some(s);
        }
    }

    let mut other_topics: Vec<&str> = Vec::new();
    for &i in &available {
        let t = pool[i].topic();
        if t != topic && !other_topics.contains(&t) {
            other_topics.push(t);
        }
    }
    if let Some(target) = random.pick(&other_topics) {
        let beginners =
            candidates(&|q| q.topic() == target && q.difficulty() == Difficulty::Beginner);
        if let Some(s) = choose(random, SelectionBranch::OtherTopicBeginner, &beginners) {
            return Some(s);
        }
        let rest = candidates(&|q| q.topic() == target);
        if let Some(s) = choose(random, SelectionBranch::OtherTopicAny, &rest) {
            return Some(s);
        }
    }

    if let Some(harder) = difficulty.harder() {
        let harder = candidates(&|q| q.difficulty() == harder);
        if let Some(s) = choose(random, SelectionBranch::NextDifficulty, &harder) {
            return Some(s);
        }
    }

    choose(random, SelectionBranch::AnyRemaining, &available)
}

fn choose(
    random: &mut RandomSource,
    branch: SelectionBranch,
    candidates: &[usize],
) -> Option<Selection> {
    random
        .pick(candidates)
        .map(|index| Selection { index, branch })
}
