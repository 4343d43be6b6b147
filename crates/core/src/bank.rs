//! Read-only index over the fixed subject → topic → question hierarchy.
//!
//! Every lookup is total: unknown subjects or topics yield empty results so a
//! caller can always render "no questions" instead of handling an error.

use std::collections::{BTreeMap, HashMap};

use crate::model::{CatalogError, Difficulty, LessonId, Question, QuestionId, Subject, SubjectId};

/// Immutable question corpus shared by every session.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    subjects: Vec<Subject>,
    index: HashMap<SubjectId, usize>,
    lessons: BTreeMap<LessonId, SubjectId>,
}

impl QuestionBank {
    /// Build a bank from validated subjects and a lesson → subject table.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateSubject` if two subjects share an id, or
    /// `CatalogError::UnknownLessonSubject` if a lesson points at a missing subject.
    pub fn new(
        subjects: Vec<Subject>,
        lessons: impl IntoIterator<Item = (LessonId, SubjectId)>,
    ) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(subjects.len());
        for (position, subject) in subjects.iter().enumerate() {
            if index.insert(subject.id().clone(), position).is_some() {
                return Err(CatalogError::DuplicateSubject(subject.id().clone()));
            }
        }

        let mut table = BTreeMap::new();
        for (lesson, subject) in lessons {
            if !index.contains_key(&subject) {
                return Err(CatalogError::UnknownLessonSubject { lesson, subject });
            }
            table.insert(lesson, subject);
        }

        Ok(Self {
            subjects,
            index,
            lessons: table,
        })
    }

    /// Translate a UI lesson id into the subject owning its question pool.
    ///
    /// Unmapped lessons fall back to a subject with the same id.
    #[must_use]
    pub fn map_lesson_to_subject(&self, lesson: &LessonId) -> SubjectId {
        self.lessons
            .get(lesson)
            .cloned()
            .unwrap_or_else(|| SubjectId::new(lesson.as_str()))
    }

    #[must_use]
    pub fn subject(&self, id: &SubjectId) -> Option<&Subject> {
        self.index.get(id).map(|&i| &self.subjects[i])
    }

    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.iter()
    }

    /// Explicit lesson mappings, ordered by lesson id.
    pub fn lessons(&self) -> impl Iterator<Item = (&LessonId, &SubjectId)> {
        self.lessons.iter()
    }

    /// All questions of a subject, flattened in topic order.
    #[must_use]
    pub fn questions_for_subject(&self, subject: &SubjectId) -> &[Question] {
        self.subject(subject).map(Subject::questions).unwrap_or(&[])
    }

    /// Questions of exactly one topic of a subject.
    #[must_use]
    pub fn questions_for_topic(&self, subject: &SubjectId, topic_name: &str) -> &[Question] {
        self.subject(subject)
            .map(|s| s.topic_questions(topic_name))
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn questions_by_difficulty(
        &self,
        subject: &SubjectId,
        difficulty: Difficulty,
    ) -> Vec<&Question> {
        self.questions_for_subject(subject)
            .iter()
            .filter(|q| q.difficulty() == difficulty)
            .collect()
    }

    #[must_use]
    pub fn question(&self, subject: &SubjectId, id: &QuestionId) -> Option<&Question> {
        self.questions_for_subject(subject)
            .iter()
            .find(|q| q.id() == id)
    }

    #[must_use]
    pub fn total_question_count(&self, subject: &SubjectId) -> usize {
        self.questions_for_subject(subject).len()
    }

    /// Distinct topic labels present in the subject's questions, in first-seen order.
    #[must_use]
    pub fn topics_for_subject(&self, subject: &SubjectId) -> Vec<&str> {
        let mut topics: Vec<&str> = Vec::new();
        for question in self.questions_for_subject(subject) {
            if !topics.contains(&question.topic()) {
                topics.push(question.topic());
            }
        }
        topics
    }

    /// Starting questions for a session, breadth before depth.
    ///
    /// 1. one question per topic: its first beginner question, or its first
    ///    question of the easiest difficulty it has;
    /// 2. remaining beginner questions;
    /// 3. intermediate questions;
    /// 4. anything left;
    ///
    /// truncated to `count`.
    #[must_use]
    pub fn initial_question_set(&self, subject: &SubjectId, count: usize) -> Vec<&Question> {
        let pool = self.questions_for_subject(subject);
        if pool.is_empty() || count == 0 {
            return Vec::new();
        }

        let mut taken = vec![false; pool.len()];
        let mut picked: Vec<usize> = Vec::new();

        for topic in self.topics_for_subject(subject) {
            let first = pool
                .iter()
                .enumerate()
                .filter(|(_, q)| q.topic() == topic)
                .min_by_key(|(i, q)| (q.difficulty(), *i))
                .map(|(i, _)| i);
            if let Some(i) = first {
                taken[i] = true;
                picked.push(i);
            }
        }

        let mut backfill = |accept: &dyn Fn(&Question) -> bool| {
            for (i, question) in pool.iter().enumerate() {
                if picked.len() >= count {
                    break;
                }
                if !taken[i] && accept(question) {
                    taken[i] = true;
                    picked.push(i);
                }
            }
        };
        backfill(&|q| q.difficulty() == Difficulty::Beginner);
        backfill(&|q| q.difficulty() == Difficulty::Intermediate);
        backfill(&|_| true);

        picked.truncate(count);
        picked.into_iter().map(|i| &pool[i]).collect()
    }
}
