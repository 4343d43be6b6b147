use std::collections::HashSet;
use std::ops::Range;
use thiserror::Error;

use crate::model::ids::{LessonId, QuestionId, SubjectId};
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("subject name cannot be empty")]
    EmptySubjectName,

    #[error("subject {subject}: topic name cannot be empty")]
    EmptyTopicName { subject: SubjectId },

    #[error("duplicate subject id: {0}")]
    DuplicateSubject(SubjectId),

    #[error("subject {subject}: duplicate question id {question}")]
    DuplicateQuestion {
        subject: SubjectId,
        question: QuestionId,
    },

    #[error("question {question} belongs to subject {found}, filed under {expected}")]
    SubjectMismatch {
        question: QuestionId,
        expected: SubjectId,
        found: SubjectId,
    },

    #[error("lesson {lesson} maps to unknown subject {subject}")]
    UnknownLessonSubject { lesson: LessonId, subject: SubjectId },
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// A topic as handed over by a corpus loader, before being filed into a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDraft {
    pub name: String,
    pub description: String,
    pub questions: Vec<Question>,
}

/// Named partition of a subject. Its questions live contiguously in the
/// subject's flattened pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    name: String,
    description: String,
    range: Range<usize>,
}

impl Topic {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// A subject question bank: topics in corpus order over one flattened pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    id: SubjectId,
    name: String,
    description: String,
    topics: Vec<Topic>,
    questions: Vec<Question>,
}

impl Subject {
    /// Build a subject from its topics.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for blank names, duplicate question ids, or
    /// questions whose owning subject is not `id`.
    pub fn new(
        id: SubjectId,
        name: impl Into<String>,
        description: impl Into<String>,
        topics: Vec<TopicDraft>,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogError::EmptySubjectName);
        }

        let mut seen: HashSet<QuestionId> = HashSet::new();
        let mut questions = Vec::new();
        let mut filed = Vec::with_capacity(topics.len());

        for topic in topics {
            if topic.name.trim().is_empty() {
                return Err(CatalogError::EmptyTopicName { subject: id });
            }
            let start = questions.len();
            for question in topic.questions {
                if question.subject_id() != &id {
                    return Err(CatalogError::SubjectMismatch {
                        question: question.id().clone(),
                        expected: id,
                        found: question.subject_id().clone(),
                    });
                }
                if !seen.insert(question.id().clone()) {
                    return Err(CatalogError::DuplicateQuestion {
                        subject: id,
                        question: question.id().clone(),
                    });
                }
                questions.push(question);
            }
            filed.push(Topic {
                name: topic.name,
                description: topic.description,
                range: start..questions.len(),
            });
        }

        Ok(Self {
            id,
            name,
            description: description.into(),
            topics: filed,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// All questions of every topic, in topic order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Questions filed under the named topic; empty if the topic is absent.
    #[must_use]
    pub fn topic_questions(&self, topic_name: &str) -> &[Question] {
        match self.topics.iter().find(|t| t.name == topic_name) {
            Some(topic) => &self.questions[topic.range.clone()],
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::{Difficulty, QuestionDraft};

    fn question(id: &str, subject: &str, topic: &str) -> Question {
        QuestionDraft {
            id: id.into(),
            subject_id: SubjectId::new(subject),
            prompt: format!("Prompt {id}"),
            answer: "A".into(),
            explanation: String::new(),
            difficulty: Difficulty::Beginner,
            topic: topic.into(),
            options: None,
        }
        .validate()
        .unwrap()
    }

    fn topic(name: &str, questions: Vec<Question>) -> TopicDraft {
        TopicDraft {
            name: name.into(),
            description: String::new(),
            questions,
        }
    }

    #[test]
    fn subject_flattens_topics_in_order() {
        let subject = Subject::new(
            SubjectId::new("1"),
            "Data Structures",
            "",
            vec![
                topic("Trees", vec![question("t1", "1", "Trees"), question("t2", "1", "Trees")]),
                topic("Graphs", vec![question("g1", "1", "Graphs")]),
            ],
        )
        .unwrap();

        let ids: Vec<_> = subject.questions().iter().map(|q| q.id().as_str()).collect();
        assert_eq!(ids, ["t1", "t2", "g1"]);
        assert_eq!(subject.topic_questions("Graphs").len(), 1);
        assert!(subject.topic_questions("Heaps").is_empty());
        assert_eq!(subject.topics()[0].len(), 2);
    }

    #[test]
    fn question_from_other_subject_is_rejected() {
        let err = Subject::new(
            SubjectId::new("1"),
            "Data Structures",
            "",
            vec![topic("Trees", vec![question("t1", "2", "Trees")])],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::SubjectMismatch { .. }));
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let err = Subject::new(
            SubjectId::new("1"),
            "Data Structures",
            "",
            vec![
                topic("Trees", vec![question("x", "1", "Trees")]),
                topic("Graphs", vec![question("x", "1", "Graphs")]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateQuestion { .. }));
    }
}
