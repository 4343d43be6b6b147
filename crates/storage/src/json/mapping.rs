use quiz_core::QuestionBank;
use quiz_core::model::{
    Difficulty, LessonId, QuestionDraft, QuizSettings, Subject, SubjectId, TopicDraft,
};

use super::records::{CorpusRecord, QuestionRecord, SettingsRecord, SubjectRecord};
use crate::repository::{LoadedCorpus, StorageError};

fn invalid(path: String, source: impl Into<quiz_core::Error>) -> StorageError {
    StorageError::Invalid {
        path,
        source: source.into(),
    }
}

pub(crate) fn map_settings(record: SettingsRecord) -> Result<QuizSettings, StorageError> {
    let standard = QuizSettings::standard();
    QuizSettings::new(
        record
            .mastery_threshold
            .unwrap_or(standard.mastery_threshold()),
        record
            .min_attempts_for_mastery
            .unwrap_or(standard.min_attempts_for_mastery()),
        record
            .struggle_min_attempts
            .unwrap_or(standard.struggle_min_attempts()),
        record
            .struggle_threshold
            .unwrap_or(standard.struggle_threshold()),
        record
            .weak_area_threshold
            .unwrap_or(standard.weak_area_threshold()),
        record.display_cap.unwrap_or(standard.display_cap()),
    )
    .map_err(|e| invalid("settings".into(), e))
}

fn map_question(
    path: String,
    subject_id: &SubjectId,
    topic_name: &str,
    record: QuestionRecord,
) -> Result<quiz_core::model::Question, StorageError> {
    let difficulty: Difficulty = record
        .difficulty
        .parse()
        .map_err(|e| invalid(format!("{path}.difficulty"), e))?;

    QuestionDraft {
        id: record.id,
        subject_id: subject_id.clone(),
        prompt: record.question,
        answer: record.answer,
        explanation: record.explanation,
        difficulty,
        topic: record
            .subcategory
            .unwrap_or_else(|| topic_name.to_owned()),
        options: record.options,
    }
    .validate()
    .map_err(|e| invalid(path, e))
}

pub(crate) fn map_subject(index: usize, record: SubjectRecord) -> Result<Subject, StorageError> {
    let subject_id = SubjectId::new(record.id);
    let mut topics = Vec::with_capacity(record.topics.len());

    for (t, topic) in record.topics.into_iter().enumerate() {
        let questions = topic
            .questions
            .into_iter()
            .enumerate()
            .map(|(q, question)| {
                map_question(
                    format!("subjects[{index}].topics[{t}].questions[{q}]"),
                    &subject_id,
                    &topic.name,
                    question,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        topics.push(TopicDraft {
            name: topic.name,
            description: topic.description,
            questions,
        });
    }

    Subject::new(subject_id, record.subject, record.description, topics)
        .map_err(|e| invalid(format!("subjects[{index}]"), e))
}

pub(crate) fn map_corpus(record: CorpusRecord) -> Result<LoadedCorpus, StorageError> {
    let settings = match record.settings {
        Some(settings) => map_settings(settings)?,
        None => QuizSettings::standard(),
    };

    let subjects = record
        .subjects
        .into_iter()
        .enumerate()
        .map(|(i, subject)| map_subject(i, subject))
        .collect::<Result<Vec<_>, _>>()?;

    let lessons = record
        .lessons
        .into_iter()
        .map(|(lesson, subject)| (LessonId::new(lesson), SubjectId::new(subject)));

    let bank = QuestionBank::new(subjects, lessons)?;
    Ok(LoadedCorpus { bank, settings })
}
