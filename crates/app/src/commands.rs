use anyhow::{Context, Result, bail};
use tracing::info;

use quiz_core::model::{Difficulty, LessonId, SelfAssessment};
use services::{AdaptiveQuizService, MasteryReport, RandomSource, audit_subject_isolation};
use storage::CorpusSource;

pub fn audit(source: &dyn CorpusSource, extra: &[String]) -> Result<()> {
    let corpus = source.load().context("loading question corpus")?;
    let mut lessons: Vec<LessonId> = corpus.bank.lessons().map(|(l, _)| l.clone()).collect();
    lessons.extend(extra.iter().map(|l| LessonId::new(l.as_str())));

    let report = audit_subject_isolation(&corpus.bank, &lessons);
    for lesson in &report.lessons {
        let status = if lesson.is_empty() { "empty" } else { "ok" };
        let fallback = if lesson.fallback { " (unmapped)" } else { "" };
        println!(
            "{status:5} lesson {} -> subject {}{fallback}: {} questions, {} topics",
            lesson.lesson,
            lesson.subject,
            lesson.questions,
            lesson.topics.len()
        );
    }
    info!(
        lessons = report.lessons.len(),
        empty = report.empty_lessons().count(),
        "audit finished"
    );
    Ok(())
}

pub fn topics(source: &dyn CorpusSource, only: Option<&str>) -> Result<()> {
    let corpus = source.load().context("loading question corpus")?;
    let bank = &corpus.bank;

    let mut shown = 0;
    for subject in bank.subjects() {
        if only.is_some_and(|id| id != subject.id().as_str()) {
            continue;
        }
        shown += 1;
        println!(
            "{} {} ({} questions)",
            subject.id(),
            subject.name(),
            subject.questions().len()
        );
        for topic in subject.topics() {
            let levels: Vec<String> = Difficulty::ALL
                .iter()
                .map(|&d| {
                    let n = subject
                        .topic_questions(topic.name())
                        .iter()
                        .filter(|q| q.difficulty() == d)
                        .count();
                    format!("{d}={n}")
                })
                .collect();
            println!("  {:24} {}", topic.name(), levels.join(" "));
        }
    }

    if let Some(id) = only {
        if shown == 0 {
            bail!("unknown subject {id}");
        }
    }
    Ok(())
}

pub fn simulate(
    source: &dyn CorpusSource,
    lesson: &str,
    seed: Option<u64>,
    accuracy: f64,
    json: bool,
) -> Result<()> {
    if !(0.0..=1.0).contains(&accuracy) {
        bail!("accuracy must be within 0..=1, got {accuracy}");
    }
    let mut service =
        AdaptiveQuizService::from_source(source).context("loading question corpus")?;
    let mut learner = match seed {
        Some(seed) => {
            service = service.with_seed(seed);
            RandomSource::seeded(seed.wrapping_add(1))
        }
        None => RandomSource::default(),
    };

    let lesson = LessonId::new(lesson);
    let mut session = service.start_session(&lesson);
    if session.is_empty() {
        bail!(
            "lesson {lesson} maps to subject {} which has no questions",
            session.subject_id()
        );
    }
    info!(lesson = %lesson, subject = %session.subject_id(), accuracy, "simulation started");

    while let Some(question) = session.current_question() {
        if !json {
            println!(
                "[{:>3}%] {} ({}, {})",
                session.progress_percent(),
                question.id(),
                question.topic(),
                question.difficulty()
            );
        }
        let assessment = if learner.chance(accuracy) {
            SelfAssessment::Easy
        } else {
            SelfAssessment::Hard
        };
        let outcome = service.self_evaluate(&mut session, assessment)?;
        if !json {
            let mark = if outcome.is_correct { "correct" } else { "wrong" };
            println!(
                "       {mark}; {} now {}%, overall {}%",
                outcome.topic.topic(),
                outcome.topic.mastery(),
                outcome.overall_mastery
            );
        }
        service.next_question(&mut session);
    }

    let summary = service.finish(&session)?;
    let report = MasteryReport::from_summary(&summary, service.settings());
    if json {
        let value = serde_json::json!({ "summary": summary, "report": report });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!(
        "complete ({:?}): {} answered, {} correct, overall mastery {}%",
        summary.reason(),
        summary.answered(),
        summary.correct(),
        summary.overall_mastery()
    );
    for item in &report.mastered {
        println!("  mastered     {:24} {:>3}%", item.topic, item.mastery);
    }
    for item in &report.progressing {
        println!("  progressing  {:24} {:>3}%", item.topic, item.mastery);
    }
    for item in &report.needs_work {
        println!("  needs work   {:24} {:>3}%", item.topic, item.mastery);
    }
    for topic in &report.unattempted {
        println!("  unattempted  {topic}");
    }
    if !session.weak_areas().is_empty() {
        println!("weak areas: {}", session.weak_areas().join(", "));
    }

    if let Some(subject) = service.bank().subject(summary.subject_id()) {
        info!(subject = subject.name(), "simulation finished");
    }
    Ok(())
}
