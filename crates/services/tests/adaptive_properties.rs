use std::collections::HashSet;
use std::sync::Arc;

use quiz_core::QuestionBank;
use quiz_core::mastery::CompletionReason;
use quiz_core::model::{
    Difficulty, LessonId, Question, QuestionDraft, QuestionId, Subject, SubjectId, TopicDraft,
};
use quiz_core::time::fixed_now;
use services::{AdaptiveSession, Clock, RandomSource, SessionOptions};
use storage::{CorpusSource, sample_corpus};

fn question(subject: &str, id: &str, topic: &str, difficulty: Difficulty) -> Question {
    QuestionDraft {
        id: id.into(),
        subject_id: SubjectId::new(subject),
        prompt: format!("prompt {id}"),
        answer: "answer".into(),
        explanation: String::new(),
        difficulty,
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

/// Topic A: 5 beginner questions, topic B: 3 intermediate questions.
fn two_topic_bank() -> Arc<QuestionBank> {
    let a = (1..=5)
        .map(|i| question("s", &format!("a{i}"), "A", Difficulty::Beginner))
        .collect();
    let b = (1..=3)
        .map(|i| question("s", &format!("b{i}"), "B", Difficulty::Intermediate))
        .collect();
    let subject = Subject::new(
        SubjectId::new("s"),
        "Scenario",
        "",
        vec![topic("A", a), topic("B", b)],
    )
    .unwrap();
    Arc::new(
        QuestionBank::new(vec![subject], [(LessonId::new("L"), SubjectId::new("s"))]).unwrap(),
    )
}

fn seeded(seed: u64) -> SessionOptions {
    SessionOptions::default()
        .with_random(RandomSource::seeded(seed))
        .with_clock(Clock::fixed(fixed_now()))
}

fn answer(session: &mut AdaptiveSession, correct: bool) -> QuestionId {
    let id = session.current_question().unwrap().id().clone();
    session.record_answer(&id, correct).unwrap();
    id
}

/// Answers until the session stops asking, using `pattern` cyclically.
fn run_to_end(session: &mut AdaptiveSession, pattern: &[bool]) -> Vec<QuestionId> {
    let mut asked = Vec::new();
    let mut turn = 0;
    while session.current_question().is_some() {
        asked.push(answer(session, pattern[turn % pattern.len()]));
        turn += 1;
        session.advance();
    }
    asked
}

#[test]
fn sessions_never_leave_their_subject() {
    let bank = Arc::new(sample_corpus().load().unwrap().bank);
    let lessons: Vec<(LessonId, SubjectId)> = bank
        .lessons()
        .map(|(l, s)| (l.clone(), s.clone()))
        .collect();

    for seed in 0..10 {
        for (lesson, subject) in &lessons {
            let mut session = AdaptiveSession::start(Arc::clone(&bank), lesson, seeded(seed));
            let mut subjects = Vec::new();
            while let Some(q) = session.current_question() {
                subjects.push(q.subject_id().clone());
                let id = q.id().clone();
                session.record_answer(&id, seed % 2 == 0);
                session.advance();
            }
            assert!(subjects.iter().all(|s| s == subject), "lesson {lesson}");
        }
    }
}

#[test]
fn advance_never_repeats_a_question() {
    let bank = Arc::new(sample_corpus().load().unwrap().bank);
    for seed in 0..20 {
        let mut session =
            AdaptiveSession::start(Arc::clone(&bank), &LessonId::new("1"), seeded(seed));
        let asked = run_to_end(&mut session, &[false, true, false]);
        let distinct: HashSet<_> = asked.iter().collect();
        assert_eq!(distinct.len(), asked.len(), "seed {seed}");
    }
}

#[test]
fn topic_mastery_stays_bounded_and_drops_after_a_miss() {
    let mut session = AdaptiveSession::start(two_topic_bank(), &LessonId::new("L"), seeded(1));
    let before = answer(&mut session, true);
    let topic = session.pool().iter().find(|q| q.id() == &before).unwrap().topic().to_owned();
    let perfect = session.topic_metrics(&topic).unwrap().mastery();
    assert_eq!(perfect, 100);

    // Stay on the same topic until it is answered again.
    loop {
        let next = session.advance().unwrap();
        if next.topic() == topic {
            break;
        }
        answer(&mut session, true);
    }
    answer(&mut session, false);

    let after = session.topic_metrics(&topic).unwrap().mastery();
    assert!(after < perfect);
    assert!(session.metrics().values().all(|m| m.mastery() <= 100));
}

#[test]
fn overall_mastery_is_pooled_not_averaged() {
    // Only the first A answer is correct, so per-topic averages drift from the pooled ratio.
    let mut session = AdaptiveSession::start(two_topic_bank(), &LessonId::new("L"), seeded(3));
    let mut correct = 0_u32;
    let mut total = 0_u32;
    let mut a_seen = false;
    while total < 4 {
        let is_a = session.current_question().unwrap().topic() == "A";
        let is_correct = is_a && !a_seen;
        a_seen |= is_a;
        answer(&mut session, is_correct);
        total += 1;
        correct += u32::from(is_correct);
        session.advance().unwrap();

        let expected = (f64::from(correct) / f64::from(total) * 100.0).round();
        assert_eq!(f64::from(session.overall_mastery()), expected);
    }
}

#[test]
fn answering_every_question_completes_the_session() {
    for pattern in [&[false][..], &[false, false, true][..]] {
        let mut session = AdaptiveSession::start(two_topic_bank(), &LessonId::new("L"), seeded(5));
        let asked = run_to_end(&mut session, pattern);

        assert_eq!(asked.len(), session.pool_size());
        assert!(session.is_complete());
        assert_eq!(session.completion(), Some(CompletionReason::AllAnswered));
        assert!(session.advance().is_none());
    }
}

#[test]
fn repeated_answers_cannot_fake_completion() {
    let a = (1..=4)
        .map(|i| question("s", &format!("a{i}"), "A", Difficulty::Beginner))
        .collect();
    let subject = Subject::new(SubjectId::new("s"), "S", "", vec![topic("A", a)]).unwrap();
    let bank = Arc::new(QuestionBank::new(vec![subject], []).unwrap());
    let mut session = AdaptiveSession::start(bank, &LessonId::new("s"), seeded(2));

    let first = answer(&mut session, false);
    for _ in 0..3 {
        assert!(session.record_answer(&first, false).is_none());
    }

    assert_eq!(session.answered_count(), 1);
    assert_eq!(session.progress_percent(), 25);
    assert_eq!(session.topic_metrics("A").unwrap().total_attempts(), 1);
    assert_eq!(session.evaluate_completion(), None);

    session.advance().unwrap();
    let asked = run_to_end(&mut session, &[false]);
    assert_eq!(asked.len(), 3);
    assert_eq!(session.completion(), Some(CompletionReason::AllAnswered));
}

#[test]
fn initial_set_covers_every_topic_before_repeating_one() {
    let bank = sample_corpus().load().unwrap().bank;
    let subject = SubjectId::new("1");
    let topics = bank.topics_for_subject(&subject);

    for count in topics.len()..=bank.total_question_count(&subject) {
        let set = bank.initial_question_set(&subject, count);
        assert_eq!(set.len(), count);
        let head: HashSet<&str> = set[..topics.len()].iter().map(|q| q.topic()).collect();
        assert_eq!(head.len(), topics.len());
    }
}

#[test]
fn two_topic_scenario_excludes_zero_mastery_from_weak_areas() {
    let bank = two_topic_bank();
    let subject = SubjectId::new("s");
    let opening = bank.initial_question_set(&subject, 2);
    let topics: Vec<&str> = opening.iter().map(|q| q.topic()).collect();
    assert_eq!(topics, ["A", "B"]);

    let mut session = AdaptiveSession::start(Arc::clone(&bank), &LessonId::new("L"), seeded(9));
    answer(&mut session, false);
    session.advance().unwrap();
    answer(&mut session, false);

    assert_eq!(session.answered_count(), 2);
    assert_eq!(session.overall_mastery(), 0);
    assert!(session.weak_areas().is_empty());
}

#[test]
fn struggling_learner_stays_on_topic_and_difficulty() {
    let a = vec![
        question("s", "a1", "A", Difficulty::Beginner),
        question("s", "a2", "A", Difficulty::Beginner),
        question("s", "a3", "A", Difficulty::Beginner),
        question("s", "a4", "A", Difficulty::Intermediate),
    ];
    let b = vec![question("s", "b1", "B", Difficulty::Beginner)];
    let subject =
        Subject::new(SubjectId::new("s"), "S", "", vec![topic("A", a), topic("B", b)]).unwrap();
    let bank = Arc::new(QuestionBank::new(vec![subject], []).unwrap());

    for seed in 0..10 {
        let mut session =
            AdaptiveSession::start(Arc::clone(&bank), &LessonId::new("s"), seeded(seed));
        assert_eq!(session.current_question().unwrap().topic(), "A");
        answer(&mut session, false);

        // Breadth moves to B after a single miss; answer it and come back to A.
        let mut next = session.advance().unwrap().clone();
        if next.topic() == "B" {
            answer(&mut session, true);
            next = session.advance().unwrap().clone();
        }
        assert_eq!(next.topic(), "A");
        answer(&mut session, false);

        let metrics = session.topic_metrics("A").unwrap();
        assert_eq!(metrics.total_attempts(), 2);
        assert!(metrics.is_struggling(session.settings()));

        let remedial = session.advance().unwrap();
        assert_eq!(remedial.topic(), "A");
        assert_eq!(remedial.difficulty(), Difficulty::Beginner);
    }
}

#[test]
fn progress_snapshot_serializes_for_a_ui() {
    let bank = Arc::new(sample_corpus().load().unwrap().bank);
    let mut session = AdaptiveSession::start(bank, &LessonId::new("2"), seeded(4));
    answer(&mut session, true);
    session.advance();

    let json = serde_json::to_value(session.progress()).unwrap();
    assert_eq!(json["answered"], 1);
    assert_eq!(json["displayed_total"], 5);
    assert_eq!(json["progress_percent"], 20);
    assert_eq!(json["is_complete"], false);
    assert_eq!(json["completion"], serde_json::Value::Null);
    assert_eq!(json["subject_id"], "2");
    assert!(json["current_question"]["prompt"].is_string());
    assert_eq!(json["metrics"].as_array().unwrap().len(), 2);
}
