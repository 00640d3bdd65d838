use dioxus::prelude::ReadableExt;
use std::path::PathBuf;

use quiz_core::model::{AnswerOption, EnrollmentNumber, NewAttempt, Student, SubjectId};
use services::QuestionLocation;
use storage::repository::{QuizHistoryRepository, StudentRepository};

use super::test_harness::{ViewHarness, ViewKind, setup_view_harness, temp_bank};
use crate::vm::{EMPTY_BANK_NOTICE, QuizIntent};

fn enrollment() -> EnrollmentNumber {
    EnrollmentNumber::new("E1").unwrap()
}

async fn seed_student(harness: &ViewHarness) {
    harness
        .store
        .students
        .upsert_student(&Student::new(enrollment(), "Asha Rao"))
        .await
        .expect("upsert student");
}

async fn seed_attempt(harness: &ViewHarness, subject: Option<&str>, score: u32) {
    harness
        .store
        .history
        .append_attempt(NewAttempt {
            enrollment_number: enrollment(),
            subject_id: subject.map(|s| SubjectId::new(s).unwrap()),
            score,
            total_questions: 20,
            correct_answers: score,
            quiz_data: None,
        })
        .await
        .expect("append attempt");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_summary() {
    let mut harness = setup_view_harness(
        ViewKind::Dashboard("E1".into()),
        QuestionLocation::default(),
        None,
    );
    seed_student(&harness).await;
    seed_attempt(&harness, None, 9).await;
    seed_attempt(&harness, Some("Physics"), 17).await;

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Welcome back, Asha!"), "missing greeting in {html}");
    assert!(html.contains("Total Quizzes"), "missing stats in {html}");
    assert!(html.contains("65.0%"), "missing average in {html}");
    assert!(html.contains("85.0%"), "missing best in {html}");
    assert!(html.contains("Start New Quiz"), "missing quiz link in {html}");
    assert!(
        !html.contains("Track your progress over time"),
        "history should start collapsed: {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_falls_back_to_launch_identity() {
    let mut harness = setup_view_harness(
        ViewKind::Dashboard(String::new()),
        QuestionLocation::default(),
        Some(enrollment()),
    );
    seed_student(&harness).await;

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Welcome back, Asha!"), "missing greeting in {html}");
    assert!(html.contains("0.0%"), "missing empty average in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_missing_student() {
    let mut harness = setup_view_harness(
        ViewKind::Dashboard("NOPE".into()),
        QuestionLocation::default(),
        None,
    );
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("No student found. Please login via CMS first."),
        "missing notice in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_loads_into_ready_state() {
    let bank = temp_bank("ready", 25);
    let mut harness = setup_view_harness(
        ViewKind::Quiz("E1".into()),
        QuestionLocation::File(bank.clone()),
        None,
    );

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Loading questions..."), "missing loading in {html}");

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Quiz Challenge"), "missing title in {html}");
    assert!(html.contains("20 Random Questions"), "missing count in {html}");
    assert!(html.contains("30 Minutes Time Limit"), "missing limit in {html}");
    assert!(html.contains("Start Quiz"), "missing start in {html}");
    let _ = std::fs::remove_file(bank);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_flags_an_empty_bank() {
    let bank = temp_bank("empty", 0);
    let mut harness = setup_view_harness(
        ViewKind::Quiz("E1".into()),
        QuestionLocation::File(bank.clone()),
        None,
    );
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("0 Random Questions"), "missing count in {html}");
    assert!(html.contains(EMPTY_BANK_NOTICE), "missing notice in {html}");

    harness.dispatch(QuizIntent::Start);
    let html = harness.render();
    assert!(html.contains(EMPTY_BANK_NOTICE), "start should be refused: {html}");
    assert!(!html.contains("Question 1 of"), "quiz should not begin: {html}");
    let _ = std::fs::remove_file(bank);
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_load_error() {
    let mut harness = setup_view_harness(
        ViewKind::Quiz("E1".into()),
        QuestionLocation::File(PathBuf::from("/definitely/not/here.csv")),
        None,
    );
    harness.rebuild();
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Error Loading Quiz"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");

    harness.dispatch(QuizIntent::Retry);
    let html = harness.render();
    assert!(html.contains("Loading questions..."), "retry should reload: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_runs_a_full_attempt() {
    let bank = temp_bank("full", 3);
    let mut harness = setup_view_harness(
        ViewKind::Quiz("E1".into()),
        QuestionLocation::File(bank.clone()),
        None,
    );
    seed_student(&harness).await;
    harness.rebuild();
    harness.settle().await;

    harness.dispatch(QuizIntent::Start);
    let html = harness.render();
    assert!(html.contains("Question 1 of 3"), "missing position in {html}");
    assert!(html.contains("30:00"), "missing timer in {html}");
    assert!(html.contains("Previous"), "missing nav in {html}");

    for _ in 0..2 {
        harness.dispatch(QuizIntent::Select(AnswerOption::A));
        harness.dispatch(QuizIntent::Next);
    }
    harness.dispatch(QuizIntent::Select(AnswerOption::B));
    let html = harness.render();
    assert!(html.contains("Submit Quiz"), "last question offers submit: {html}");

    harness.dispatch(QuizIntent::Submit);
    let html = harness.render();
    assert!(html.contains("Quiz Completed!"), "missing results in {html}");
    assert!(html.contains("2/3"), "missing score in {html}");
    assert!(html.contains("Correct Answer: A"), "missing correction in {html}");

    let mut stored = Vec::new();
    for _ in 0..20 {
        stored = harness
            .store
            .history
            .list_attempts(&enrollment())
            .await
            .expect("list attempts");
        if !stored.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].score, 2);

    harness.dispatch(QuizIntent::Reset);
    let html = harness.render();
    assert!(html.contains("Start Quiz"), "reset returns to ready: {html}");
    let session = harness.quiz_handles.as_ref().unwrap().session();
    assert!(harness.dom.in_runtime(|| session.read().answers().is_empty()));
    let _ = std::fs::remove_file(bank);
}
