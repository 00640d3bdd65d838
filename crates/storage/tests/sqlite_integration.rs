use chrono::Duration;
use quiz_core::model::{EnrollmentNumber, NewAttempt, Student, SubjectId};
use quiz_core::stats::summarize;
use quiz_core::time::{fixed_clock, fixed_now};
use storage::repository::{QuizHistoryRepository, RecordStore, StorageError, StudentRepository};
use storage::sqlite::SqliteRepository;

fn enrollment(raw: &str) -> EnrollmentNumber {
    EnrollmentNumber::new(raw).unwrap()
}

fn attempt(raw: &str, score: u32, total: u32) -> NewAttempt {
    NewAttempt {
        enrollment_number: enrollment(raw),
        subject_id: Some(SubjectId::default()),
        score,
        total_questions: total,
        correct_answers: score,
        quiz_data: Some(r#"{"questions":[],"userAnswers":{}}"#.into()),
    }
}

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_students_upsert_and_lookup() {
    let repo = connect("memdb_students").await;

    let err = repo.get_student(&enrollment("E1")).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));

    repo.upsert_student(&Student::new(enrollment("E1"), "Asha"))
        .await
        .unwrap();
    repo.upsert_student(&Student::new(enrollment("E1"), "Asha Rao"))
        .await
        .unwrap();
    let student = repo.get_student(&enrollment("E1")).await.unwrap();
    assert_eq!(student.name, "Asha Rao");
    assert_eq!(student.first_name(), "Asha");
}

#[tokio::test]
async fn sqlite_lists_attempts_newest_first() {
    let repo = connect("memdb_history").await;
    for raw in ["E1", "E2"] {
        repo.upsert_student(&Student::new(enrollment(raw), raw))
            .await
            .unwrap();
    }

    let mut clock = fixed_clock();
    let older = repo
        .clone()
        .with_clock(clock)
        .append_attempt(attempt("E1", 10, 20))
        .await
        .unwrap();
    clock.advance(Duration::days(1));
    repo.clone()
        .with_clock(clock)
        .append_attempt(attempt("E2", 20, 20))
        .await
        .unwrap();
    clock.advance(Duration::days(1));
    let newer = repo
        .clone()
        .with_clock(clock)
        .append_attempt(attempt("E1", 15, 20))
        .await
        .unwrap();

    let listed = repo.list_attempts(&enrollment("E1")).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|a| a.id).collect();
    assert_eq!(ids, [newer.id, older.id]);
    assert_eq!(listed[0].attempted_at, fixed_now() + Duration::days(2));
    assert_eq!(listed[1].quiz_data, older.quiz_data);
    assert!(listed[0].subject_id.as_ref().unwrap().is_default());

    let summary = summarize(&listed);
    assert_eq!(summary.count, 2);
    assert!((summary.average_percent - 62.5).abs() < 1e-9);
    assert!((summary.best_percent - 75.0).abs() < 1e-9);
}

#[tokio::test]
async fn sqlite_rejects_attempt_for_unknown_student() {
    let repo = connect("memdb_fk").await;
    let err = repo.append_attempt(attempt("NOPE", 1, 1)).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict), "{err:?}");
}

#[tokio::test]
async fn sqlite_record_store_migrates_twice() {
    let url = "sqlite:file:memdb_store?mode=memory&cache=shared";
    let store = RecordStore::sqlite(url).await.expect("first open");
    store
        .students
        .upsert_student(&Student::new(enrollment("E9"), "Nine"))
        .await
        .unwrap();
    let again = RecordStore::sqlite(url).await.expect("second open");
    assert_eq!(
        again.students.get_student(&enrollment("E9")).await.unwrap().name,
        "Nine"
    );
}
