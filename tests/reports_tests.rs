use chrono::{NaiveDate, TimeZone, Utc};
use course_admin::database::{CollectionPath, Database, DocumentStore, Fields, InMemoryStore, WriteBatch, collections};
use course_admin::date_provider::FixedDateProvider;
use course_admin::models::{AssessmentScore, Course, FeedbackStatus, TechnicalAssessment, User};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use std::sync::Arc;

fn create_test_db() -> Database {
    let clock = FixedDateProvider::new(Utc.with_ymd_and_hms(2024, 6, 2, 18, 30, 0).unwrap());
    Database::with_date_provider(Arc::new(InMemoryStore::new()), Arc::new(clock))
}

fn raw_user(db: &Database, id: &str, body: serde_json::Value) {
    let fields: Fields = body.as_object().cloned().unwrap_or_default();
    let mut batch = WriteBatch::new();
    batch.set(&CollectionPath::new(collections::USERS), id, fields);
    db.store().commit(batch).unwrap();
}

#[test]
fn test_feedback_report_from_store() {
    let db = create_test_db();
    for status in ["new", "new", "resolved", "resolved", "resolved"] {
        let mut fields = Fields::new();
        fields.insert("status".to_string(), json!(status));
        let mut batch = WriteBatch::new();
        batch.set(
            &CollectionPath::new(collections::FEEDBACK),
            &course_admin::database::new_document_id(),
            fields,
        );
        db.store().commit(batch).unwrap();
    }

    let slices = db.analytics().feedback_status().compute().unwrap();
    let summary: Vec<(FeedbackStatus, usize, i64)> =
        slices.iter().map(|s| (s.status, s.count, s.percentage)).collect();
    assert_eq!(
        summary,
        vec![(FeedbackStatus::New, 2, 40), (FeedbackStatus::Resolved, 3, 60)]
    );
}

#[test]
fn test_assessment_report_reads_legacy_score_shapes() {
    let db = create_test_db();
    let id = db
        .assessments()
        .create(&TechnicalAssessment {
            title: "Fix it".to_string(),
            category: "Rust".to_string(),
            ..Default::default()
        })
        .unwrap();

    raw_user(&db, "u1", json!({ "assessmentScores": { (id.as_str()): 85 } }));
    raw_user(&db, "u2", json!({ "assessmentScores": { (id.as_str()): { "score": 30, "attempts": 2 } } }));
    raw_user(&db, "u3", json!({ "assessmentScores": { (id.as_str()): { "score": 10, "passed": true } } }));
    raw_user(&db, "u4", json!({ "assessmentScores": "corrupted" }));

    let rows = db.analytics().assessment_performance().compute().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].submissions, 3);
    assert_eq!(rows[0].passed, 2);
    assert_eq!(rows[0].pass_rate, 67);
}

#[test]
fn test_course_report_excludes_courses_without_learners() {
    let db = create_test_db();
    let taken = db
        .courses()
        .create(&Course {
            title: "Taken".to_string(),
            ..Default::default()
        })
        .unwrap();
    db.courses()
        .create(&Course {
            title: "Nobody".to_string(),
            ..Default::default()
        })
        .unwrap();
    let user = db.users().create(&User::default()).unwrap();
    db.progress().set_course_progress(&user, &taken, 30.0).unwrap();

    let rows = db.analytics().course_progress().compute().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Taken");
    assert_eq!(rows[0].average_completion, 30);
}

#[test]
fn test_activity_report_is_reproducible_with_seed() {
    let db = create_test_db();
    let user = db.users().create(&User::default()).unwrap();
    for _ in 0..14 {
        db.progress().record_login(&user, "web").unwrap();
    }

    let report = db.analytics().activity();
    let first = report.compute(&mut StdRng::seed_from_u64(11)).unwrap();
    let second = report.compute(&mut StdRng::seed_from_u64(11)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.last().unwrap().date, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
    assert!(first.iter().all(|d| (2..=2).contains(&d.count)));
}

#[test]
fn test_reports_on_empty_store() {
    let db = create_test_db();
    let analytics = db.analytics();
    assert!(analytics.feedback_status().compute().unwrap().is_empty());
    assert!(analytics.assessment_performance().compute().unwrap().is_empty());
    assert!(analytics.course_progress().compute().unwrap().is_empty());
    assert_eq!(analytics.activity().total_events().unwrap(), 0);
}

#[test]
fn test_score_entry_decodes_from_number() {
    let score: AssessmentScore = serde_json::from_value(json!(70)).unwrap();
    assert!(score.is_passed());
}

#[test]
fn test_feedback_with_both_body_fields_is_counted() {
    let db = create_test_db();
    let fields: Fields = json!({"status": "resolved", "message": "m", "feedback": "f"})
        .as_object()
        .cloned()
        .unwrap_or_default();
    let mut batch = WriteBatch::new();
    batch.set(&CollectionPath::new(collections::FEEDBACK), "f1", fields);
    db.store().commit(batch).unwrap();

    assert_eq!(db.feedback().get_all().unwrap().len(), 1);
    let slices = db.analytics().feedback_status().compute().unwrap();
    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].status, FeedbackStatus::Resolved);
    assert_eq!(slices[0].percentage, 100);
}
