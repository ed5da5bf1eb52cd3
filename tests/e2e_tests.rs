use course_admin::auth::{AuthService, StaticCredentialVerifier};
use course_admin::database::{Database, InMemoryStore};
use course_admin::error::AuthError;
use course_admin::models::{Course, CourseModule, CoursePatch, CourseStatus, User, UserRole};
use course_admin::views::{
    CoursesSource, CoursesView, DashboardSource, DashboardView, ModulesSource, ModulesView, Section,
};
use std::sync::Arc;

fn admin_db() -> Database {
    let db = Database::in_memory();
    db.users()
        .create(&User {
            email: "admin@example.com".to_string(),
            role: UserRole::Admin,
            ..Default::default()
        })
        .unwrap();
    db
}

#[test]
fn test_admin_edits_course_catalogue() {
    let db = admin_db();
    let verifier = Arc::new(StaticCredentialVerifier::new().with_account("admin@example.com", "pw"));
    let mut auth = AuthService::new(db.clone(), verifier);
    auth.sign_in("admin@example.com", "pw").unwrap();

    let mut courses = CoursesView::new(db.clone(), CoursesSource);
    assert!(courses.data().is_empty());

    let course_id = courses
        .create(&Course {
            title: "Intro to Rust".to_string(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(courses.data().len(), 1);

    courses
        .update(
            &course_id,
            &CoursePatch {
                status: Some(CourseStatus::Published),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(courses.data()[0].status, CourseStatus::Published);

    let mut modules = ModulesView::new(db.clone(), ModulesSource::new(&course_id));
    modules.create(&CourseModule::default()).unwrap();
    modules.create(&CourseModule::default()).unwrap();

    // The course list only sees the new counter after its own refresh
    assert_eq!(courses.data()[0].module_count, 0);
    courses.refresh();
    assert_eq!(courses.data()[0].module_count, 2);

    courses.delete(&course_id).unwrap();
    assert!(courses.data().is_empty());
    auth.sign_out();
    assert!(!auth.is_authenticated());
}

#[test]
fn test_student_cannot_open_dashboard() {
    let db = Database::in_memory();
    db.users()
        .create(&User {
            email: "kid@example.com".to_string(),
            role: UserRole::Student,
            ..Default::default()
        })
        .unwrap();
    let verifier = Arc::new(StaticCredentialVerifier::new().with_account("kid@example.com", "pw"));
    let mut auth = AuthService::new(db, verifier.clone());

    let err = auth.sign_in("kid@example.com", "pw").unwrap_err();
    assert!(matches!(err, AuthError::NotAuthorized { .. }));
    assert!(!auth.is_authenticated());
    assert!(auth.session().is_none());
    assert_eq!(verifier.sign_out_count(), 1);
}

#[test]
fn test_views_share_one_store() {
    let store = Arc::new(InMemoryStore::new());
    let first = CoursesView::new(Database::new(store.clone()), CoursesSource);
    let mut second = CoursesView::new(Database::new(store), CoursesSource);
    assert!(first.data().is_empty());

    second.create(&Course::default()).unwrap();
    assert_eq!(second.data().len(), 1);
    assert!(first.data().is_empty());
}

#[test]
fn test_dashboard_keeps_other_reports_during_feedback_outage() {
    let store = Arc::new(InMemoryStore::new());
    let db = Database::new(store.clone());
    db.users().create(&User::default()).unwrap();
    store.simulate_outage("feedback");

    let mut dashboard = DashboardView::new(db, DashboardSource { seed: Some(5) });
    assert!(dashboard.error().is_none());
    assert_eq!(dashboard.data().activity.len(), 7);
    assert!(dashboard.data().error_for(Section::FeedbackStatus).is_some());

    store.restore();
    dashboard.refresh();
    assert!(dashboard.data().errors.is_empty());
    assert_eq!(dashboard.data().activity.len(), 7);
}
