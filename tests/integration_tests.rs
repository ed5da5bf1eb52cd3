use chrono::{TimeZone, Utc};
use course_admin::database::{
    CollectionPath, Database, Document, DocumentStore, InMemoryStore, Query, SqliteStore, WriteBatch,
};
use course_admin::date_provider::FixedDateProvider;
use course_admin::error::StoreError;
use course_admin::models::{
    Course, CourseModule, CoursePatch, CourseStatus, Feedback, FeedbackStatus, Lesson, User, UserRole,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

/// Holds every commit at a barrier once armed, so two writers reach the store together
struct GatedStore {
    inner: Arc<dyn DocumentStore>,
    armed: AtomicBool,
    gate: Barrier,
}

impl GatedStore {
    fn new(inner: Arc<dyn DocumentStore>) -> Self {
        GatedStore {
            inner,
            armed: AtomicBool::new(false),
            gate: Barrier::new(2),
        }
    }
}

impl DocumentStore for GatedStore {
    fn list(&self, path: &CollectionPath, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.inner.list(path, query)
    }

    fn get(&self, path: &CollectionPath, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get(path, id)
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if self.armed.load(Ordering::SeqCst) {
            self.gate.wait();
        }
        self.inner.commit(batch)
    }
}

fn backends() -> Vec<(&'static str, Database)> {
    let clock = Arc::new(FixedDateProvider::new(
        Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap(),
    ));
    vec![
        (
            "memory",
            Database::with_date_provider(Arc::new(InMemoryStore::new()), clock.clone()),
        ),
        (
            "sqlite",
            Database::with_date_provider(Arc::new(SqliteStore::open(":memory:").unwrap()), clock),
        ),
    ]
}

fn course(title: &str) -> Course {
    Course {
        title: title.to_string(),
        description: "Course description".to_string(),
        duration: "4 weeks".to_string(),
        category: "Programming".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_create_then_get_returns_payload_and_timestamps() {
    for (name, db) in backends() {
        let id = db.courses().create(&course("Rust 101")).unwrap();
        let stored = db.courses().get_by_id(&id).unwrap().unwrap();

        assert_eq!(stored.id, id, "{}", name);
        assert_eq!(stored.title, "Rust 101", "{}", name);
        assert_eq!(stored.category, "Programming", "{}", name);
        assert_eq!(stored.status, CourseStatus::Draft, "{}", name);
        assert!(stored.created_at.is_some(), "{}", name);
        assert_eq!(stored.created_at, stored.updated_at, "{}", name);
    }
}

#[test]
fn test_partial_update_changes_only_given_fields() {
    for (name, db) in backends() {
        let id = db.courses().create(&course("Rust 101")).unwrap();
        db.courses()
            .update(
                &id,
                &CoursePatch {
                    title: Some("Rust 102".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let stored = db.courses().get_by_id(&id).unwrap().unwrap();
        assert_eq!(stored.title, "Rust 102", "{}", name);
        assert_eq!(stored.description, "Course description", "{}", name);
        assert_eq!(stored.duration, "4 weeks", "{}", name);
    }
}

#[test]
fn test_missing_reads_are_empty_not_errors() {
    for (name, db) in backends() {
        assert!(db.courses().get_by_id("nope").unwrap().is_none(), "{}", name);
        assert!(db.modules("nope").get_all().unwrap().is_empty(), "{}", name);
        assert!(
            matches!(
                db.users().update_role("nope", UserRole::Admin),
                Err(StoreError::NotFound { .. })
            ),
            "{}",
            name
        );
    }
}

#[test]
fn test_module_counter_follows_creates_and_deletes() {
    for (name, db) in backends() {
        let course_id = db.courses().create(&course("Rust 101")).unwrap();
        let modules = db.modules(&course_id);
        let a = modules.create(&CourseModule::default()).unwrap();
        let b = modules.create(&CourseModule::default()).unwrap();
        assert_eq!(db.courses().get_by_id(&course_id).unwrap().unwrap().module_count, 2, "{}", name);

        modules.delete(&a).unwrap();
        assert_eq!(db.courses().get_by_id(&course_id).unwrap().unwrap().module_count, 1, "{}", name);

        assert!(modules.delete(&a).is_err(), "{}", name);
        assert_eq!(db.courses().get_by_id(&course_id).unwrap().unwrap().module_count, 1, "{}", name);

        modules.delete(&b).unwrap();
        assert_eq!(db.courses().get_by_id(&course_id).unwrap().unwrap().module_count, 0, "{}", name);
    }
}

#[test]
fn test_counter_never_goes_negative() {
    for (name, db) in backends() {
        let course_id = db.courses().create(&course("Drifted")).unwrap();
        let module_id = db.modules(&course_id).create(&CourseModule::default()).unwrap();
        // Simulate a drifted counter
        let mut fields = course_admin::database::Fields::new();
        fields.insert("moduleCount".to_string(), 0.into());
        db.courses().update_fields(&course_id, fields).unwrap();

        db.modules(&course_id).delete(&module_id).unwrap();
        assert_eq!(db.courses().get_by_id(&course_id).unwrap().unwrap().module_count, 0, "{}", name);
    }
}

#[test]
fn test_concurrent_module_deletes_decrement_once_each() {
    for (name, db) in backends() {
        let course_id = db.courses().create(&course("Busy")).unwrap();
        let ids: Vec<String> = (0..8)
            .map(|_| db.modules(&course_id).create(&CourseModule::default()).unwrap())
            .collect();

        let handles: Vec<_> = ids
            .into_iter()
            .map(|module_id| {
                let db = db.clone();
                let course_id = course_id.clone();
                thread::spawn(move || db.modules(&course_id).delete(&module_id).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = db.courses().get_by_id(&course_id).unwrap().unwrap();
        assert_eq!(stored.module_count, 0, "{}", name);
        assert_eq!(db.modules(&course_id).count().unwrap(), 0, "{}", name);
    }
}

#[test]
fn test_racing_deletes_of_one_module_decrement_once() {
    let inner: Vec<(&str, Arc<dyn DocumentStore>)> = vec![
        ("memory", Arc::new(InMemoryStore::new())),
        ("sqlite", Arc::new(SqliteStore::open(":memory:").unwrap())),
    ];
    for (name, inner) in inner {
        let store = Arc::new(GatedStore::new(inner));
        let db = Database::new(store.clone());
        let course_id = db.courses().create(&course("Contended")).unwrap();
        let target = db.modules(&course_id).create(&CourseModule::default()).unwrap();
        db.modules(&course_id).create(&CourseModule::default()).unwrap();

        store.armed.store(true, Ordering::SeqCst);
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let db = db.clone();
                let course_id = course_id.clone();
                let target = target.clone();
                thread::spawn(move || db.modules(&course_id).delete(&target).is_ok())
            })
            .collect();
        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        store.armed.store(false, Ordering::SeqCst);

        assert_eq!(results.iter().filter(|ok| **ok).count(), 1, "{}", name);
        assert_eq!(db.modules(&course_id).count().unwrap(), 1, "{}", name);
        let stored = db.courses().get_by_id(&course_id).unwrap().unwrap();
        assert_eq!(stored.module_count, 1, "{}", name);
    }
}

#[test]
fn test_lessons_are_left_behind_when_module_is_deleted() {
    for (name, db) in backends() {
        let course_id = db.courses().create(&course("Rust 101")).unwrap();
        let module_id = db.modules(&course_id).create(&CourseModule::default()).unwrap();
        db.lessons(&course_id, &module_id).create(&Lesson::default()).unwrap();

        db.modules(&course_id).delete(&module_id).unwrap();
        assert_eq!(db.lessons(&course_id, &module_id).count().unwrap(), 1, "{}", name);
    }
}

#[test]
fn test_lessons_in_display_order() {
    for (name, db) in backends() {
        let lessons = db.lessons("c1", "m1");
        for order in [3, 1, 2] {
            lessons
                .create(&Lesson {
                    order,
                    title: format!("Lesson {}", order),
                    ..Default::default()
                })
                .unwrap();
        }
        let titles: Vec<String> = lessons.get_all().unwrap().into_iter().map(|l| l.title).collect();
        assert_eq!(titles, vec!["Lesson 1", "Lesson 2", "Lesson 3"], "{}", name);
    }
}

#[test]
fn test_feedback_resolution_and_user_lookup() {
    for (name, db) in backends() {
        let user_id = db
            .users()
            .create(&User {
                email: "sam@example.com".to_string(),
                ..Default::default()
            })
            .unwrap();
        let feedback_id = db
            .feedback()
            .create(&Feedback {
                user_id: user_id.clone(),
                message: "Typo in lesson 2".to_string(),
                ..Default::default()
            })
            .unwrap();

        db.feedback().update_status(&feedback_id, FeedbackStatus::Resolved).unwrap();
        let feedback = db.feedback().get_by_id(&feedback_id).unwrap().unwrap();
        assert!(feedback.resolved_at.is_some(), "{}", name);

        let user = db.users().find_by_email("sam@example.com").unwrap().unwrap();
        assert_eq!(user.id, user_id, "{}", name);
    }
}

#[test]
fn test_sqlite_file_persists_between_opens() {
    let path = std::env::temp_dir().join(format!("course_admin_it_{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let path_str = path.to_string_lossy().to_string();

    {
        let db = Database::open(&path_str).unwrap();
        db.courses().create(&course("Persistent")).unwrap();
    }
    let db = Database::open(&path_str).unwrap();
    let courses = db.courses().get_all().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].title, "Persistent");

    drop(db);
    let _ = std::fs::remove_file(&path);
}
