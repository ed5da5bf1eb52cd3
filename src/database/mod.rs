pub mod analytics;
pub mod assessments;
pub mod batch;
pub mod connection;
pub mod courses;
pub mod feedback;
pub mod memory;
pub mod path;
pub mod problems;
pub mod progress;
pub mod query;
pub mod repository;
pub mod sqlite;
pub mod users;

use crate::date_provider::{DateProvider, SystemDateProvider};
use crate::error::StoreError;
use serde_json::Value;
use std::sync::Arc;

pub use analytics::Analytics;
pub use assessments::{AssessmentsRepository, QuizzesRepository};
pub use batch::{WriteBatch, WriteOp};
pub use courses::{CoursesRepository, LessonsRepository, ModulesRepository};
pub use feedback::FeedbackRepository;
pub use memory::InMemoryStore;
pub use path::CollectionPath;
pub use problems::{AchievementsRepository, DailyChallengesRepository, DailyProblemsRepository};
pub use progress::ProgressRepository;
pub use query::{Direction, OrderBy, Query};
pub use repository::{Entity, Repository, new_document_id};
pub use sqlite::SqliteStore;
pub use users::UsersRepository;

/// Field map of a stored document
pub type Fields = serde_json::Map<String, Value>;

/// One stored document: its id within the collection plus its fields
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Backend holding documents grouped by collection path.
///
/// Reads of a missing document or collection are not errors. A [`WriteBatch`] is applied
/// all-or-nothing.
pub trait DocumentStore: Send + Sync {
    fn list(&self, path: &CollectionPath, query: &Query) -> Result<Vec<Document>, StoreError>;

    fn get(&self, path: &CollectionPath, id: &str) -> Result<Option<Document>, StoreError>;

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

/// Top-level and nested collection names
pub mod collections {
    pub const COURSES: &str = "courses";
    pub const MODULES: &str = "modules";
    pub const LESSONS: &str = "lessons";
    pub const USERS: &str = "users";
    pub const QUIZZES: &str = "quizzes";
    pub const ASSESSMENTS: &str = "assessments";
    pub const FEEDBACK: &str = "feedback";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const DAILY_PROBLEMS: &str = "daily_problems";
    pub const DAILY_CHALLENGES: &str = "daily_challenges";
    pub const LOGIN_TRACKING: &str = "login_tracking";
    pub const DAILY_PROBLEM_PROGRESS: &str = "daily_problem_progress";
    pub const USER_PROGRESS: &str = "user_progress";
}

/// Main Database struct providing access to all repositories
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn DocumentStore>,
    date_provider: Arc<dyn DateProvider>,
}

impl Database {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_date_provider(store, Arc::new(SystemDateProvider))
    }

    pub fn with_date_provider(store: Arc<dyn DocumentStore>, date_provider: Arc<dyn DateProvider>) -> Self {
        Database {
            store,
            date_provider,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    /// Opens (and migrates) the SQLite file at `db_path`
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        Ok(Self::new(Arc::new(SqliteStore::open(db_path)?)))
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn date_provider(&self) -> &Arc<dyn DateProvider> {
        &self.date_provider
    }

    // ===== Content =====

    pub fn courses(&self) -> CoursesRepository<'_> {
        Repository::courses(self.store.as_ref(), self.date_provider.as_ref())
    }

    pub fn modules(&self, course_id: &str) -> ModulesRepository<'_> {
        ModulesRepository::new(self.store.as_ref(), self.date_provider.as_ref(), course_id)
    }

    pub fn lessons(&self, course_id: &str, module_id: &str) -> LessonsRepository<'_> {
        Repository::lessons(
            self.store.as_ref(),
            self.date_provider.as_ref(),
            course_id,
            module_id,
        )
    }

    pub fn quizzes(&self) -> QuizzesRepository<'_> {
        Repository::quizzes(self.store.as_ref(), self.date_provider.as_ref())
    }

    pub fn assessments(&self) -> AssessmentsRepository<'_> {
        Repository::assessments(self.store.as_ref(), self.date_provider.as_ref())
    }

    pub fn daily_problems(&self) -> DailyProblemsRepository<'_> {
        Repository::daily_problems(self.store.as_ref(), self.date_provider.as_ref())
    }

    pub fn daily_challenges(&self) -> DailyChallengesRepository<'_> {
        Repository::daily_challenges(self.store.as_ref(), self.date_provider.as_ref())
    }

    pub fn achievements(&self) -> AchievementsRepository<'_> {
        Repository::achievements(self.store.as_ref(), self.date_provider.as_ref())
    }

    // ===== People =====

    pub fn users(&self) -> UsersRepository<'_> {
        Repository::users(self.store.as_ref(), self.date_provider.as_ref())
    }

    pub fn feedback(&self) -> FeedbackRepository<'_> {
        Repository::feedback(self.store.as_ref(), self.date_provider.as_ref())
    }

    pub fn progress(&self) -> ProgressRepository<'_> {
        ProgressRepository::new(self.store.as_ref(), self.date_provider.as_ref())
    }

    // ===== Analytics =====

    pub fn analytics(&self) -> Analytics<'_> {
        Analytics::new(self)
    }
}
