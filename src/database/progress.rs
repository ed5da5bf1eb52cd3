use super::{CollectionPath, Direction, DocumentStore, Repository, collections};
use crate::date_provider::DateProvider;
use crate::error::StoreError;
use crate::models::{CourseProgress, DailyProblemProgress, LoginRecord, ModuleProgress};

pub fn login_tracking_path(user_id: &str) -> CollectionPath {
    CollectionPath::new(collections::USERS).child(user_id, collections::LOGIN_TRACKING)
}

pub fn daily_problem_progress_path(user_id: &str) -> CollectionPath {
    CollectionPath::new(collections::USERS).child(user_id, collections::DAILY_PROBLEM_PROGRESS)
}

pub fn course_progress_path(user_id: &str) -> CollectionPath {
    CollectionPath::new(collections::USER_PROGRESS).child(user_id, collections::COURSES)
}

pub fn module_progress_path(user_id: &str, course_id: &str) -> CollectionPath {
    course_progress_path(user_id).child(course_id, collections::MODULES)
}

/// Per-user activity and progress records kept under nested paths
pub struct ProgressRepository<'a> {
    store: &'a dyn DocumentStore,
    clock: &'a dyn DateProvider,
}

impl<'a> ProgressRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore, clock: &'a dyn DateProvider) -> Self {
        ProgressRepository { store, clock }
    }

    fn logins(&self, user_id: &str) -> Repository<'a, LoginRecord> {
        Repository::new(self.store, self.clock, login_tracking_path(user_id))
            .ordered_by("timestamp", Direction::Descending)
    }

    fn solved(&self, user_id: &str) -> Repository<'a, DailyProblemProgress> {
        Repository::new(self.store, self.clock, daily_problem_progress_path(user_id))
            .ordered_by("solvedAt", Direction::Descending)
    }

    fn courses(&self, user_id: &str) -> Repository<'a, CourseProgress> {
        Repository::new(self.store, self.clock, course_progress_path(user_id))
    }

    fn modules(&self, user_id: &str, course_id: &str) -> Repository<'a, ModuleProgress> {
        Repository::new(self.store, self.clock, module_progress_path(user_id, course_id))
    }

    pub fn login_records(&self, user_id: &str) -> Result<Vec<LoginRecord>, StoreError> {
        self.logins(user_id).get_all()
    }

    pub fn count_logins(&self, user_id: &str) -> Result<usize, StoreError> {
        self.logins(user_id).count()
    }

    pub fn daily_problem_progress(&self, user_id: &str) -> Result<Vec<DailyProblemProgress>, StoreError> {
        self.solved(user_id).get_all()
    }

    pub fn count_daily_problems(&self, user_id: &str) -> Result<usize, StoreError> {
        self.solved(user_id).count()
    }

    pub fn course_progress(&self, user_id: &str, course_id: &str) -> Result<Option<CourseProgress>, StoreError> {
        self.courses(user_id).get_by_id(course_id)
    }

    pub fn module_progress(&self, user_id: &str, course_id: &str) -> Result<Vec<ModuleProgress>, StoreError> {
        self.modules(user_id, course_id).get_all()
    }

    pub fn record_login(&self, user_id: &str, device: &str) -> Result<String, StoreError> {
        let record = LoginRecord {
            timestamp: Some(self.clock.get_current_time()),
            device: device.to_string(),
            ..Default::default()
        };
        self.logins(user_id).create(&record)
    }

    pub fn record_daily_problem(&self, user_id: &str, problem_id: &str) -> Result<String, StoreError> {
        let record = DailyProblemProgress {
            problem_id: problem_id.to_string(),
            solved: true,
            solved_at: Some(self.clock.get_current_time()),
            ..Default::default()
        };
        self.solved(user_id).create(&record)
    }

    pub fn set_course_progress(&self, user_id: &str, course_id: &str, percent: f64) -> Result<(), StoreError> {
        let record = CourseProgress {
            progress: percent,
            completed: percent >= 100.0,
            ..Default::default()
        };
        self.courses(user_id).create_with_id(course_id, &record)
    }

    /// Marks one module of a course as complete or not; the module id is the document id
    pub fn set_module_progress(
        &self,
        user_id: &str,
        course_id: &str,
        module_id: &str,
        completed: bool,
    ) -> Result<(), StoreError> {
        let record = ModuleProgress {
            completed,
            completed_at: completed.then(|| self.clock.get_current_time()),
            ..Default::default()
        };
        self.modules(user_id, course_id).create_with_id(module_id, &record)
    }
}
