use super::{CollectionPath, Direction, DocumentStore, Repository, WriteBatch, collections};
use crate::date_provider::DateProvider;
use crate::error::StoreError;
use crate::models::{Course, CourseModule, Lesson, ModulePatch};
use log::info;

/// Denormalized child counter on course documents
pub const MODULE_COUNT_FIELD: &str = "moduleCount";

pub type CoursesRepository<'a> = Repository<'a, Course>;
pub type LessonsRepository<'a> = Repository<'a, Lesson>;

pub fn courses_path() -> CollectionPath {
    CollectionPath::new(collections::COURSES)
}

pub fn modules_path(course_id: &str) -> CollectionPath {
    courses_path().child(course_id, collections::MODULES)
}

pub fn lessons_path(course_id: &str, module_id: &str) -> CollectionPath {
    modules_path(course_id).child(module_id, collections::LESSONS)
}

impl<'a> Repository<'a, Course> {
    pub fn courses(store: &'a dyn DocumentStore, clock: &'a dyn DateProvider) -> Self {
        Repository::new(store, clock, courses_path()).ordered_by("createdAt", Direction::Descending)
    }
}

impl<'a> Repository<'a, Lesson> {
    pub fn lessons(
        store: &'a dyn DocumentStore,
        clock: &'a dyn DateProvider,
        course_id: &str,
        module_id: &str,
    ) -> Self {
        Repository::new(store, clock, lessons_path(course_id, module_id))
            .ordered_by("order", Direction::Ascending)
    }
}

/// Modules of one course.
///
/// Creating or deleting a module adjusts the parent course's `moduleCount` in the same
/// atomic batch, so the counter and the sub-collection never disagree.
pub struct ModulesRepository<'a> {
    inner: Repository<'a, CourseModule>,
    course_id: String,
}

impl<'a> ModulesRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore, clock: &'a dyn DateProvider, course_id: &str) -> Self {
        ModulesRepository {
            inner: Repository::new(store, clock, modules_path(course_id))
                .ordered_by("order", Direction::Ascending),
            course_id: course_id.to_string(),
        }
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn get_all(&self) -> Result<Vec<CourseModule>, StoreError> {
        self.inner.get_all()
    }

    pub fn get_by_id(&self, module_id: &str) -> Result<Option<CourseModule>, StoreError> {
        self.inner.get_by_id(module_id)
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        self.inner.count()
    }

    /// Fails with [`StoreError::NotFound`] (and writes nothing) when the course does not exist
    pub fn create(&self, module: &CourseModule) -> Result<String, StoreError> {
        let id = super::new_document_id();
        let mut fields = self.inner.encode_new(module)?;
        fields.insert(
            "courseId".to_string(),
            serde_json::Value::String(self.course_id.clone()),
        );

        let mut batch = WriteBatch::new();
        batch.set(self.inner.path(), &id, fields);
        batch.increment(&courses_path(), &self.course_id, MODULE_COUNT_FIELD, 1, None);
        self.inner
            .logged("create", self.inner.store().commit(batch))?;

        info!("Created module {} in course {}", id, self.course_id);
        Ok(id)
    }

    pub fn update(&self, module_id: &str, patch: &ModulePatch) -> Result<(), StoreError> {
        self.inner.update(module_id, patch)
    }

    /// Deletes the module and decrements the course counter (never below zero) atomically.
    /// The existence check runs inside the same batch, so a module that is already gone
    /// fails with [`StoreError::NotFound`] and the counter is left alone.
    /// Lessons under the module are not removed.
    pub fn delete(&self, module_id: &str) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.delete_existing(self.inner.path(), module_id);
        batch.increment(&courses_path(), &self.course_id, MODULE_COUNT_FIELD, -1, Some(0));
        self.inner
            .logged("delete", self.inner.store().commit(batch))?;

        info!("Deleted module {} from course {}", module_id, self.course_id);
        Ok(())
    }
}
