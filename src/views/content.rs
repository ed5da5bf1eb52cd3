use super::{View, ViewSource};
use crate::database::Database;
use crate::error::StoreError;
use crate::models::{
    AssessmentPatch, Course, CourseModule, CoursePatch, Lesson, LessonPatch, ModulePatch, Quiz, QuizPatch,
    TechnicalAssessment,
};

pub type CoursesView = View<CoursesSource>;
pub type ModulesView = View<ModulesSource>;
pub type LessonsView = View<LessonsSource>;
pub type QuizzesView = View<QuizzesSource>;
pub type AssessmentsView = View<AssessmentsSource>;

#[derive(Debug, Clone, Copy, Default)]
pub struct CoursesSource;

impl ViewSource for CoursesSource {
    type Data = Vec<Course>;

    fn fetch(&self, db: &Database) -> Result<Vec<Course>, StoreError> {
        db.courses().get_all()
    }
}

impl View<CoursesSource> {
    pub fn create(&mut self, course: &Course) -> Result<String, StoreError> {
        self.mutate(|db, _| db.courses().create(course))
    }

    pub fn update(&mut self, course_id: &str, patch: &CoursePatch) -> Result<(), StoreError> {
        self.mutate(|db, _| db.courses().update(course_id, patch))
    }

    /// Removes the course document only; its modules stay under the old path
    pub fn delete(&mut self, course_id: &str) -> Result<(), StoreError> {
        self.mutate(|db, _| db.courses().delete(course_id))
    }
}

/// Modules of one course, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct ModulesSource {
    pub course_id: String,
}

impl ModulesSource {
    pub fn new(course_id: &str) -> Self {
        ModulesSource {
            course_id: course_id.to_string(),
        }
    }
}

impl ViewSource for ModulesSource {
    type Data = Vec<CourseModule>;

    fn fetch(&self, db: &Database) -> Result<Vec<CourseModule>, StoreError> {
        db.modules(&self.course_id).get_all()
    }
}

impl View<ModulesSource> {
    pub fn create(&mut self, module: &CourseModule) -> Result<String, StoreError> {
        self.mutate(|db, scope| db.modules(&scope.course_id).create(module))
    }

    pub fn update(&mut self, module_id: &str, patch: &ModulePatch) -> Result<(), StoreError> {
        self.mutate(|db, scope| db.modules(&scope.course_id).update(module_id, patch))
    }

    pub fn delete(&mut self, module_id: &str) -> Result<(), StoreError> {
        self.mutate(|db, scope| db.modules(&scope.course_id).delete(module_id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LessonsSource {
    pub course_id: String,
    pub module_id: String,
}

impl LessonsSource {
    pub fn new(course_id: &str, module_id: &str) -> Self {
        LessonsSource {
            course_id: course_id.to_string(),
            module_id: module_id.to_string(),
        }
    }
}

impl ViewSource for LessonsSource {
    type Data = Vec<Lesson>;

    fn fetch(&self, db: &Database) -> Result<Vec<Lesson>, StoreError> {
        db.lessons(&self.course_id, &self.module_id).get_all()
    }
}

impl View<LessonsSource> {
    /// Stores the lesson with its parent ids filled in from the current scope
    pub fn create(&mut self, lesson: &Lesson) -> Result<String, StoreError> {
        self.mutate(|db, scope| {
            let lesson = Lesson {
                course_id: scope.course_id.clone(),
                module_id: scope.module_id.clone(),
                ..lesson.clone()
            };
            db.lessons(&scope.course_id, &scope.module_id).create(&lesson)
        })
    }

    pub fn update(&mut self, lesson_id: &str, patch: &LessonPatch) -> Result<(), StoreError> {
        self.mutate(|db, scope| db.lessons(&scope.course_id, &scope.module_id).update(lesson_id, patch))
    }

    pub fn delete(&mut self, lesson_id: &str) -> Result<(), StoreError> {
        self.mutate(|db, scope| db.lessons(&scope.course_id, &scope.module_id).delete(lesson_id))
    }
}

/// Quizzes of one module, or every quiz when no module is selected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizzesSource {
    pub module_id: Option<String>,
}

impl ViewSource for QuizzesSource {
    type Data = Vec<Quiz>;

    fn fetch(&self, db: &Database) -> Result<Vec<Quiz>, StoreError> {
        match &self.module_id {
            Some(module_id) => db.quizzes().get_by_module(module_id),
            None => db.quizzes().get_all(),
        }
    }
}

impl View<QuizzesSource> {
    pub fn create(&mut self, quiz: &Quiz) -> Result<String, StoreError> {
        self.mutate(|db, _| db.quizzes().create(quiz))
    }

    pub fn update(&mut self, quiz_id: &str, patch: &QuizPatch) -> Result<(), StoreError> {
        self.mutate(|db, _| db.quizzes().update(quiz_id, patch))
    }

    pub fn delete(&mut self, quiz_id: &str) -> Result<(), StoreError> {
        self.mutate(|db, _| db.quizzes().delete(quiz_id))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentsSource {
    pub course_id: Option<String>,
}

impl ViewSource for AssessmentsSource {
    type Data = Vec<TechnicalAssessment>;

    fn fetch(&self, db: &Database) -> Result<Vec<TechnicalAssessment>, StoreError> {
        match &self.course_id {
            Some(course_id) => db.assessments().get_by_course(course_id),
            None => db.assessments().get_all(),
        }
    }
}

impl View<AssessmentsSource> {
    pub fn create(&mut self, assessment: &TechnicalAssessment) -> Result<String, StoreError> {
        self.mutate(|db, _| db.assessments().create(assessment))
    }

    pub fn update(&mut self, assessment_id: &str, patch: &AssessmentPatch) -> Result<(), StoreError> {
        self.mutate(|db, _| db.assessments().update(assessment_id, patch))
    }

    pub fn delete(&mut self, assessment_id: &str) -> Result<(), StoreError> {
        self.mutate(|db, _| db.assessments().delete(assessment_id))
    }
}
