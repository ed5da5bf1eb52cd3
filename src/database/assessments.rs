use super::{CollectionPath, Direction, DocumentStore, Repository, collections};
use crate::date_provider::DateProvider;
use crate::error::StoreError;
use crate::models::{Quiz, TechnicalAssessment};

pub type QuizzesRepository<'a> = Repository<'a, Quiz>;
pub type AssessmentsRepository<'a> = Repository<'a, TechnicalAssessment>;

impl<'a> Repository<'a, Quiz> {
    pub fn quizzes(store: &'a dyn DocumentStore, clock: &'a dyn DateProvider) -> Self {
        Repository::new(store, clock, CollectionPath::new(collections::QUIZZES))
            .ordered_by("createdAt", Direction::Descending)
    }

    pub fn get_by_module(&self, module_id: &str) -> Result<Vec<Quiz>, StoreError> {
        self.get_where("moduleId", module_id)
    }
}

impl<'a> Repository<'a, TechnicalAssessment> {
    pub fn assessments(store: &'a dyn DocumentStore, clock: &'a dyn DateProvider) -> Self {
        Repository::new(store, clock, CollectionPath::new(collections::ASSESSMENTS))
            .ordered_by("createdAt", Direction::Descending)
    }

    pub fn get_by_course(&self, course_id: &str) -> Result<Vec<TechnicalAssessment>, StoreError> {
        self.get_where("courseId", course_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryStore;
    use crate::date_provider::SystemDateProvider;
    use crate::models::{Question, QuizPatch};

    #[test]
    fn test_quizzes_by_module() {
        let store = InMemoryStore::new();
        let clock = SystemDateProvider;
        let quizzes = QuizzesRepository::quizzes(&store, &clock);
        for (module_id, title) in [("m1", "Borrowing"), ("m2", "Traits"), ("m1", "Lifetimes")] {
            quizzes
                .create(&Quiz {
                    module_id: module_id.to_string(),
                    title: title.to_string(),
                    ..Default::default()
                })
                .unwrap();
        }

        let m1 = quizzes.get_by_module("m1").unwrap();
        assert_eq!(m1.len(), 2);
        assert!(m1.iter().all(|q| q.module_id == "m1"));
        assert!(quizzes.get_by_module("m3").unwrap().is_empty());
    }

    #[test]
    fn test_partial_update_does_not_validate_questions() {
        let store = InMemoryStore::new();
        let clock = SystemDateProvider;
        let quizzes = QuizzesRepository::quizzes(&store, &clock);
        let id = quizzes.create(&Quiz::default()).unwrap();

        let patch = QuizPatch {
            questions: Some(vec![Question {
                question: "?".to_string(),
                options: vec!["a".to_string()],
                correct_option_index: 5,
                explanation: None,
            }]),
            ..Default::default()
        };
        quizzes.update(&id, &patch).unwrap();

        let stored = quizzes.get_by_id(&id).unwrap().unwrap();
        assert_eq!(stored.questions[0].correct_option_index, 5);
        assert!(stored.validate().is_err());
    }

    #[test]
    fn test_assessments_by_course() {
        let store = InMemoryStore::new();
        let clock = SystemDateProvider;
        let assessments = AssessmentsRepository::assessments(&store, &clock);
        assessments
            .create(&TechnicalAssessment {
                course_id: "c1".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(assessments.get_by_course("c1").unwrap().len(), 1);
        assert!(assessments.get_by_course("c2").unwrap().is_empty());
    }
}
