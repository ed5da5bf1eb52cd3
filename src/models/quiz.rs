use super::{Difficulty, timestamp};
use crate::database::Entity;
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_option_index: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quiz {
    #[serde(skip_serializing)]
    pub id: String,
    pub module_id: String,
    pub course_id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
    /// Minutes allowed for one attempt
    pub time_limit: i64,
    /// Percentage needed to pass
    pub passing_score: i64,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Quiz {
    const KIND: &'static str = "quiz";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Quiz {
    /// Form-level checks. The accessor does not call this: a partial update can still leave
    /// a question's correct index out of bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Missing { field: "title" });
        }
        if self.questions.is_empty() {
            return Err(ValidationError::Missing { field: "questions" });
        }
        if !(0..=100).contains(&self.passing_score) {
            return Err(ValidationError::OutOfRange {
                field: "passingScore",
                value: self.passing_score,
                min: 0,
                max: 100,
            });
        }
        for (i, question) in self.questions.iter().enumerate() {
            let number = i + 1;
            if question.question.trim().is_empty() {
                return Err(ValidationError::Missing { field: "question" });
            }
            if question.options.len() < 2 {
                return Err(ValidationError::TooFewOptions { question: number });
            }
            let in_bounds = usize::try_from(question.correct_option_index)
                .map(|idx| idx < question.options.len())
                .unwrap_or(false);
            if !in_bounds {
                return Err(ValidationError::CorrectOptionOutOfBounds {
                    question: number,
                    index: question.correct_option_index,
                    options: question.options.len(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passing_score: Option<i64>,
}
