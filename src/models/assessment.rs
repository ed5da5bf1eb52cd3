use super::{Difficulty, string_enum, timestamp};
use crate::database::Entity;
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    pub enum AssessmentType {
        CodeFix => "code_fix",
        SqlQuery => "sql_query",
    }
    default = CodeFix
}

/// A hands-on exercise attached to a course: either fix broken code or write a SQL query.
///
/// The code fields and the SQL fields live side by side on every document; `assessment_type`
/// decides which of them a form must fill in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalAssessment {
    #[serde(skip_serializing)]
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub description: String,
    /// Reporting bucket, e.g. "Python" or "Databases"
    pub category: String,
    #[serde(rename = "type")]
    pub assessment_type: AssessmentType,
    pub difficulty: Difficulty,
    pub language: String,
    pub broken_code: String,
    pub correct_code: String,
    #[serde(rename = "sample_table")]
    pub sample_table: String,
    #[serde(rename = "expected_query")]
    pub expected_query: String,
    pub hints: Vec<String>,
    pub points: i64,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for TechnicalAssessment {
    const KIND: &'static str = "assessment";

    fn id(&self) -> &str {
        &self.id
    }
}

impl TechnicalAssessment {
    /// Category used when grouping results; falls back to the assessment type
    pub fn report_category(&self) -> &str {
        let category = self.category.trim();
        if category.is_empty() {
            self.assessment_type.as_str()
        } else {
            category
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Missing { field: "title" });
        }
        match self.assessment_type {
            AssessmentType::CodeFix => {
                if self.broken_code.trim().is_empty() {
                    return Err(ValidationError::Missing { field: "brokenCode" });
                }
                if self.correct_code.trim().is_empty() {
                    return Err(ValidationError::Missing { field: "correctCode" });
                }
            }
            AssessmentType::SqlQuery => {
                if self.sample_table.trim().is_empty() {
                    return Err(ValidationError::Missing { field: "sample_table" });
                }
                if self.expected_query.trim().is_empty() {
                    return Err(ValidationError::Missing { field: "expected_query" });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub assessment_type: Option<AssessmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broken_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_code: Option<String>,
    #[serde(rename = "sample_table", skip_serializing_if = "Option::is_none")]
    pub sample_table: Option<String>,
    #[serde(rename = "expected_query", skip_serializing_if = "Option::is_none")]
    pub expected_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
}
