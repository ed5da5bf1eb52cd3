use super::{string_enum, timestamp};
use crate::database::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Score at or above which an attempt counts as passed when the record has no explicit flag
pub const PASSING_SCORE: f64 = 70.0;

string_enum! {
    pub enum UserRole {
        Admin => "admin",
        Student => "student",
        Instructor => "instructor",
    }
    default = Student
}

string_enum! {
    pub enum UserStatus {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
    default = Active
}

/// One entry of a user's `assessmentScores` map.
///
/// Older documents store a bare number; newer ones an object with an explicit `passed` flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentScore {
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
    pub attempts: i64,
}

impl AssessmentScore {
    pub fn is_passed(&self) -> bool {
        self.passed.unwrap_or(self.score >= PASSING_SCORE)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Bare(f64),
    Detailed {
        #[serde(default)]
        score: f64,
        #[serde(default)]
        passed: Option<bool>,
        #[serde(default)]
        attempts: i64,
    },
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for AssessmentScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawScore::deserialize(deserializer)? {
            RawScore::Bare(score) => AssessmentScore {
                score,
                passed: None,
                attempts: 1,
            },
            RawScore::Detailed {
                score,
                passed,
                attempts,
            } => AssessmentScore {
                score,
                passed,
                attempts,
            },
            RawScore::Other(_) => AssessmentScore::default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(skip_serializing)]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub courses_enrolled: Vec<String>,
    /// Keyed by assessment id
    pub assessment_scores: BTreeMap<String, AssessmentScore>,
    /// Legacy enrollment list holding course titles rather than ids
    pub course_taken: Vec<String>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for User {
    const KIND: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether the legacy `courseTaken` list names this course title
    pub fn has_taken(&self, course_title: &str) -> bool {
        let wanted = course_title.trim();
        !wanted.is_empty()
            && self
                .course_taken
                .iter()
                .any(|taken| taken.trim().eq_ignore_ascii_case(wanted))
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courses_enrolled: Option<Vec<String>>,
}
