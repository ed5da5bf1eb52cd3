//! Per-user activity and progress records read by the dashboard reports.

use super::timestamp;
use crate::database::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `users/{userId}/login_tracking/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRecord {
    #[serde(skip_serializing)]
    pub id: String,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub device: String,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for LoginRecord {
    const KIND: &'static str = "login record";

    fn id(&self) -> &str {
        &self.id
    }
}

/// `users/{userId}/daily_problem_progress/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyProblemProgress {
    #[serde(skip_serializing)]
    pub id: String,
    pub problem_id: String,
    pub solved: bool,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub solved_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for DailyProblemProgress {
    const KIND: &'static str = "daily problem progress";

    fn id(&self) -> &str {
        &self.id
    }
}

/// `user_progress/{userId}/courses/{courseId}`; the document id is the course id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseProgress {
    #[serde(skip_serializing)]
    pub id: String,
    /// Flat completion percentage written by older clients, 0-100
    pub progress: f64,
    pub completed: bool,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for CourseProgress {
    const KIND: &'static str = "course progress";

    fn id(&self) -> &str {
        &self.id
    }
}

impl CourseProgress {
    /// Completion ratio in [0, 1] from the flat field
    pub fn flat_ratio(&self) -> f64 {
        if self.completed {
            return 1.0;
        }
        if self.progress.is_finite() {
            (self.progress / 100.0).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// `user_progress/{userId}/courses/{courseId}/modules/{moduleId}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleProgress {
    #[serde(skip_serializing)]
    pub id: String,
    pub completed: bool,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for ModuleProgress {
    const KIND: &'static str = "module progress";

    fn id(&self) -> &str {
        &self.id
    }
}
