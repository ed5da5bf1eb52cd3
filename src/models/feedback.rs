use super::{string_enum, timestamp};
use crate::database::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

string_enum! {
    pub enum FeedbackStatus {
        New => "new",
        Pending => "pending",
        Reviewed => "reviewed",
        Resolved => "resolved",
    }
    default = New
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Feedback {
    #[serde(skip_serializing)]
    pub id: String,
    pub user_id: String,
    pub status: FeedbackStatus,
    pub message: String,
    /// Body as written by older clients. Read back but never written.
    #[serde(rename = "feedback", skip_serializing)]
    pub legacy_feedback: Option<String>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Feedback {
    /// `message`, or the legacy body when `message` is empty
    pub fn text(&self) -> &str {
        match &self.legacy_feedback {
            Some(legacy) if self.message.is_empty() => legacy,
            _ => &self.message,
        }
    }
}

impl Entity for Feedback {
    const KIND: &'static str = "feedback";

    fn id(&self) -> &str {
        &self.id
    }
}
