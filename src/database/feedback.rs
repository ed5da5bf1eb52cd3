use super::{CollectionPath, Direction, DocumentStore, Fields, Repository, collections};
use crate::date_provider::DateProvider;
use crate::error::StoreError;
use crate::models::{Feedback, FeedbackStatus, timestamp};
use log::info;
use serde_json::Value;

pub type FeedbackRepository<'a> = Repository<'a, Feedback>;

impl<'a> Repository<'a, Feedback> {
    pub fn feedback(store: &'a dyn DocumentStore, clock: &'a dyn DateProvider) -> Self {
        Repository::new(store, clock, CollectionPath::new(collections::FEEDBACK))
            .ordered_by("timestamp", Direction::Descending)
    }

    /// Moves feedback to `status`. `resolvedAt` is stamped when the new status is resolved and
    /// cleared for any other status.
    pub fn update_status(&self, feedback_id: &str, status: FeedbackStatus) -> Result<(), StoreError> {
        let mut fields = Fields::new();
        fields.insert("status".to_string(), Value::from(status.as_str()));
        let resolved_at = match status {
            FeedbackStatus::Resolved => timestamp::to_value(&self.now()),
            _ => Value::Null,
        };
        fields.insert("resolvedAt".to_string(), resolved_at);
        self.update_fields(feedback_id, fields)?;
        info!("Feedback {} marked {}", feedback_id, status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryStore;
    use crate::date_provider::FixedDateProvider;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_resolved_at_follows_status() {
        let store = InMemoryStore::new();
        let now = Utc.with_ymd_and_hms(2024, 2, 2, 10, 0, 0).unwrap();
        let clock = FixedDateProvider::new(now);
        let repo = FeedbackRepository::feedback(&store, &clock);
        let id = repo
            .create(&Feedback {
                message: "Video 3 has no audio".to_string(),
                ..Default::default()
            })
            .unwrap();

        repo.update_status(&id, FeedbackStatus::Reviewed).unwrap();
        let reviewed = repo.get_by_id(&id).unwrap().unwrap();
        assert_eq!(reviewed.status, FeedbackStatus::Reviewed);
        assert!(reviewed.resolved_at.is_none());

        repo.update_status(&id, FeedbackStatus::Resolved).unwrap();
        let resolved = repo.get_by_id(&id).unwrap().unwrap();
        assert_eq!(resolved.resolved_at, Some(now));
        assert_eq!(resolved.message, "Video 3 has no audio");

        repo.update_status(&id, FeedbackStatus::Pending).unwrap();
        assert!(repo.get_by_id(&id).unwrap().unwrap().resolved_at.is_none());
    }
}
