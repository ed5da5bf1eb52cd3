use super::percentage;
use crate::database::Database;
use crate::error::StoreError;
use crate::models::FeedbackStatus;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackStatusSlice {
    pub status: FeedbackStatus,
    pub count: usize,
    pub percentage: i64,
}

pub struct FeedbackStatusReport<'a> {
    db: &'a Database,
}

impl<'a> FeedbackStatusReport<'a> {
    pub fn new(db: &'a Database) -> Self {
        FeedbackStatusReport { db }
    }

    pub fn compute(&self) -> Result<Vec<FeedbackStatusSlice>, StoreError> {
        let feedback = self.db.feedback().get_all_lenient()?;
        Ok(tally(feedback.iter().map(|f| f.status)))
    }
}

/// Non-empty buckets in new, pending, reviewed, resolved order
pub fn tally(statuses: impl IntoIterator<Item = FeedbackStatus>) -> Vec<FeedbackStatusSlice> {
    let mut counts = vec![0usize; FeedbackStatus::ALL.len()];
    for status in statuses {
        if let Some(slot) = FeedbackStatus::ALL.iter().position(|s| *s == status) {
            counts[slot] += 1;
        }
    }

    let total: usize = counts.iter().sum();
    FeedbackStatus::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(status, count)| FeedbackStatusSlice {
            status: *status,
            count,
            percentage: percentage(count, total),
        })
        .collect()
}
