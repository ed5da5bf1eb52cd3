use crate::database::Database;
use crate::error::StoreError;
use chrono::{Duration, NaiveDate};
use log::{debug, warn};
use rand::Rng;
use serde::Serialize;

/// Number of days covered by the activity chart
pub const DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    /// Weekday abbreviation, e.g. `Mon`
    pub label: String,
    pub count: i64,
}

pub struct ActivityReport<'a> {
    db: &'a Database,
}

impl<'a> ActivityReport<'a> {
    pub fn new(db: &'a Database) -> Self {
        ActivityReport { db }
    }

    /// Logins plus solved daily problems, summed over every user.
    /// Users whose records cannot be read are skipped.
    pub fn total_events(&self) -> Result<usize, StoreError> {
        let users = self.db.users().get_all_lenient()?;
        let progress = self.db.progress();
        let mut total = 0;

        for user in &users {
            let logins = match progress.count_logins(&user.id) {
                Ok(count) => count,
                Err(e) => {
                    warn!("Skipping activity of user {}: {}", user.id, e);
                    continue;
                }
            };
            let solved = match progress.count_daily_problems(&user.id) {
                Ok(count) => count,
                Err(e) => {
                    warn!("Skipping activity of user {}: {}", user.id, e);
                    continue;
                }
            };
            total += logins + solved;
        }

        debug!("Counted {} activity events across {} users", total, users.len());
        Ok(total)
    }

    /// Seven days ending today. Stored events carry no usable day bucket, so the total is
    /// spread evenly and each day is jittered by a factor drawn from `rng`.
    pub fn compute<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<ActivityDay>, StoreError> {
        let total = self.total_events()?;
        let today = self.db.date_provider().get_current_time().date_naive();
        Ok(spread_over_week(total, today, rng))
    }
}

/// Splits `total` over the seven days ending at `today`, oldest first. Each day gets
/// `total / 7` scaled by a multiplier in `[0.8, 1.2)`, rounded to the nearest integer.
pub fn spread_over_week<R: Rng + ?Sized>(total: usize, today: NaiveDate, rng: &mut R) -> Vec<ActivityDay> {
    let base = total as f64 / DAYS as f64;
    (0..DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let multiplier: f64 = rng.gen_range(0.8..1.2);
            ActivityDay {
                date,
                label: date.format("%a").to_string(),
                count: (base * multiplier).round() as i64,
            }
        })
        .collect()
}
