use super::{CollectionPath, Direction, DocumentStore, Repository, collections};
use crate::date_provider::DateProvider;
use crate::error::StoreError;
use crate::models::{Achievement, DailyChallenge, DailyProblem};

pub type DailyProblemsRepository<'a> = Repository<'a, DailyProblem>;
pub type DailyChallengesRepository<'a> = Repository<'a, DailyChallenge>;
pub type AchievementsRepository<'a> = Repository<'a, Achievement>;

impl<'a> Repository<'a, DailyProblem> {
    pub fn daily_problems(store: &'a dyn DocumentStore, clock: &'a dyn DateProvider) -> Self {
        Repository::new(store, clock, CollectionPath::new(collections::DAILY_PROBLEMS))
            .ordered_by("date", Direction::Descending)
    }

    /// Problem scheduled for `date` (`YYYY-MM-DD`)
    pub fn get_by_date(&self, date: &str) -> Result<Option<DailyProblem>, StoreError> {
        Ok(self.get_where("date", date)?.into_iter().next())
    }
}

impl<'a> Repository<'a, DailyChallenge> {
    pub fn daily_challenges(store: &'a dyn DocumentStore, clock: &'a dyn DateProvider) -> Self {
        Repository::new(store, clock, CollectionPath::new(collections::DAILY_CHALLENGES))
            .ordered_by("expiredAt", Direction::Descending)
    }

    /// Challenges that have not expired yet
    pub fn get_active(&self) -> Result<Vec<DailyChallenge>, StoreError> {
        let now = self.now();
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|challenge| challenge.is_active(now))
            .collect())
    }
}

impl<'a> Repository<'a, Achievement> {
    pub fn achievements(store: &'a dyn DocumentStore, clock: &'a dyn DateProvider) -> Self {
        Repository::new(store, clock, CollectionPath::new(collections::ACHIEVEMENTS))
            .ordered_by("points", Direction::Descending)
    }
}
