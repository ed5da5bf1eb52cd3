use super::{View, ViewSource};
use crate::database::Database;
use crate::error::StoreError;
use crate::models::{
    Achievement, AchievementPatch, DailyChallenge, DailyChallengePatch, DailyProblem, DailyProblemPatch, Feedback,
    FeedbackStatus, User, UserPatch, UserRole, UserStatus,
};

pub type UsersView = View<UsersSource>;
pub type FeedbackView = View<FeedbackSource>;
pub type AchievementsView = View<AchievementsSource>;
pub type DailyProblemsView = View<DailyProblemsSource>;
pub type DailyChallengesView = View<DailyChallengesSource>;

#[derive(Debug, Clone, Copy, Default)]
pub struct UsersSource;

impl ViewSource for UsersSource {
    type Data = Vec<User>;

    fn fetch(&self, db: &Database) -> Result<Vec<User>, StoreError> {
        db.users().get_all()
    }
}

impl View<UsersSource> {
    pub fn update(&mut self, user_id: &str, patch: &UserPatch) -> Result<(), StoreError> {
        self.mutate(|db, _| db.users().update(user_id, patch))
    }

    pub fn update_role(&mut self, user_id: &str, role: UserRole) -> Result<(), StoreError> {
        self.mutate(|db, _| db.users().update_role(user_id, role))
    }

    pub fn update_status(&mut self, user_id: &str, status: UserStatus) -> Result<(), StoreError> {
        self.mutate(|db, _| db.users().update_status(user_id, status))
    }

    pub fn delete(&mut self, user_id: &str) -> Result<(), StoreError> {
        self.mutate(|db, _| db.users().delete(user_id))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackSource;

impl ViewSource for FeedbackSource {
    type Data = Vec<Feedback>;

    fn fetch(&self, db: &Database) -> Result<Vec<Feedback>, StoreError> {
        db.feedback().get_all()
    }
}

impl View<FeedbackSource> {
    pub fn update_status(&mut self, feedback_id: &str, status: FeedbackStatus) -> Result<(), StoreError> {
        self.mutate(|db, _| db.feedback().update_status(feedback_id, status))
    }

    pub fn delete(&mut self, feedback_id: &str) -> Result<(), StoreError> {
        self.mutate(|db, _| db.feedback().delete(feedback_id))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AchievementsSource;

impl ViewSource for AchievementsSource {
    type Data = Vec<Achievement>;

    fn fetch(&self, db: &Database) -> Result<Vec<Achievement>, StoreError> {
        db.achievements().get_all()
    }
}

impl View<AchievementsSource> {
    pub fn create(&mut self, achievement: &Achievement) -> Result<String, StoreError> {
        self.mutate(|db, _| db.achievements().create(achievement))
    }

    pub fn update(&mut self, achievement_id: &str, patch: &AchievementPatch) -> Result<(), StoreError> {
        self.mutate(|db, _| db.achievements().update(achievement_id, patch))
    }

    pub fn delete(&mut self, achievement_id: &str) -> Result<(), StoreError> {
        self.mutate(|db, _| db.achievements().delete(achievement_id))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DailyProblemsSource;

impl ViewSource for DailyProblemsSource {
    type Data = Vec<DailyProblem>;

    fn fetch(&self, db: &Database) -> Result<Vec<DailyProblem>, StoreError> {
        db.daily_problems().get_all()
    }
}

impl View<DailyProblemsSource> {
    pub fn create(&mut self, problem: &DailyProblem) -> Result<String, StoreError> {
        self.mutate(|db, _| db.daily_problems().create(problem))
    }

    pub fn update(&mut self, problem_id: &str, patch: &DailyProblemPatch) -> Result<(), StoreError> {
        self.mutate(|db, _| db.daily_problems().update(problem_id, patch))
    }

    pub fn delete(&mut self, problem_id: &str) -> Result<(), StoreError> {
        self.mutate(|db, _| db.daily_problems().delete(problem_id))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DailyChallengesSource {
    pub active_only: bool,
}

impl ViewSource for DailyChallengesSource {
    type Data = Vec<DailyChallenge>;

    fn fetch(&self, db: &Database) -> Result<Vec<DailyChallenge>, StoreError> {
        if self.active_only {
            db.daily_challenges().get_active()
        } else {
            db.daily_challenges().get_all()
        }
    }
}

impl View<DailyChallengesSource> {
    pub fn create(&mut self, challenge: &DailyChallenge) -> Result<String, StoreError> {
        self.mutate(|db, _| db.daily_challenges().create(challenge))
    }

    pub fn update(&mut self, challenge_id: &str, patch: &DailyChallengePatch) -> Result<(), StoreError> {
        self.mutate(|db, _| db.daily_challenges().update(challenge_id, patch))
    }

    pub fn delete(&mut self, challenge_id: &str) -> Result<(), StoreError> {
        self.mutate(|db, _| db.daily_challenges().delete(challenge_id))
    }
}
