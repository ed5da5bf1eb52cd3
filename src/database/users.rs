use super::{CollectionPath, Direction, DocumentStore, Fields, Repository, collections};
use crate::date_provider::DateProvider;
use crate::error::StoreError;
use crate::models::{User, UserRole, UserStatus};
use log::info;
use serde_json::Value;

pub type UsersRepository<'a> = Repository<'a, User>;

impl<'a> Repository<'a, User> {
    pub fn users(store: &'a dyn DocumentStore, clock: &'a dyn DateProvider) -> Self {
        Repository::new(store, clock, CollectionPath::new(collections::USERS))
            .ordered_by("createdAt", Direction::Descending)
    }

    /// First user whose email matches, ignoring ASCII case and surrounding whitespace.
    /// An exact match is preferred over a case-folded one.
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.trim();
        let mut exact = self.get_where("email", email)?;
        if !exact.is_empty() {
            return Ok(Some(exact.remove(0)));
        }
        Ok(self
            .get_all_lenient()?
            .into_iter()
            .find(|user| user.email.trim().eq_ignore_ascii_case(email)))
    }

    pub fn update_role(&self, user_id: &str, role: UserRole) -> Result<(), StoreError> {
        let mut fields = Fields::new();
        fields.insert("role".to_string(), Value::from(role.as_str()));
        self.update_fields(user_id, fields)?;
        info!("User {} is now {}", user_id, role);
        Ok(())
    }

    pub fn update_status(&self, user_id: &str, status: UserStatus) -> Result<(), StoreError> {
        let mut fields = Fields::new();
        fields.insert("status".to_string(), Value::from(status.as_str()));
        self.update_fields(user_id, fields)
    }
}
