use crate::database::Database;
use crate::error::AuthError;
use crate::models::User;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Account confirmed by the credential provider
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// External provider that checks passwords and owns provider-side sessions
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    fn sign_out(&self, identity: &Identity);
}

/// Fixed email/password table, for local runs and tests
#[derive(Default)]
pub struct StaticCredentialVerifier {
    accounts: HashMap<String, String>,
    sign_outs: AtomicUsize,
}

impl StaticCredentialVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, email: &str, password: &str) -> Self {
        self.accounts.insert(email.to_ascii_lowercase(), password.to_string());
        self
    }

    /// How many provider sessions have been ended
    pub fn sign_out_count(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

impl CredentialVerifier for StaticCredentialVerifier {
    fn verify(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = email.trim().to_ascii_lowercase();
        match self.accounts.get(&email) {
            Some(stored) if stored == password => Ok(Identity {
                uid: email.clone(),
                email,
            }),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    fn sign_out(&self, _identity: &Identity) {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
    pub user: User,
}

/// Admin-only sign-in. A verified account whose `users` record is missing or not an admin
/// is signed out again at the provider and no session is kept.
pub struct AuthService {
    db: Database,
    verifier: Arc<dyn CredentialVerifier>,
    session: Option<Session>,
}

impl AuthService {
    pub fn new(db: Database, verifier: Arc<dyn CredentialVerifier>) -> Self {
        AuthService {
            db,
            verifier,
            session: None,
        }
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<&Session, AuthError> {
        self.session = None;
        let identity = self.verifier.verify(email, password)?;

        let user = match self.db.users().find_by_email(&identity.email) {
            Ok(user) => user,
            Err(e) => {
                self.verifier.sign_out(&identity);
                return Err(e.into());
            }
        };

        match user {
            Some(user) if user.is_admin() => {
                info!("Admin {} signed in", identity.email);
                Ok(self.session.insert(Session { identity, user }))
            }
            other => {
                let role = other.map_or_else(|| "none".to_string(), |u| u.role.to_string());
                warn!("Rejected sign-in of {} with role {}", identity.email, role);
                self.verifier.sign_out(&identity);
                Err(AuthError::NotAuthorized {
                    email: identity.email,
                    role,
                })
            }
        }
    }

    pub fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            self.verifier.sign_out(&session.identity);
            info!("{} signed out", session.identity.email);
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn setup() -> (Database, Arc<StaticCredentialVerifier>) {
        let db = Database::in_memory();
        for (email, role) in [("admin@example.com", UserRole::Admin), ("student@example.com", UserRole::Student)] {
            db.users()
                .create(&User {
                    email: email.to_string(),
                    role,
                    ..Default::default()
                })
                .unwrap();
        }
        let verifier = Arc::new(
            StaticCredentialVerifier::new()
                .with_account("admin@example.com", "secret")
                .with_account("student@example.com", "secret")
                .with_account("ghost@example.com", "secret"),
        );
        (db, verifier)
    }

    #[test]
    fn test_admin_with_mixed_case_record_signs_in() {
        let db = Database::in_memory();
        db.users()
            .create(&User {
                email: "Root@Example.com".to_string(),
                role: UserRole::Admin,
                ..Default::default()
            })
            .unwrap();
        let verifier = Arc::new(StaticCredentialVerifier::new().with_account("root@example.com", "pw"));
        let mut auth = AuthService::new(db, verifier);

        let session = auth.sign_in("ROOT@example.com", "pw").unwrap();
        assert!(session.user.is_admin());
    }

    #[test]
    fn test_admin_sign_in() {
        let (db, verifier) = setup();
        let mut auth = AuthService::new(db, verifier.clone());

        let session = auth.sign_in("admin@example.com", "secret").unwrap();
        assert!(session.user.is_admin());
        assert!(auth.is_authenticated());

        auth.sign_out();
        assert!(!auth.is_authenticated());
        assert_eq!(verifier.sign_out_count(), 1);
    }

    #[test]
    fn test_student_is_signed_out() {
        let (db, verifier) = setup();
        let mut auth = AuthService::new(db, verifier.clone());

        let result = auth.sign_in("student@example.com", "secret");
        assert!(matches!(
            result,
            Err(AuthError::NotAuthorized { ref role, .. }) if role == "student"
        ));
        assert!(!auth.is_authenticated());
        assert_eq!(verifier.sign_out_count(), 1);
    }

    #[test]
    fn test_unknown_user_record_is_rejected() {
        let (db, verifier) = setup();
        let mut auth = AuthService::new(db, verifier);
        let result = auth.sign_in("ghost@example.com", "secret");
        assert!(matches!(result, Err(AuthError::NotAuthorized { .. })));
    }

    #[test]
    fn test_wrong_password() {
        let (db, verifier) = setup();
        let mut auth = AuthService::new(db, verifier.clone());
        let result = auth.sign_in("admin@example.com", "nope");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert_eq!(verifier.sign_out_count(), 0);
    }
}
