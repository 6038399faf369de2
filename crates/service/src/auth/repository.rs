use async_trait::async_trait;
use uuid::Uuid;

use models::user::UserRole;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
///
/// `create_account` persists the account, its credentials, and the empty
/// companion profile as one unit; a failure must leave nothing behind.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;

    async fn create_account(
        &self,
        username: &str,
        email: &str,
        role: UserRole,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<Vec<AuthUser>>,
        creds: Mutex<HashMap<Uuid, Credentials>>,
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.username == username).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.email == email).cloned())
        }

        async fn create_account(
            &self,
            username: &str,
            email: &str,
            role: UserRole,
            password_hash: String,
            password_algorithm: String,
        ) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.username == username || u.email == email) {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                username: username.to_string(),
                email: email.to_string(),
                role,
                is_staff: false,
            };
            users.push(user.clone());
            self.creds.lock().unwrap().insert(
                user.id,
                Credentials { user_id: user.id, password_hash, password_algorithm },
            );
            Ok(user)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&user_id).cloned())
        }
    }
}
