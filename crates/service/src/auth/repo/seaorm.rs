use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use models::user::UserRole;
use models::{profile, user, user_credentials};

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_auth_user(u: user::Model) -> AuthUser {
    AuthUser { id: u.id, username: u.username, email: u.email, role: u.role, is_staff: u.is_staff }
}

fn map_model_err(e: models::errors::ModelError) -> AuthError {
    match e {
        models::errors::ModelError::Validation(msg) => AuthError::Validation(msg),
        models::errors::ModelError::Db(msg) => {
            let lower = msg.to_lowercase();
            if lower.contains("unique") || lower.contains("duplicate") {
                AuthError::Conflict
            } else {
                AuthError::Repository(msg)
            }
        }
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = user::find_by_username(&self.db, username).await.map_err(map_model_err)?;
        Ok(res.map(to_auth_user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = user::find_by_email(&self.db, email).await.map_err(map_model_err)?;
        Ok(res.map(to_auth_user))
    }

    /// Account, credentials, and the empty profile are created in one
    /// transaction; a failure on any row rolls back the others.
    async fn create_account(
        &self,
        username: &str,
        email: &str,
        role: UserRole,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await.map_err(|e| AuthError::Repository(e.to_string()))?;
        let created = user::create(&txn, username, email, role).await.map_err(map_model_err)?;
        user_credentials::upsert_password(&txn, created.id, password_hash, &password_algorithm)
            .await
            .map_err(map_model_err)?;
        profile::create_empty(&txn, created.id).await.map_err(map_model_err)?;
        txn.commit().await.map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(to_auth_user(created))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = user_credentials::find_by_user(&self.db, user_id).await.map_err(map_model_err)?;
        Ok(res.map(|c| Credentials {
            user_id: c.user_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        }))
    }
}
