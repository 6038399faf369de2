use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::user::UserRole;

use crate::permissions::Actor;

/// Registration input; `type` selects the account role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub repeated_password: String,
    #[serde(rename = "type")]
    pub role: UserRole,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Domain user (business view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub is_staff: bool,
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Login/registration result: the account plus its bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

/// JWT claims carried by every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub uid: Uuid,
    pub role: UserRole,
    pub staff: bool,
    pub exp: usize,
}

impl TokenClaims {
    pub fn actor(&self) -> Actor {
        Actor { id: self.uid, role: self.role, is_staff: self.staff }
    }
}
