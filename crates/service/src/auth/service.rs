use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use models::user;

use super::domain::{AuthSession, AuthUser, LoginInput, RegisterInput, TokenClaims};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new account with a hashed password and issue its bearer token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use models::user::UserRole;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 12 });
    /// let input = RegisterInput {
    ///     username: "biz1".into(),
    ///     email: "biz1@example.com".into(),
    ///     password: "Secret123".into(),
    ///     repeated_password: "Secret123".into(),
    ///     role: UserRole::Business,
    /// };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.email, "biz1@example.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username, email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        user::validate_username(&input.username).map_err(|e| AuthError::Validation(e.to_string()))?;
        user::validate_email(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if input.password != input.repeated_password {
            return Err(AuthError::Validation("passwords do not match".into()));
        }
        if let Some(existing) = self.repo.find_by_email(&input.email).await? {
            debug!("email taken by: {}", existing.username);
            return Err(AuthError::Conflict);
        }
        if self.repo.find_by_username(&input.username).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        // The unique columns on `user` close the remaining check-then-insert
        // window; a concurrent duplicate surfaces as Conflict here.
        let user = self
            .repo
            .create_account(&input.username, &input.email, input.role, hash, "argon2".into())
            .await?;
        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, role = ?user.role, "account_registered");
        Ok(AuthSession { user, token })
    }

    /// Authenticate an account and issue a fresh bearer token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{LoginInput, RegisterInput};
    /// use models::user::UserRole;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 12 });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput {
    ///     username: "cust1".into(),
    ///     email: "cust1@example.com".into(),
    ///     password: "Passw0rd".into(),
    ///     repeated_password: "Passw0rd".into(),
    ///     role: UserRole::Customer,
    /// }));
    /// let session = tokio_test::block_on(svc.login(LoginInput {
    ///     username: "cust1".into(),
    ///     password: "Passw0rd".into(),
    /// })).unwrap();
    /// assert_eq!(session.user.username, "cust1");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self
            .repo
            .find_by_username(&input.username)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self
            .repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&user)?;
        Ok(AuthSession { user, token })
    }

    fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize;
        let claims = TokenClaims {
            sub: user.username.clone(),
            uid: user.id,
            role: user.role,
            staff: user.is_staff,
            exp,
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}

/// Validate a bearer token and return its claims; used by the HTTP middleware.
pub fn decode_token(secret: &str, token: &str) -> Result<TokenClaims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
}
