use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use models::user::UserRole;
use service::auth::domain::{LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{decode_token, AuthConfig, AuthService};
use service::permissions::Actor;

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        AuthService::new(
            repo,
            AuthConfig {
                jwt_secret: self.auth.jwt_secret.clone(),
                token_ttl_hours: self.auth.token_ttl_hours,
            },
        )
    }
}

#[derive(Serialize)]
pub struct RegistrationOutput {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(rename = "type")]
    pub role: UserRole,
    pub token: String,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub token: String,
}

#[utoipa::path(post, path = "/registration", tag = "auth", request_body = crate::openapi::RegistrationRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Validation Error"), (status = 409, description = "Conflict")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<RegistrationOutput>), JsonApiError> {
    let session = state.auth_service().register(input).await?;
    let user = session.user;
    Ok((
        StatusCode::CREATED,
        Json(RegistrationOutput {
            user_id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            token: session.token,
        }),
    ))
}

#[utoipa::path(post, path = "/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginOutput>, JsonApiError> {
    let session = state.auth_service().login(input).await?;
    let user = session.user;
    Ok(Json(LoginOutput {
        user_id: user.id,
        username: user.username,
        email: user.email,
        token: session.token,
    }))
}

/// The authenticated actor, stashed in request extensions by the bearer
/// middleware and pulled out by handlers through this extractor.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Actor>().copied().map(CurrentUser).ok_or_else(|| {
            JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some("missing authentication".into()))
        })
    }
}

/// Global middleware: outside the public allowlist, require a valid
/// `Authorization: Bearer <token>` header and stash the actor for handlers.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    // Allowlist: health, registration/login, public stats, docs, CORS preflight
    if path == "/health"
        || path == "/registration"
        || path == "/login"
        || path == "/base-info"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
        || method == axum::http::Method::OPTIONS
    {
        return Ok(next.run(req).await);
    }

    let authz = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some("missing Authorization header".into()))
        })?;
    let token = authz.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
        JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some("expected a Bearer token".into()))
    })?;

    match decode_token(&state.auth.jwt_secret, token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims.actor());
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            Err(JsonApiError::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some("invalid or expired token".into())))
        }
    }
}
