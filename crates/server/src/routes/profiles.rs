use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use models::user::UserRole;
use service::profile_service::{self, ProfileUpdateInput, ProfileView};

use crate::errors::JsonApiError;
use crate::routes::auth::{CurrentUser, ServerState};

#[utoipa::path(get, path = "/profile/{id}", tag = "profiles", params(("id" = Uuid, Path, description = "account id")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get_profile(
    State(state): State<ServerState>,
    CurrentUser(_actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileView>, JsonApiError> {
    Ok(Json(profile_service::get_profile(&state.db, id).await?))
}

#[utoipa::path(patch, path = "/profile/{id}", tag = "profiles", params(("id" = Uuid, Path, description = "account id")), request_body = crate::openapi::ProfileUpdateRequest, responses((status = 200, description = "OK"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update_profile(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<ProfileUpdateInput>,
) -> Result<Json<ProfileView>, JsonApiError> {
    Ok(Json(profile_service::update_profile(&state.db, &actor, id, input).await?))
}

#[utoipa::path(delete, path = "/profile/{id}", tag = "profiles", params(("id" = Uuid, Path, description = "account id")), responses((status = 204, description = "Deleted"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn delete_profile(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    profile_service::delete_profile(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/profiles/business", tag = "profiles", responses((status = 200, description = "OK")))]
pub async fn list_business(
    State(state): State<ServerState>,
    CurrentUser(_actor): CurrentUser,
) -> Result<Json<Vec<ProfileView>>, JsonApiError> {
    Ok(Json(profile_service::list_by_role(&state.db, UserRole::Business).await?))
}

#[utoipa::path(get, path = "/profiles/customer", tag = "profiles", responses((status = 200, description = "OK")))]
pub async fn list_customer(
    State(state): State<ServerState>,
    CurrentUser(_actor): CurrentUser,
) -> Result<Json<Vec<ProfileView>>, JsonApiError> {
    Ok(Json(profile_service::list_by_role(&state.db, UserRole::Customer).await?))
}
