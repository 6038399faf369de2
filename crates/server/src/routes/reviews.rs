use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use service::review_service::{self, CreateReviewInput, ReviewOrdering, ReviewQuery, ReviewView};

use crate::errors::JsonApiError;
use crate::routes::auth::{CurrentUser, ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ReviewListParams {
    pub business_user_id: Option<Uuid>,
    pub reviewer_id: Option<Uuid>,
    /// updated_at or rating, "-" prefix for descending
    pub ordering: Option<String>,
}

#[utoipa::path(get, path = "/reviews", tag = "reviews", params(ReviewListParams), responses((status = 200, description = "OK"), (status = 400, description = "Validation Error")))]
pub async fn list(
    State(state): State<ServerState>,
    CurrentUser(_actor): CurrentUser,
    Query(params): Query<ReviewListParams>,
) -> Result<Json<Vec<ReviewView>>, JsonApiError> {
    let mut q = ReviewQuery {
        business_user_id: params.business_user_id,
        reviewer_id: params.reviewer_id,
        ordering: None,
    };
    if let Some(raw) = params.ordering.as_deref() {
        q.ordering = Some(ReviewOrdering::parse(raw)?);
    }
    Ok(Json(review_service::list_reviews(&state.db, q).await?))
}

#[utoipa::path(post, path = "/reviews", tag = "reviews", request_body = crate::openapi::CreateReviewRequest, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 403, description = "Forbidden"), (status = 409, description = "Conflict")))]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Json(input): Json<CreateReviewInput>,
) -> Result<(StatusCode, Json<ReviewView>), JsonApiError> {
    let view = review_service::create_review(&state.db, &actor, input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Accepts the raw JSON object so that fields outside {rating, description}
/// fail loudly instead of being dropped by deserialization.
#[utoipa::path(patch, path = "/reviews/{id}", tag = "reviews", params(("id" = Uuid, Path, description = "review id")), request_body = crate::openapi::ReviewUpdateRequest, responses((status = 200, description = "OK"), (status = 400, description = "Validation Error"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<JsonValue>,
) -> Result<Json<ReviewView>, JsonApiError> {
    let map = payload.as_object().ok_or_else(|| {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some("expected a JSON object".into()))
    })?;
    Ok(Json(review_service::update_review(&state.db, &actor, id, map).await?))
}

#[utoipa::path(delete, path = "/reviews/{id}", tag = "reviews", params(("id" = Uuid, Path, description = "review id")), responses((status = 204, description = "Deleted"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    review_service::delete_review(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
