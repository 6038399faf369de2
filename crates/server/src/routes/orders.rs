use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use service::order_service::{self, OrderView};

use crate::errors::JsonApiError;
use crate::routes::auth::{CurrentUser, ServerState};

#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub offer_detail_id: Uuid,
}

#[utoipa::path(get, path = "/orders", tag = "orders", responses((status = 200, description = "OK")))]
pub async fn list(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<OrderView>>, JsonApiError> {
    Ok(Json(order_service::list_orders(&state.db, &actor).await?))
}

#[utoipa::path(post, path = "/orders", tag = "orders", request_body = crate::openapi::CreateOrderRequest, responses((status = 201, description = "Created"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Json(input): Json<CreateOrderInput>,
) -> Result<(StatusCode, Json<OrderView>), JsonApiError> {
    let view = order_service::create_order(&state.db, &actor, input.offer_detail_id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(get, path = "/orders/{id}", tag = "orders", params(("id" = Uuid, Path, description = "order id")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    CurrentUser(_actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderView>, JsonApiError> {
    Ok(Json(order_service::get_order(&state.db, id).await?))
}

/// Accepts the raw JSON object so that unexpected fields fail loudly
/// instead of being dropped by deserialization.
#[utoipa::path(patch, path = "/orders/{id}", tag = "orders", params(("id" = Uuid, Path, description = "order id")), request_body = crate::openapi::OrderStatusUpdateRequest, responses((status = 200, description = "OK"), (status = 400, description = "Validation Error"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<JsonValue>,
) -> Result<Json<OrderView>, JsonApiError> {
    let map = payload.as_object().ok_or_else(|| {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some("expected a JSON object".into()))
    })?;
    Ok(Json(order_service::update_status(&state.db, &actor, id, map).await?))
}

#[utoipa::path(delete, path = "/orders/{id}", tag = "orders", params(("id" = Uuid, Path, description = "order id")), responses((status = 204, description = "Deleted"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    order_service::delete_order(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/order-count/{business_id}", tag = "orders", params(("business_id" = Uuid, Path, description = "business account id")), responses((status = 200, description = "OK"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn order_count(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(business_id): Path<Uuid>,
) -> Result<Json<JsonValue>, JsonApiError> {
    let count = order_service::in_progress_count(&state.db, &actor, business_id).await?;
    Ok(Json(serde_json::json!({ "order_count": count })))
}

#[utoipa::path(get, path = "/completed-order-count/{business_id}", tag = "orders", params(("business_id" = Uuid, Path, description = "business account id")), responses((status = 200, description = "OK"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn completed_order_count(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(business_id): Path<Uuid>,
) -> Result<Json<JsonValue>, JsonApiError> {
    let count = order_service::completed_count(&state.db, &actor, business_id).await?;
    Ok(Json(serde_json::json!({ "completed_order_count": count })))
}
