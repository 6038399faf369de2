use axum::extract::State;
use axum::Json;

use service::stats_service::{self, BaseInfo};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

/// Platform-wide aggregates; the only authenticated-free data endpoint.
#[utoipa::path(get, path = "/base-info", tag = "stats", responses((status = 200, description = "OK")))]
pub async fn base_info(State(state): State<ServerState>) -> Result<Json<BaseInfo>, JsonApiError> {
    Ok(Json(stats_service::base_info(&state.db).await?))
}
