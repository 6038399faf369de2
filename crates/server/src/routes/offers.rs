use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use service::offer_service::{
    self, CreateOfferInput, OfferDetailView, OfferOrdering, OfferPage, OfferQuery, OfferView,
    UpdateOfferInput,
};
use service::pagination::Pagination;

use crate::errors::JsonApiError;
use crate::routes::auth::{CurrentUser, ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct OfferListParams {
    pub creator_id: Option<Uuid>,
    /// lower bound on the offer's min price; comma or dot decimals
    pub min_price: Option<String>,
    /// upper bound on any tier's delivery time, in days
    pub max_delivery_time: Option<i32>,
    /// matched against title and description
    pub search: Option<String>,
    /// updated_at or min_price, "-" prefix for descending
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl OfferListParams {
    fn into_query(self) -> Result<OfferQuery, JsonApiError> {
        let mut q = OfferQuery { creator_id: self.creator_id, ..Default::default() };
        if let Some(raw) = self.min_price.as_deref() {
            q.min_price = Some(offer_service::parse_min_price(raw)?);
        }
        q.max_delivery_time = self.max_delivery_time;
        q.search = self.search;
        if let Some(raw) = self.ordering.as_deref() {
            q.ordering = Some(OfferOrdering::parse(raw)?);
        }
        let mut page = Pagination::default();
        if let Some(p) = self.page {
            page.page = p;
        }
        if let Some(size) = self.page_size {
            page.page_size = size;
        }
        q.page = page;
        Ok(q)
    }
}

#[utoipa::path(get, path = "/offers", tag = "offers", params(OfferListParams), responses((status = 200, description = "OK"), (status = 400, description = "Validation Error")))]
pub async fn list(
    State(state): State<ServerState>,
    CurrentUser(_actor): CurrentUser,
    Query(params): Query<OfferListParams>,
) -> Result<Json<OfferPage>, JsonApiError> {
    let q = params.into_query()?;
    Ok(Json(offer_service::list_offers(&state.db, q).await?))
}

#[utoipa::path(post, path = "/offers", tag = "offers", request_body = crate::openapi::CreateOfferRequest, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 403, description = "Forbidden")))]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Json(input): Json<CreateOfferInput>,
) -> Result<(StatusCode, Json<OfferView>), JsonApiError> {
    let view = offer_service::create_offer(&state.db, &actor, input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(get, path = "/offers/{id}", tag = "offers", params(("id" = Uuid, Path, description = "offer id")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    CurrentUser(_actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OfferView>, JsonApiError> {
    Ok(Json(offer_service::get_offer(&state.db, id).await?))
}

#[utoipa::path(patch, path = "/offers/{id}", tag = "offers", params(("id" = Uuid, Path, description = "offer id")), request_body = crate::openapi::UpdateOfferRequest, responses((status = 200, description = "OK"), (status = 400, description = "Validation Error"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateOfferInput>,
) -> Result<Json<OfferView>, JsonApiError> {
    Ok(Json(offer_service::update_offer(&state.db, &actor, id, input).await?))
}

#[utoipa::path(delete, path = "/offers/{id}", tag = "offers", params(("id" = Uuid, Path, description = "offer id")), responses((status = 204, description = "Deleted"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    offer_service::delete_offer(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/offers/offerdetails/{id}", tag = "offers", params(("id" = Uuid, Path, description = "offer detail id")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get_detail(
    State(state): State<ServerState>,
    CurrentUser(_actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OfferDetailView>, JsonApiError> {
    Ok(Json(offer_service::get_detail(&state.db, id).await?))
}
