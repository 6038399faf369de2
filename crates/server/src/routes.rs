use axum::middleware;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

pub mod auth;
pub mod base_info;
pub mod offers;
pub mod orders;
pub mod profiles;
pub mod reviews;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public routes, the authenticated API,
/// and the Swagger UI, all behind CORS and per-request tracing.
pub fn build_router(cors: CorsLayer, state: auth::ServerState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/registration", post(auth::register))
        .route("/login", post(auth::login))
        .route("/base-info", get(base_info::base_info));

    let api = Router::new()
        .route(
            "/profile/:id",
            get(profiles::get_profile)
                .put(profiles::update_profile)
                .patch(profiles::update_profile)
                .delete(profiles::delete_profile),
        )
        .route("/profiles/business", get(profiles::list_business))
        .route("/profiles/customer", get(profiles::list_customer))
        .route("/offers", get(offers::list).post(offers::create))
        .route("/offers/offerdetails/:id", get(offers::get_detail))
        .route(
            "/offers/:id",
            get(offers::get).put(offers::update).patch(offers::update).delete(offers::delete),
        )
        .route("/orders", get(orders::list).post(orders::create))
        .route(
            "/orders/:id",
            get(orders::get).put(orders::update).patch(orders::update).delete(orders::delete),
        )
        .route("/order-count/:business_id", get(orders::order_count))
        .route("/completed-order-count/:business_id", get(orders::completed_order_count))
        .route("/reviews", get(reviews::list).post(reviews::create))
        .route("/reviews/:id", patch(reviews::update).delete(reviews::delete));

    public
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
