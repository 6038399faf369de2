use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub repeated_password: String,
    /// "customer" or "business"
    pub r#type: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
    pub tel: Option<String>,
    pub description: Option<String>,
    pub working_hours: Option<String>,
    pub file: Option<String>,
}

#[derive(ToSchema)]
pub struct OfferDetailDoc {
    pub title: String,
    pub revisions: i32,
    pub delivery_time_in_days: i32,
    /// decimal, as string or number
    pub price: String,
    pub features: Vec<String>,
    /// "basic", "standard" or "premium"
    pub offer_type: String,
}

#[derive(ToSchema)]
pub struct CreateOfferRequest {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    /// at least three tiers
    pub details: Vec<OfferDetailDoc>,
}

#[derive(ToSchema)]
pub struct UpdateOfferRequest {
    pub title: Option<String>,
    /// each entry must carry its offer_type
    pub details: Vec<OfferDetailDoc>,
}

#[derive(ToSchema)]
pub struct CreateOrderRequest {
    pub offer_detail_id: Uuid,
}

#[derive(ToSchema)]
pub struct OrderStatusUpdateRequest {
    /// "in_progress", "completed" or "canceled"; no other field is accepted
    pub status: String,
}

#[derive(ToSchema)]
pub struct CreateReviewRequest {
    pub business_user: Uuid,
    /// 0.0 to 10.0
    pub rating: f64,
    pub description: Option<String>,
}

#[derive(ToSchema)]
pub struct ReviewUpdateRequest {
    pub rating: Option<f64>,
    pub description: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::base_info::base_info,
        crate::routes::profiles::get_profile,
        crate::routes::profiles::update_profile,
        crate::routes::profiles::delete_profile,
        crate::routes::profiles::list_business,
        crate::routes::profiles::list_customer,
        crate::routes::offers::list,
        crate::routes::offers::create,
        crate::routes::offers::get,
        crate::routes::offers::update,
        crate::routes::offers::delete,
        crate::routes::offers::get_detail,
        crate::routes::orders::list,
        crate::routes::orders::create,
        crate::routes::orders::get,
        crate::routes::orders::update,
        crate::routes::orders::delete,
        crate::routes::orders::order_count,
        crate::routes::orders::completed_order_count,
        crate::routes::reviews::list,
        crate::routes::reviews::create,
        crate::routes::reviews::update,
        crate::routes::reviews::delete,
    ),
    components(
        schemas(
            HealthResponse,
            RegistrationRequest,
            LoginRequest,
            ProfileUpdateRequest,
            OfferDetailDoc,
            CreateOfferRequest,
            UpdateOfferRequest,
            CreateOrderRequest,
            OrderStatusUpdateRequest,
            CreateReviewRequest,
            ReviewUpdateRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "profiles"),
        (name = "offers"),
        (name = "orders"),
        (name = "reviews"),
        (name = "stats"),
    )
)]
pub struct ApiDoc;
