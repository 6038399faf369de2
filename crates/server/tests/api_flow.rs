use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::Service;
use uuid::Uuid;

use server::routes::auth::{ServerAuthConfig, ServerState};
use server::routes::build_router;

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

/// Tests skip themselves when no database is reachable.
async fn build_app() -> Option<Router> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match models::db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    let state = ServerState {
        db,
        auth: ServerAuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 12 },
    };
    Some(build_router(cors(), state))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {}", t));
    }
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&v).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().call(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Register an account and return (user_id, token).
async fn register(app: &Router, username: &str, role: &str) -> (Uuid, String) {
    let (status, body) = call(
        app,
        "POST",
        "/registration",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "StrongPass123",
            "repeated_password": "StrongPass123",
            "type": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
    let user_id = Uuid::parse_str(body["user_id"].as_str().unwrap()).unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    (user_id, token)
}

#[tokio::test]
async fn test_registration_and_login_flow() {
    let Some(app) = build_app().await else { return };
    let username = format!("cust_{}", Uuid::new_v4().simple());
    let email = format!("{}@example.com", username);

    let (_id, token) = register(&app, &username, "customer").await;
    assert!(!token.is_empty());

    // duplicate email is a conflict, and creates no second account
    let (status, _) = call(
        &app,
        "POST",
        "/registration",
        None,
        Some(json!({
            "username": format!("other_{}", Uuid::new_v4().simple()),
            "email": email,
            "password": "StrongPass123",
            "repeated_password": "StrongPass123",
            "type": "customer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, body) = call(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"username": username, "password": "StrongPass123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"].as_str().unwrap(), username);
    assert!(body["token"].as_str().is_some());

    // wrong password
    let (status, _) = call(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"username": username, "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // mismatching password pair
    let (status, _) = call(
        &app,
        "POST",
        "/registration",
        None,
        Some(json!({
            "username": format!("x_{}", Uuid::new_v4().simple()),
            "email": format!("x_{}@example.com", Uuid::new_v4().simple()),
            "password": "StrongPass123",
            "repeated_password": "Different123",
            "type": "customer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // short password
    let (status, _) = call(
        &app,
        "POST",
        "/registration",
        None,
        Some(json!({
            "username": format!("y_{}", Uuid::new_v4().simple()),
            "email": format!("y_{}@example.com", Uuid::new_v4().simple()),
            "password": "short",
            "repeated_password": "short",
            "type": "customer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_endpoints_require_bearer_token() {
    let Some(app) = build_app().await else { return };
    let (status, _) = call(&app, "GET", "/offers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, "GET", "/orders", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    // the stats endpoint stays anonymous
    let (status, _) = call(&app, "GET", "/base-info", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_marketplace_scenario() {
    let Some(app) = build_app().await else { return };
    let biz_name = format!("biz_{}", Uuid::new_v4().simple());
    let cust_name = format!("cust_{}", Uuid::new_v4().simple());
    let (biz_id, biz_token) = register(&app, &biz_name, "business").await;
    let (cust_id, cust_token) = register(&app, &cust_name, "customer").await;

    // --- offers ---
    let tier = |title: &str, price: &str, days: i64| {
        json!({
            "title": title,
            "revisions": 2,
            "delivery_time_in_days": days,
            "price": price,
            "features": ["logo", "source files"],
            "offer_type": title,
        })
    };
    // two tiers are not enough
    let (status, _) = call(
        &app,
        "POST",
        "/offers",
        Some(&biz_token),
        Some(json!({
            "title": "Logo design",
            "description": "three tiers of logo work",
            "details": [tier("basic", "10.00", 7), tier("standard", "20.00", 5)],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // a customer may not create offers at all
    let (status, _) = call(
        &app,
        "POST",
        "/offers",
        Some(&cust_token),
        Some(json!({
            "title": "Logo design",
            "description": "nope",
            "details": [tier("basic", "10.00", 7), tier("standard", "20.00", 5), tier("premium", "30.00", 3)],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // numeric feature entries are rejected
    let (status, _) = call(
        &app,
        "POST",
        "/offers",
        Some(&biz_token),
        Some(json!({
            "title": "Logo design",
            "description": "bad features",
            "details": [
                {"title": "basic", "revisions": 1, "delivery_time_in_days": 7, "price": "10.00", "features": ["logo", 3], "offer_type": "basic"},
                tier("standard", "20.00", 5),
                tier("premium", "30.00", 3),
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, offer) = call(
        &app,
        "POST",
        "/offers",
        Some(&biz_token),
        Some(json!({
            "title": "Logo design",
            "description": "three tiers of logo work",
            "details": [tier("basic", "10.00", 7), tier("standard", "20.00", 5), tier("premium", "30.00", 3)],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "offer create failed: {}", offer);
    let offer_id = offer["id"].as_str().unwrap().to_string();
    assert_eq!(offer["user"].as_str().unwrap(), biz_id.to_string());
    assert_eq!(offer["min_price"], json!("10.00"));
    assert_eq!(offer["min_delivery_time"], json!(3));
    assert_eq!(offer["details"].as_array().unwrap().len(), 3);

    // list with the creator filter exposes the aggregate
    let (status, page) = call(
        &app,
        "GET",
        &format!("/offers?creator_id={}", biz_id),
        Some(&cust_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], json!(1));
    assert_eq!(page["results"][0]["min_price"], json!("10.00"));

    // aggregate filters
    let (status, page) = call(
        &app,
        "GET",
        &format!("/offers?creator_id={}&min_price=15", biz_id),
        Some(&cust_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], json!(0));
    let (status, page) = call(
        &app,
        "GET",
        &format!("/offers?creator_id={}&min_price=9,50&max_delivery_time=4", biz_id),
        Some(&cust_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], json!(1));

    // standalone tier retrieval
    let details = offer["details"].as_array().unwrap();
    let standard = details.iter().find(|d| d["price"] == json!("20.00")).unwrap();
    let standard_id = standard["id"].as_str().unwrap().to_string();
    let (status, body) = call(
        &app,
        "GET",
        &format!("/offers/offerdetails/{}", standard_id),
        Some(&cust_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["offer"].as_str().unwrap(), offer_id);

    // update: tier entry without offer_type fails the whole request
    let (status, _) = call(
        &app,
        "PATCH",
        &format!("/offers/{}", offer_id),
        Some(&biz_token),
        Some(json!({"details": [{"price": "8.00"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // tier-keyed update reprices the basic tier and moves the aggregate
    let (status, updated) = call(
        &app,
        "PATCH",
        &format!("/offers/{}", offer_id),
        Some(&biz_token),
        Some(json!({"title": "Logo design v2", "details": [{"offer_type": "basic", "price": "8.00"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "offer update failed: {}", updated);
    assert_eq!(updated["title"], json!("Logo design v2"));
    assert_eq!(updated["min_price"], json!("8.00"));

    // a stranger cannot update someone else's offer
    let (status, _) = call(
        &app,
        "PATCH",
        &format!("/offers/{}", offer_id),
        Some(&cust_token),
        Some(json!({"title": "hijacked"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // --- orders ---
    // the owner cannot order their own tier
    let (status, _) = call(
        &app,
        "POST",
        "/orders",
        Some(&biz_token),
        Some(json!({"offer_detail_id": standard_id})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // unknown tier is a 404
    let (status, _) = call(
        &app,
        "POST",
        "/orders",
        Some(&cust_token),
        Some(json!({"offer_detail_id": Uuid::new_v4()})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, order) = call(
        &app,
        "POST",
        "/orders",
        Some(&cust_token),
        Some(json!({"offer_detail_id": standard_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "order create failed: {}", order);
    let order_id = order["id"].as_str().unwrap().to_string();
    assert_eq!(order["business_user"].as_str().unwrap(), biz_id.to_string());
    assert_eq!(order["customer_user"].as_str().unwrap(), cust_id.to_string());
    assert_eq!(order["status"], json!("in_progress"));
    assert_eq!(order["price"], json!("20.00"));

    // both sides see the order
    let (_, as_customer) = call(&app, "GET", "/orders", Some(&cust_token), None).await;
    assert!(as_customer.as_array().unwrap().iter().any(|o| o["id"] == json!(order_id)));
    let (_, as_business) = call(&app, "GET", "/orders", Some(&biz_token), None).await;
    assert!(as_business.as_array().unwrap().iter().any(|o| o["id"] == json!(order_id)));

    // only `status` may appear in an order update
    let (status, _) = call(
        &app,
        "PATCH",
        &format!("/orders/{}", order_id),
        Some(&biz_token),
        Some(json!({"status": "completed", "price": "1.00"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // customers cannot advance the status
    let (status, _) = call(
        &app,
        "PATCH",
        &format!("/orders/{}", order_id),
        Some(&cust_token),
        Some(json!({"status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        "PATCH",
        &format!("/orders/{}", order_id),
        Some(&biz_token),
        Some(json!({"status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("completed"));

    // deleting an order requires staff
    let (status, _) = call(&app, "DELETE", &format!("/orders/{}", order_id), Some(&biz_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // counts are visible to the business itself only
    let (status, body) = call(&app, "GET", &format!("/order-count/{}", biz_id), Some(&biz_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_count"], json!(0));
    let (status, body) =
        call(&app, "GET", &format!("/completed-order-count/{}", biz_id), Some(&biz_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed_order_count"], json!(1));
    let (status, _) = call(&app, "GET", &format!("/order-count/{}", biz_id), Some(&cust_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    // a customer id is not a business account
    let (status, _) = call(&app, "GET", &format!("/order-count/{}", cust_id), Some(&cust_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // --- reviews ---
    let (_, before) = call(&app, "GET", "/base-info", None, None).await;
    let reviews_before = before["review_count"].as_u64().unwrap();

    // a business account cannot review
    let (status, _) = call(
        &app,
        "POST",
        "/reviews",
        Some(&biz_token),
        Some(json!({"business_user": biz_id, "rating": 8.0, "description": "self praise"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // ratings outside [0, 10] are rejected
    let (status, _) = call(
        &app,
        "POST",
        "/reviews",
        Some(&cust_token),
        Some(json!({"business_user": biz_id, "rating": 11.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // reviews must target business accounts
    let (status, _) = call(
        &app,
        "POST",
        "/reviews",
        Some(&cust_token),
        Some(json!({"business_user": cust_id, "rating": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, review) = call(
        &app,
        "POST",
        "/reviews",
        Some(&cust_token),
        Some(json!({"business_user": biz_id, "rating": 8.0, "description": "great work"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "review create failed: {}", review);
    let review_id = review["id"].as_str().unwrap().to_string();
    assert_eq!(review["rating"], json!(8.0));
    assert_eq!(review["reviewer"].as_str().unwrap(), cust_id.to_string());

    // one review per (reviewer, business) pair
    let (status, _) = call(
        &app,
        "POST",
        "/reviews",
        Some(&cust_token),
        Some(json!({"business_user": biz_id, "rating": 9.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, after) = call(&app, "GET", "/base-info", None, None).await;
    assert!(after["review_count"].as_u64().unwrap() >= reviews_before + 1);
    if reviews_before == 0 {
        assert_eq!(after["average_rating"], json!(8.0));
    }
    assert!(after["business_profile_count"].as_u64().unwrap() >= 1);
    assert!(after["offer_count"].as_u64().unwrap() >= 1);

    let (status, listed) = call(
        &app,
        "GET",
        &format!("/reviews?business_user_id={}", biz_id),
        Some(&biz_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["rating"], json!(8.0));

    // only {rating, description} are mutable, and only by the author
    let (status, _) = call(
        &app,
        "PATCH",
        &format!("/reviews/{}", review_id),
        Some(&biz_token),
        Some(json!({"rating": 1.0})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(
        &app,
        "PATCH",
        &format!("/reviews/{}", review_id),
        Some(&cust_token),
        Some(json!({"rating": 9.0, "business_user": Uuid::new_v4()})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, body) = call(
        &app,
        "PATCH",
        &format!("/reviews/{}", review_id),
        Some(&cust_token),
        Some(json!({"rating": 9.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], json!(9.0));

    // --- profiles ---
    let (status, body) = call(&app, "GET", &format!("/profile/{}", biz_id), Some(&cust_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"].as_str().unwrap(), biz_name);
    assert_eq!(body["type"], json!("business"));

    let (status, _) = call(
        &app,
        "PATCH",
        &format!("/profile/{}", biz_id),
        Some(&cust_token),
        Some(json!({"location": "elsewhere"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = call(
        &app,
        "PATCH",
        &format!("/profile/{}", biz_id),
        Some(&biz_token),
        Some(json!({"location": "Berlin", "working_hours": "9-17"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], json!("Berlin"));

    let (status, body) = call(&app, "GET", "/profiles/business", Some(&cust_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().iter().any(|p| p["username"] == json!(biz_name.clone())));

    // --- offer deletion cascades ---
    let (status, _) = call(&app, "DELETE", &format!("/offers/{}", offer_id), Some(&cust_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, "DELETE", &format!("/offers/{}", offer_id), Some(&biz_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, "GET", &format!("/offers/{}", offer_id), Some(&biz_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    // the order referencing the deleted tier is gone with it
    let (_, as_customer) = call(&app, "GET", "/orders", Some(&cust_token), None).await;
    assert!(as_customer.as_array().unwrap().iter().all(|o| o["id"] != json!(order_id)));
}
