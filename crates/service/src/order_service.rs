use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::{info, instrument};
use uuid::Uuid;

use models::orders::OrderStatus;
use models::user::UserRole;
use models::{offer, offer_detail, orders, user};

use crate::errors::{from_db, ServiceError};
use crate::payload;
use crate::permissions::{self, Actor};

/// Order representation embedding the purchased tier's snapshot fields.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: Uuid,
    pub customer_user: Uuid,
    pub business_user: Uuid,
    pub title: String,
    pub revisions: i32,
    pub delivery_time_in_days: i32,
    pub price: Decimal,
    pub features: JsonValue,
    pub offer_type: models::offer_detail::OfferTier,
    pub status: OrderStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

fn view(order: orders::Model, detail: &offer_detail::Model) -> OrderView {
    OrderView {
        id: order.id,
        customer_user: order.customer_user_id,
        business_user: order.business_user_id,
        title: detail.title.clone(),
        revisions: detail.revisions,
        delivery_time_in_days: detail.delivery_time,
        price: detail.price,
        features: detail.features.clone(),
        offer_type: detail.offer_type,
        status: order.status,
        created_at: order.created_at,
        updated_at: order.updated_at,
    }
}

/// Place an order for a tier. The business side is derived from the tier's
/// offer, never taken from the caller.
#[instrument(skip(db), fields(actor_id = %actor.id, offer_detail_id = %offer_detail_id))]
pub async fn create_order(
    db: &DatabaseConnection,
    actor: &Actor,
    offer_detail_id: Uuid,
) -> Result<OrderView, ServiceError> {
    let detail = offer_detail::Entity::find_by_id(offer_detail_id)
        .one(db)
        .await
        .map_err(from_db)?
        .ok_or_else(|| ServiceError::not_found("offer detail"))?;
    let parent = offer::Entity::find_by_id(detail.offer_id)
        .one(db)
        .await
        .map_err(from_db)?
        .ok_or_else(|| ServiceError::Db("offer detail without parent offer".into()))?;
    permissions::can_create_order(actor, parent.user_id)?;

    let order = orders::create(db, actor.id, parent.user_id, detail.id).await?;
    info!(order_id = %order.id, business_user = %order.business_user_id, "order_created");
    Ok(view(order, &detail))
}

/// All orders in which the actor participates, as customer or as business.
pub async fn list_orders(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<OrderView>, ServiceError> {
    let rows = orders::Entity::find()
        .filter(
            Condition::any()
                .add(orders::Column::CustomerUserId.eq(actor.id))
                .add(orders::Column::BusinessUserId.eq(actor.id)),
        )
        .find_also_related(offer_detail::Entity)
        .all(db)
        .await
        .map_err(from_db)?;
    rows.into_iter()
        .map(|(o, d)| {
            let d = d.ok_or_else(|| ServiceError::Db("order references a missing offer detail".into()))?;
            Ok(view(o, &d))
        })
        .collect()
}

pub async fn get_order(db: &DatabaseConnection, order_id: Uuid) -> Result<OrderView, ServiceError> {
    let (o, d) = orders::Entity::find_by_id(order_id)
        .find_also_related(offer_detail::Entity)
        .one(db)
        .await
        .map_err(from_db)?
        .ok_or_else(|| ServiceError::not_found("order"))?;
    let d = d.ok_or_else(|| ServiceError::Db("order references a missing offer detail".into()))?;
    Ok(view(o, &d))
}

/// Advance an order's status. Any payload key other than `status` fails the
/// whole update; nothing is applied partially.
#[instrument(skip(db, payload), fields(actor_id = %actor.id, order_id = %order_id))]
pub async fn update_status(
    db: &DatabaseConnection,
    actor: &Actor,
    order_id: Uuid,
    payload: &Map<String, JsonValue>,
) -> Result<OrderView, ServiceError> {
    permissions::can_update_order_status(actor)?;
    payload::ensure_only_fields(payload, &["status"])?;
    let raw = payload
        .get("status")
        .ok_or_else(|| ServiceError::Validation("status: this field is required".into()))?;
    let status: OrderStatus = serde_json::from_value(raw.clone()).map_err(|_| {
        ServiceError::Validation("status: must be one of in_progress, completed, canceled".into())
    })?;

    let existing = orders::Entity::find_by_id(order_id)
        .one(db)
        .await
        .map_err(from_db)?
        .ok_or_else(|| ServiceError::not_found("order"))?;
    let mut am: orders::ActiveModel = existing.into();
    am.status = Set(status);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(from_db)?;

    let detail = offer_detail::Entity::find_by_id(updated.offer_detail_id)
        .one(db)
        .await
        .map_err(from_db)?
        .ok_or_else(|| ServiceError::Db("order references a missing offer detail".into()))?;
    info!(order_id = %order_id, status = ?updated.status, "order_status_updated");
    Ok(view(updated, &detail))
}

pub async fn delete_order(db: &DatabaseConnection, actor: &Actor, order_id: Uuid) -> Result<(), ServiceError> {
    permissions::can_delete_order(actor)?;
    let res = orders::Entity::delete_by_id(order_id).exec(db).await.map_err(from_db)?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("order"));
    }
    info!(order_id = %order_id, "order_deleted");
    Ok(())
}

pub async fn in_progress_count(
    db: &DatabaseConnection,
    actor: &Actor,
    business_id: Uuid,
) -> Result<u64, ServiceError> {
    count_with_status(db, actor, business_id, OrderStatus::InProgress).await
}

pub async fn completed_count(
    db: &DatabaseConnection,
    actor: &Actor,
    business_id: Uuid,
) -> Result<u64, ServiceError> {
    count_with_status(db, actor, business_id, OrderStatus::Completed).await
}

/// Counts are scoped to the business account itself; a non-owner gets a
/// forbidden outcome rather than a misleading zero.
async fn count_with_status(
    db: &DatabaseConnection,
    actor: &Actor,
    business_id: Uuid,
    status: OrderStatus,
) -> Result<u64, ServiceError> {
    let business = user::Entity::find_by_id(business_id)
        .one(db)
        .await
        .map_err(from_db)?
        .filter(|u| u.role == UserRole::Business)
        .ok_or_else(|| ServiceError::not_found("business user"))?;
    permissions::can_view_business_counts(actor, business.id)?;

    orders::Entity::find()
        .filter(orders::Column::BusinessUserId.eq(business_id))
        .filter(orders::Column::Status.eq(status))
        .count(db)
        .await
        .map_err(from_db)
}
