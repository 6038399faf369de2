use chrono::Utc;
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::{info, instrument};
use uuid::Uuid;

use models::user::UserRole;
use models::{review, user};

use crate::errors::{from_db, ServiceError};
use crate::payload;
use crate::permissions::{self, Actor};

/// Review representation; the stored `rate` is exposed as `rating`.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub id: Uuid,
    pub business_user: Uuid,
    pub reviewer: Uuid,
    pub rating: f64,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<review::Model> for ReviewView {
    fn from(r: review::Model) -> Self {
        Self {
            id: r.id,
            business_user: r.business_user_id,
            reviewer: r.reviewer_id,
            rating: r.rate,
            description: r.description,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewInput {
    pub business_user: Uuid,
    pub rating: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOrdering {
    UpdatedAt,
    UpdatedAtDesc,
    Rating,
    RatingDesc,
}

impl ReviewOrdering {
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        match raw {
            "updated_at" => Ok(Self::UpdatedAt),
            "-updated_at" => Ok(Self::UpdatedAtDesc),
            "rating" => Ok(Self::Rating),
            "-rating" => Ok(Self::RatingDesc),
            other => Err(ServiceError::Validation(format!(
                "ordering must be one of updated_at, rating (got '{}')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewQuery {
    pub business_user_id: Option<Uuid>,
    pub reviewer_id: Option<Uuid>,
    pub ordering: Option<ReviewOrdering>,
}

/// Create a review for a business account. One review per (reviewer,
/// business) pair: the pre-check gives the friendly message, the unique
/// index on the pair closes the concurrent window.
#[instrument(skip(db, input), fields(actor_id = %actor.id, business_user = %input.business_user))]
pub async fn create_review(
    db: &DatabaseConnection,
    actor: &Actor,
    input: CreateReviewInput,
) -> Result<ReviewView, ServiceError> {
    permissions::can_create_review(actor)?;
    let target = user::Entity::find_by_id(input.business_user)
        .one(db)
        .await
        .map_err(from_db)?
        .ok_or_else(|| ServiceError::not_found("business user"))?;
    if target.role != UserRole::Business {
        return Err(ServiceError::Validation("business_user must reference a business account".into()));
    }
    review::validate_rate(input.rating)?;

    let existing = review::Entity::find()
        .filter(review::Column::ReviewerId.eq(actor.id))
        .filter(review::Column::BusinessUserId.eq(target.id))
        .one(db)
        .await
        .map_err(from_db)?;
    if existing.is_some() {
        return Err(ServiceError::Conflict("you have already reviewed this business".into()));
    }

    let created = review::create(db, target.id, actor.id, input.rating, &input.description).await?;
    info!(review_id = %created.id, "review_created");
    Ok(ReviewView::from(created))
}

pub async fn list_reviews(db: &DatabaseConnection, q: ReviewQuery) -> Result<Vec<ReviewView>, ServiceError> {
    let mut find = review::Entity::find();
    if let Some(business) = q.business_user_id {
        find = find.filter(review::Column::BusinessUserId.eq(business));
    }
    if let Some(reviewer) = q.reviewer_id {
        find = find.filter(review::Column::ReviewerId.eq(reviewer));
    }
    find = match q.ordering.unwrap_or(ReviewOrdering::UpdatedAtDesc) {
        ReviewOrdering::UpdatedAt => find.order_by_asc(review::Column::UpdatedAt),
        ReviewOrdering::UpdatedAtDesc => find.order_by_desc(review::Column::UpdatedAt),
        ReviewOrdering::Rating => find.order_by_asc(review::Column::Rate),
        ReviewOrdering::RatingDesc => find.order_by_desc(review::Column::Rate),
    };
    let rows = find.all(db).await.map_err(from_db)?;
    Ok(rows.into_iter().map(ReviewView::from).collect())
}

/// Update a review's rating and/or description; any other payload key fails
/// the whole request.
#[instrument(skip(db, payload), fields(actor_id = %actor.id, review_id = %review_id))]
pub async fn update_review(
    db: &DatabaseConnection,
    actor: &Actor,
    review_id: Uuid,
    payload: &Map<String, JsonValue>,
) -> Result<ReviewView, ServiceError> {
    let existing = review::Entity::find_by_id(review_id)
        .one(db)
        .await
        .map_err(from_db)?
        .ok_or_else(|| ServiceError::not_found("review"))?;
    permissions::can_modify_review(actor, existing.reviewer_id)?;
    payload::ensure_only_fields(payload, &["rating", "description"])?;

    let mut am: review::ActiveModel = existing.into();
    if let Some(raw) = payload.get("rating") {
        let rating: f64 = serde_json::from_value(raw.clone())
            .map_err(|_| ServiceError::Validation("rating: must be a number".into()))?;
        review::validate_rate(rating)?;
        am.rate = Set(rating);
    }
    if let Some(raw) = payload.get("description") {
        let description: String = serde_json::from_value(raw.clone())
            .map_err(|_| ServiceError::Validation("description: must be a string".into()))?;
        am.description = Set(description);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(from_db)?;
    Ok(ReviewView::from(updated))
}

pub async fn delete_review(db: &DatabaseConnection, actor: &Actor, review_id: Uuid) -> Result<(), ServiceError> {
    let existing = review::Entity::find_by_id(review_id)
        .one(db)
        .await
        .map_err(from_db)?
        .ok_or_else(|| ServiceError::not_found("review"))?;
    permissions::can_modify_review(actor, existing.reviewer_id)?;
    review::Entity::delete_by_id(existing.id).exec(db).await.map_err(from_db)?;
    info!(review_id = %review_id, "review_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_parses_both_directions() {
        assert_eq!(ReviewOrdering::parse("updated_at").unwrap(), ReviewOrdering::UpdatedAt);
        assert_eq!(ReviewOrdering::parse("-rating").unwrap(), ReviewOrdering::RatingDesc);
        assert!(ReviewOrdering::parse("created_at").is_err());
    }
}
