use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use serde::Serialize;

use models::user::UserRole;
use models::{offer, review, user};

use crate::errors::{from_db, ServiceError};

/// Platform-wide aggregates served to anonymous callers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BaseInfo {
    pub review_count: u64,
    pub average_rating: f64,
    pub business_profile_count: u64,
    pub offer_count: u64,
}

#[derive(FromQueryResult)]
struct RateAvg {
    avg: Option<f64>,
}

pub async fn base_info(db: &DatabaseConnection) -> Result<BaseInfo, ServiceError> {
    let review_count = review::Entity::find().count(db).await.map_err(from_db)?;
    let avg = review::Entity::find()
        .select_only()
        .column_as(Expr::expr(Func::avg(Expr::col(review::Column::Rate))), "avg")
        .into_model::<RateAvg>()
        .one(db)
        .await
        .map_err(from_db)?
        .and_then(|r| r.avg)
        .unwrap_or(0.0);
    let business_profile_count = user::Entity::find()
        .filter(user::Column::Role.eq(UserRole::Business))
        .count(db)
        .await
        .map_err(from_db)?;
    let offer_count = offer::Entity::find().count(db).await.map_err(from_db)?;

    Ok(BaseInfo {
        review_count,
        average_rating: round_one_decimal(avg),
        business_profile_count,
        offer_count,
    })
}

/// Ratings are reported with one decimal place.
pub fn round_one_decimal(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::round_one_decimal;

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(round_one_decimal(8.0), 8.0);
        assert_eq!(round_one_decimal(8.25), 8.3);
        assert_eq!(round_one_decimal(8.24), 8.2);
        assert_eq!(round_one_decimal(0.0), 0.0);
    }
}
