use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{info, instrument};
use uuid::Uuid;

use models::offer_detail::OfferTier;
use models::{offer, offer_detail, orders};

use crate::errors::{from_db, ServiceError};
use crate::pagination::Pagination;
use crate::permissions::{self, Actor};

/// One pricing tier as supplied at offer creation.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailInput {
    pub title: String,
    pub revisions: i32,
    #[serde(rename = "delivery_time_in_days")]
    pub delivery_time: i32,
    pub price: Decimal,
    pub features: JsonValue,
    pub offer_type: OfferTier,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOfferInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    pub details: Vec<DetailInput>,
}

/// Partial tier update; `offer_type` keys the row being updated and is
/// therefore mandatory on every entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailPatch {
    pub offer_type: Option<OfferTier>,
    pub title: Option<String>,
    pub revisions: Option<i32>,
    #[serde(rename = "delivery_time_in_days")]
    pub delivery_time: Option<i32>,
    pub price: Option<Decimal>,
    pub features: Option<JsonValue>,
}

/// Only the title and the nested details may change after creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOfferInput {
    pub title: Option<String>,
    #[serde(default)]
    pub details: Vec<DetailPatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailView {
    pub id: Uuid,
    pub title: String,
    pub revisions: i32,
    pub delivery_time_in_days: i32,
    pub price: Decimal,
    pub features: JsonValue,
    pub offer_type: OfferTier,
}

impl From<offer_detail::Model> for DetailView {
    fn from(d: offer_detail::Model) -> Self {
        Self {
            id: d.id,
            title: d.title,
            revisions: d.revisions,
            delivery_time_in_days: d.delivery_time,
            price: d.price,
            features: d.features,
            offer_type: d.offer_type,
        }
    }
}

/// Standalone tier representation, carrying its parent offer id.
#[derive(Debug, Clone, Serialize)]
pub struct OfferDetailView {
    pub offer: Uuid,
    #[serde(flatten)]
    pub detail: DetailView,
}

/// Offer representation with the derived aggregates every read exposes.
#[derive(Debug, Clone, Serialize)]
pub struct OfferView {
    pub id: Uuid,
    pub user: Uuid,
    pub title: String,
    pub image: Option<String>,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub min_price: Option<Decimal>,
    pub min_delivery_time: Option<i32>,
    pub details: Vec<DetailView>,
}

impl OfferView {
    fn assemble(o: offer::Model, details: Vec<offer_detail::Model>) -> Self {
        Self {
            id: o.id,
            user: o.user_id,
            title: o.title,
            image: o.image,
            description: o.description,
            created_at: o.created_at,
            updated_at: o.updated_at,
            min_price: min_price(&details),
            min_delivery_time: min_delivery_time(&details),
            details: details.into_iter().map(DetailView::from).collect(),
        }
    }
}

/// Minimum price across an offer's current tiers; None without tiers.
pub fn min_price(details: &[offer_detail::Model]) -> Option<Decimal> {
    details.iter().map(|d| d.price).min()
}

/// Minimum delivery time (days) across an offer's current tiers.
pub fn min_delivery_time(details: &[offer_detail::Model]) -> Option<i32> {
    details.iter().map(|d| d.delivery_time).min()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOrdering {
    UpdatedAt,
    UpdatedAtDesc,
    MinPrice,
    MinPriceDesc,
}

impl OfferOrdering {
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        match raw {
            "updated_at" => Ok(Self::UpdatedAt),
            "-updated_at" => Ok(Self::UpdatedAtDesc),
            "min_price" => Ok(Self::MinPrice),
            "-min_price" => Ok(Self::MinPriceDesc),
            other => Err(ServiceError::Validation(format!(
                "ordering must be one of updated_at, min_price (got '{}')",
                other
            ))),
        }
    }
}

/// Accepts both comma and dot decimal separators ("12,50" == "12.50").
pub fn parse_min_price(raw: &str) -> Result<Decimal, ServiceError> {
    raw.replace(',', ".")
        .trim()
        .parse::<Decimal>()
        .map_err(|_| ServiceError::Validation("min_price must be a number".into()))
}

#[derive(Debug, Clone, Default)]
pub struct OfferQuery {
    pub creator_id: Option<Uuid>,
    pub min_price: Option<Decimal>,
    pub max_delivery_time: Option<i32>,
    pub search: Option<String>,
    pub ordering: Option<OfferOrdering>,
    pub page: Pagination,
}

#[derive(Debug, Serialize)]
pub struct OfferPage {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<OfferView>,
}

/// List offers with filtering, search, ordering, and pagination.
///
/// The creator filter and title/description search run in SQL; the
/// aggregate-derived filters and the min-price ordering work on the loaded
/// rows, which is O(rows returned) like every other operation here.
pub async fn list_offers(db: &DatabaseConnection, q: OfferQuery) -> Result<OfferPage, ServiceError> {
    let mut find = offer::Entity::find();
    if let Some(creator) = q.creator_id {
        find = find.filter(offer::Column::UserId.eq(creator));
    }
    if let Some(term) = q.search.as_deref().filter(|s| !s.trim().is_empty()) {
        find = find.filter(
            Condition::any()
                .add(offer::Column::Title.contains(term))
                .add(offer::Column::Description.contains(term)),
        );
    }

    let rows = find
        .find_with_related(offer_detail::Entity)
        .all(db)
        .await
        .map_err(from_db)?;
    let mut views: Vec<OfferView> = rows.into_iter().map(|(o, ds)| OfferView::assemble(o, ds)).collect();

    if let Some(max_days) = q.max_delivery_time {
        views.retain(|v| v.details.iter().any(|d| d.delivery_time_in_days <= max_days));
    }
    if let Some(floor) = q.min_price {
        views.retain(|v| v.min_price.map_or(false, |p| p >= floor));
    }

    match q.ordering.unwrap_or(OfferOrdering::UpdatedAtDesc) {
        OfferOrdering::UpdatedAt => views.sort_by_key(|v| v.updated_at),
        OfferOrdering::UpdatedAtDesc => {
            views.sort_by_key(|v| v.updated_at);
            views.reverse();
        }
        OfferOrdering::MinPrice => views.sort_by_key(|v| v.min_price),
        OfferOrdering::MinPriceDesc => {
            views.sort_by_key(|v| v.min_price);
            views.reverse();
        }
    }

    let count = views.len() as u64;
    let (page_idx, per_page) = q.page.normalize();
    let results = views
        .into_iter()
        .skip((page_idx * per_page) as usize)
        .take(per_page as usize)
        .collect();
    Ok(OfferPage { count, page: (page_idx + 1) as u32, page_size: per_page as u32, results })
}

/// Create an offer and its tiers atomically; a failing tier insert leaves
/// no partially-created offer behind.
#[instrument(skip(db, input), fields(actor_id = %actor.id))]
pub async fn create_offer(
    db: &DatabaseConnection,
    actor: &Actor,
    input: CreateOfferInput,
) -> Result<OfferView, ServiceError> {
    permissions::can_create_offer(actor)?;
    if input.details.len() < 3 {
        return Err(ServiceError::Validation("an offer must have at least three details".into()));
    }
    for d in &input.details {
        offer_detail::validate_features(&d.features)?;
    }

    let txn = db.begin().await.map_err(from_db)?;
    let created = offer::create(&txn, actor.id, &input.title, input.image.clone(), &input.description).await?;
    let mut details = Vec::with_capacity(input.details.len());
    for d in input.details {
        let row = offer_detail::create(
            &txn,
            created.id,
            &d.title,
            d.revisions,
            d.delivery_time,
            d.price,
            d.features,
            d.offer_type,
        )
        .await?;
        details.push(row);
    }
    txn.commit().await.map_err(from_db)?;

    info!(offer_id = %created.id, details = details.len(), "offer_created");
    Ok(OfferView::assemble(created, details))
}

/// Update an offer's title and tiers. Incoming details are matched to
/// existing rows by tier; a tier the offer does not have yet is appended.
/// Image and description are immutable after creation.
#[instrument(skip(db, input), fields(actor_id = %actor.id, offer_id = %offer_id))]
pub async fn update_offer(
    db: &DatabaseConnection,
    actor: &Actor,
    offer_id: Uuid,
    input: UpdateOfferInput,
) -> Result<OfferView, ServiceError> {
    let existing = offer::Entity::find_by_id(offer_id)
        .one(db)
        .await
        .map_err(from_db)?
        .ok_or_else(|| ServiceError::not_found("offer"))?;
    permissions::can_modify_offer(actor, existing.user_id)?;

    if let Some(title) = &input.title {
        offer::validate_title(title)?;
    }
    // Validate every entry before anything is written.
    let mut patches = Vec::with_capacity(input.details.len());
    for (i, d) in input.details.into_iter().enumerate() {
        let Some(tier) = d.offer_type else {
            return Err(ServiceError::Validation(format!("details[{}]: offer_type is required", i)));
        };
        if let Some(features) = &d.features {
            offer_detail::validate_features(features)?;
        }
        patches.push((tier, d));
    }

    let txn = db.begin().await.map_err(from_db)?;
    let mut am: offer::ActiveModel = existing.into();
    if let Some(title) = input.title {
        am.title = Set(title);
    }
    am.updated_at = Set(Utc::now().into());
    am.update(&txn).await.map_err(from_db)?;

    let existing_details = offer_detail::Entity::find()
        .filter(offer_detail::Column::OfferId.eq(offer_id))
        .all(&txn)
        .await
        .map_err(from_db)?;

    for (tier, patch) in patches {
        match existing_details.iter().find(|d| d.offer_type == tier) {
            Some(row) => {
                let mut dam: offer_detail::ActiveModel = row.clone().into();
                if let Some(title) = patch.title {
                    dam.title = Set(title);
                }
                if let Some(revisions) = patch.revisions {
                    dam.revisions = Set(revisions);
                }
                if let Some(days) = patch.delivery_time {
                    dam.delivery_time = Set(days);
                }
                if let Some(price) = patch.price {
                    dam.price = Set(price);
                }
                if let Some(features) = patch.features {
                    dam.features = Set(features);
                }
                dam.update(&txn).await.map_err(from_db)?;
            }
            None => {
                offer_detail::create(
                    &txn,
                    offer_id,
                    patch.title.as_deref().unwrap_or(""),
                    patch.revisions.unwrap_or(0),
                    patch.delivery_time.unwrap_or(0),
                    patch.price.unwrap_or_default(),
                    patch.features.unwrap_or_else(|| JsonValue::Array(vec![])),
                    tier,
                )
                .await?;
            }
        }
    }
    txn.commit().await.map_err(from_db)?;

    get_offer(db, offer_id).await
}

/// Delete an offer, its tiers, and the orders referencing them, explicitly
/// and in one transaction. The schema-level FK cascade is only a backstop.
#[instrument(skip(db), fields(actor_id = %actor.id, offer_id = %offer_id))]
pub async fn delete_offer(db: &DatabaseConnection, actor: &Actor, offer_id: Uuid) -> Result<(), ServiceError> {
    let existing = offer::Entity::find_by_id(offer_id)
        .one(db)
        .await
        .map_err(from_db)?
        .ok_or_else(|| ServiceError::not_found("offer"))?;
    permissions::can_modify_offer(actor, existing.user_id)?;

    let detail_ids: Vec<Uuid> = offer_detail::Entity::find()
        .filter(offer_detail::Column::OfferId.eq(offer_id))
        .all(db)
        .await
        .map_err(from_db)?
        .into_iter()
        .map(|d| d.id)
        .collect();

    let txn = db.begin().await.map_err(from_db)?;
    if !detail_ids.is_empty() {
        orders::Entity::delete_many()
            .filter(orders::Column::OfferDetailId.is_in(detail_ids))
            .exec(&txn)
            .await
            .map_err(from_db)?;
    }
    offer_detail::Entity::delete_many()
        .filter(offer_detail::Column::OfferId.eq(offer_id))
        .exec(&txn)
        .await
        .map_err(from_db)?;
    offer::Entity::delete_by_id(offer_id).exec(&txn).await.map_err(from_db)?;
    txn.commit().await.map_err(from_db)?;

    info!(offer_id = %offer_id, "offer_deleted");
    Ok(())
}

pub async fn get_offer(db: &DatabaseConnection, offer_id: Uuid) -> Result<OfferView, ServiceError> {
    let rows = offer::Entity::find_by_id(offer_id)
        .find_with_related(offer_detail::Entity)
        .all(db)
        .await
        .map_err(from_db)?;
    let (o, ds) = rows.into_iter().next().ok_or_else(|| ServiceError::not_found("offer"))?;
    Ok(OfferView::assemble(o, ds))
}

pub async fn get_detail(db: &DatabaseConnection, detail_id: Uuid) -> Result<OfferDetailView, ServiceError> {
    let d = offer_detail::Entity::find_by_id(detail_id)
        .one(db)
        .await
        .map_err(from_db)?
        .ok_or_else(|| ServiceError::not_found("offer detail"))?;
    Ok(OfferDetailView { offer: d.offer_id, detail: DetailView::from(d) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail(tier: OfferTier, price: i64, days: i32) -> offer_detail::Model {
        offer_detail::Model {
            id: Uuid::new_v4(),
            offer_id: Uuid::new_v4(),
            title: "tier".into(),
            revisions: 1,
            delivery_time: days,
            price: Decimal::new(price, 2),
            features: json!(["a"]),
            offer_type: tier,
        }
    }

    #[test]
    fn min_aggregates_over_details() {
        let details = vec![
            detail(OfferTier::Basic, 1000, 7),
            detail(OfferTier::Standard, 2000, 3),
            detail(OfferTier::Premium, 3000, 14),
        ];
        assert_eq!(min_price(&details), Some(Decimal::new(1000, 2)));
        assert_eq!(min_delivery_time(&details), Some(3));
    }

    #[test]
    fn min_aggregates_are_none_without_details() {
        assert_eq!(min_price(&[]), None);
        assert_eq!(min_delivery_time(&[]), None);
    }

    #[test]
    fn min_aggregates_follow_edits() {
        let mut details = vec![detail(OfferTier::Basic, 1000, 7), detail(OfferTier::Standard, 2000, 3)];
        assert_eq!(min_price(&details), Some(Decimal::new(1000, 2)));
        details[0].price = Decimal::new(2500, 2);
        assert_eq!(min_price(&details), Some(Decimal::new(2000, 2)));
        details.push(detail(OfferTier::Premium, 500, 1));
        assert_eq!(min_price(&details), Some(Decimal::new(500, 2)));
        assert_eq!(min_delivery_time(&details), Some(1));
    }

    #[test]
    fn ordering_parses_both_directions() {
        assert_eq!(OfferOrdering::parse("updated_at").unwrap(), OfferOrdering::UpdatedAt);
        assert_eq!(OfferOrdering::parse("-updated_at").unwrap(), OfferOrdering::UpdatedAtDesc);
        assert_eq!(OfferOrdering::parse("min_price").unwrap(), OfferOrdering::MinPrice);
        assert_eq!(OfferOrdering::parse("-min_price").unwrap(), OfferOrdering::MinPriceDesc);
        assert!(OfferOrdering::parse("created_at").is_err());
    }

    #[test]
    fn min_price_accepts_comma_decimals() {
        assert_eq!(parse_min_price("12,50").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_min_price("12.50").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_min_price("10").unwrap(), Decimal::new(10, 0));
        assert!(parse_min_price("abc").is_err());
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::test_support::get_db;
    use models::user::{self, UserRole};
    use serde_json::json;

    fn actor_for(u: &user::Model) -> Actor {
        Actor { id: u.id, role: u.role, is_staff: u.is_staff }
    }

    fn tier_input(tier: OfferTier, price: i64, days: i32) -> DetailInput {
        DetailInput {
            title: "tier".into(),
            revisions: 2,
            delivery_time: days,
            price: Decimal::new(price, 2),
            features: json!(["source files"]),
            offer_type: tier,
        }
    }

    #[tokio::test]
    async fn offer_crud_flow() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let uname = format!("biz_{}", Uuid::new_v4());
        let owner = user::create(&db, &uname, &format!("{}@example.com", uname), UserRole::Business).await?;
        let actor = actor_for(&owner);

        let too_few = CreateOfferInput {
            title: "Logo".into(),
            description: "d".into(),
            image: None,
            details: vec![tier_input(OfferTier::Basic, 1000, 7), tier_input(OfferTier::Standard, 2000, 5)],
        };
        assert!(matches!(create_offer(&db, &actor, too_few).await, Err(ServiceError::Validation(_))));

        let input = CreateOfferInput {
            title: "Logo design".into(),
            description: "three tiers".into(),
            image: None,
            details: vec![
                tier_input(OfferTier::Basic, 1000, 7),
                tier_input(OfferTier::Standard, 2000, 5),
                tier_input(OfferTier::Premium, 3000, 3),
            ],
        };
        let created = create_offer(&db, &actor, input).await?;
        assert_eq!(created.min_price, Some(Decimal::new(1000, 2)));
        assert_eq!(created.min_delivery_time, Some(3));

        // tier-keyed update: reprice the basic tier
        let update = UpdateOfferInput {
            title: Some("Logo design v2".into()),
            details: vec![DetailPatch {
                offer_type: Some(OfferTier::Basic),
                price: Some(Decimal::new(500, 2)),
                title: None,
                revisions: None,
                delivery_time: None,
                features: None,
            }],
        };
        let updated = update_offer(&db, &actor, created.id, update).await?;
        assert_eq!(updated.title, "Logo design v2");
        assert_eq!(updated.min_price, Some(Decimal::new(500, 2)));

        // a missing tier on update fails the whole request
        let missing_tier = UpdateOfferInput {
            title: None,
            details: vec![DetailPatch {
                offer_type: None,
                price: Some(Decimal::new(100, 2)),
                title: None,
                revisions: None,
                delivery_time: None,
                features: None,
            }],
        };
        assert!(matches!(
            update_offer(&db, &actor, created.id, missing_tier).await,
            Err(ServiceError::Validation(_))
        ));

        let page = list_offers(&db, OfferQuery { creator_id: Some(owner.id), ..Default::default() }).await?;
        assert_eq!(page.count, 1);

        // a stranger cannot delete the offer
        let stranger = Actor { id: Uuid::new_v4(), role: UserRole::Business, is_staff: false };
        assert!(matches!(delete_offer(&db, &stranger, created.id).await, Err(ServiceError::Forbidden(_))));

        delete_offer(&db, &actor, created.id).await?;
        assert!(matches!(get_offer(&db, created.id).await, Err(ServiceError::NotFound(_))));

        user::Entity::delete_by_id(owner.id).exec(&db).await?;
        Ok(())
    }
}
