use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::offer;

/// Pricing tier of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum OfferTier {
    #[sea_orm(string_value = "basic")]
    Basic,
    #[sea_orm(string_value = "standard")]
    Standard,
    #[sea_orm(string_value = "premium")]
    Premium,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offer_detail")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub offer_id: Uuid,
    pub title: String,
    pub revisions: i32,
    pub delivery_time: i32,
    pub price: Decimal,
    pub features: Json,
    pub offer_type: OfferTier,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Offer }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Offer => Entity::belongs_to(offer::Entity)
                .from(Column::OfferId)
                .to(offer::Column::Id)
                .into(),
        }
    }
}

impl Related<offer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Offer.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// A feature list is a JSON array of strings; anything else is rejected.
pub fn validate_features(features: &Json) -> Result<(), crate::errors::ModelError> {
    let entries = features
        .as_array()
        .ok_or_else(|| crate::errors::ModelError::Validation("features must be a list".into()))?;
    if entries.iter().any(|f| !f.is_string()) {
        return Err(crate::errors::ModelError::Validation(
            "features must not contain numbers or other non-string entries".into(),
        ));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn create<C: ConnectionTrait>(
    db: &C,
    offer_id: Uuid,
    title: &str,
    revisions: i32,
    delivery_time: i32,
    price: Decimal,
    features: Json,
    offer_type: OfferTier,
) -> Result<Model, crate::errors::ModelError> {
    validate_features(&features)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        offer_id: Set(offer_id),
        title: Set(title.to_string()),
        revisions: Set(revisions),
        delivery_time: Set(delivery_time),
        price: Set(price),
        features: Set(features),
        offer_type: Set(offer_type),
    };
    am.insert(db).await.map_err(|e| crate::errors::ModelError::Db(e.to_string()))
}
