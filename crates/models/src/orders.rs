use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{offer_detail, user};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_user_id: Uuid,
    pub business_user_id: Uuid,
    pub offer_detail_id: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { CustomerUser, BusinessUser, OfferDetail }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::CustomerUser => Entity::belongs_to(user::Entity)
                .from(Column::CustomerUserId)
                .to(user::Column::Id)
                .into(),
            Relation::BusinessUser => Entity::belongs_to(user::Entity)
                .from(Column::BusinessUserId)
                .to(user::Column::Id)
                .into(),
            Relation::OfferDetail => Entity::belongs_to(offer_detail::Entity)
                .from(Column::OfferDetailId)
                .to(offer_detail::Column::Id)
                .into(),
        }
    }
}

impl Related<offer_detail::Entity> for Entity {
    fn to() -> RelationDef { Relation::OfferDetail.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// The business side is always derived from the purchased tier's offer,
/// never supplied by the caller.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    customer_user_id: Uuid,
    business_user_id: Uuid,
    offer_detail_id: Uuid,
) -> Result<Model, crate::errors::ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_user_id: Set(customer_user_id),
        business_user_id: Set(business_user_id),
        offer_detail_id: Set(offer_detail_id),
        status: Set(OrderStatus::InProgress),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| crate::errors::ModelError::Db(e.to_string()))
}
