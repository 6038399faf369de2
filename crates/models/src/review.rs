use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub business_user_id: Uuid,
    pub reviewer_id: Uuid,
    pub rate: f64,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { BusinessUser, Reviewer }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::BusinessUser => Entity::belongs_to(user::Entity)
                .from(Column::BusinessUserId)
                .to(user::Column::Id)
                .into(),
            Relation::Reviewer => Entity::belongs_to(user::Entity)
                .from(Column::ReviewerId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_rate(rate: f64) -> Result<(), crate::errors::ModelError> {
    if !(0.0..=10.0).contains(&rate) || !rate.is_finite() {
        return Err(crate::errors::ModelError::Validation("rating must be between 0.0 and 10.0".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    business_user_id: Uuid,
    reviewer_id: Uuid,
    rate: f64,
    description: &str,
) -> Result<Model, crate::errors::ModelError> {
    validate_rate(rate)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        business_user_id: Set(business_user_id),
        reviewer_id: Set(reviewer_id),
        rate: Set(rate),
        description: Set(description.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| crate::errors::ModelError::Db(e.to_string()))
}
