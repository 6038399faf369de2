use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user;

/// One-to-one extension of an account; keyed by the account id.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub location: String,
    pub tel: String,
    pub description: String,
    pub working_hours: String,
    pub file: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Insert the empty profile row that accompanies every new account.
pub async fn create_empty<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Model, crate::errors::ModelError> {
    let am = ActiveModel {
        user_id: Set(user_id),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        location: Set(String::new()),
        tel: Set(String::new()),
        description: Set(String::new()),
        working_hours: Set(String::new()),
        file: Set(None),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| crate::errors::ModelError::Db(e.to_string()))
}
