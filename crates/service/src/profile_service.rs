use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use models::user::UserRole;
use models::{profile, user};

use crate::errors::{from_db, ServiceError};
use crate::permissions::{self, Actor};

/// Profile representation joined with the account fields reads expose.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub user: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub file: Option<String>,
    pub location: String,
    pub tel: String,
    pub description: String,
    pub working_hours: String,
    pub created_at: DateTimeWithTimeZone,
    #[serde(rename = "type")]
    pub role: UserRole,
    pub email: String,
}

fn view(p: profile::Model, u: user::Model) -> ProfileView {
    ProfileView {
        user: p.user_id,
        username: u.username,
        first_name: p.first_name,
        last_name: p.last_name,
        file: p.file,
        location: p.location,
        tel: p.tel,
        description: p.description,
        working_hours: p.working_hours,
        created_at: u.created_at,
        role: u.role,
        email: u.email,
    }
}

/// Only profile-owned fields are mutable; account fields are read-only here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdateInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
    pub tel: Option<String>,
    pub description: Option<String>,
    pub working_hours: Option<String>,
    pub file: Option<String>,
}

pub async fn get_profile(db: &DatabaseConnection, user_id: Uuid) -> Result<ProfileView, ServiceError> {
    let (p, u) = profile::Entity::find_by_id(user_id)
        .find_also_related(user::Entity)
        .one(db)
        .await
        .map_err(from_db)?
        .ok_or_else(|| ServiceError::not_found("profile"))?;
    let u = u.ok_or_else(|| ServiceError::Db("profile without account".into()))?;
    Ok(view(p, u))
}

#[instrument(skip(db, input), fields(actor_id = %actor.id, user_id = %user_id))]
pub async fn update_profile(
    db: &DatabaseConnection,
    actor: &Actor,
    user_id: Uuid,
    input: ProfileUpdateInput,
) -> Result<ProfileView, ServiceError> {
    permissions::can_modify_profile(actor, user_id)?;
    let existing = profile::Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(from_db)?
        .ok_or_else(|| ServiceError::not_found("profile"))?;

    let mut am: profile::ActiveModel = existing.into();
    if let Some(v) = input.first_name {
        am.first_name = Set(v);
    }
    if let Some(v) = input.last_name {
        am.last_name = Set(v);
    }
    if let Some(v) = input.location {
        am.location = Set(v);
    }
    if let Some(v) = input.tel {
        am.tel = Set(v);
    }
    if let Some(v) = input.description {
        am.description = Set(v);
    }
    if let Some(v) = input.working_hours {
        am.working_hours = Set(v);
    }
    if let Some(v) = input.file {
        am.file = Set(Some(v));
    }
    am.update(db).await.map_err(from_db)?;
    info!(user_id = %user_id, "profile_updated");
    get_profile(db, user_id).await
}

pub async fn delete_profile(db: &DatabaseConnection, actor: &Actor, user_id: Uuid) -> Result<(), ServiceError> {
    permissions::can_modify_profile(actor, user_id)?;
    let res = profile::Entity::delete_by_id(user_id).exec(db).await.map_err(from_db)?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("profile"));
    }
    info!(user_id = %user_id, "profile_deleted");
    Ok(())
}

/// Profiles of all accounts with the given role.
pub async fn list_by_role(db: &DatabaseConnection, role: UserRole) -> Result<Vec<ProfileView>, ServiceError> {
    let rows = profile::Entity::find()
        .find_also_related(user::Entity)
        .filter(user::Column::Role.eq(role))
        .all(db)
        .await
        .map_err(from_db)?;
    rows.into_iter()
        .map(|(p, u)| {
            let u = u.ok_or_else(|| ServiceError::Db("profile without account".into()))?;
            Ok(view(p, u))
        })
        .collect()
}
