//! Create `profile` table, keyed by the owning account id.
//!
//! One row per account, created empty at registration.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(uuid(Profile::UserId).primary_key())
                    .col(string_len(Profile::FirstName, 100).not_null().default(""))
                    .col(string_len(Profile::LastName, 100).not_null().default(""))
                    .col(string_len(Profile::Location, 100).not_null().default(""))
                    .col(string_len(Profile::Tel, 32).not_null().default(""))
                    .col(text(Profile::Description).not_null().default(""))
                    .col(string_len(Profile::WorkingHours, 100).not_null().default(""))
                    .col(ColumnDef::new(Profile::File).string().null())
                    .col(timestamp_with_time_zone(Profile::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_user")
                            .from(Profile::Table, Profile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Profile::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Profile { Table, UserId, FirstName, LastName, Location, Tel, Description, WorkingHours, File, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
