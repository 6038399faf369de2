//! Create `offer_detail` table with FK to `offer`.
//!
//! One row per pricing tier; `features` is a JSON list of strings.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OfferDetail::Table)
                    .if_not_exists()
                    .col(uuid(OfferDetail::Id).primary_key())
                    .col(uuid(OfferDetail::OfferId).not_null())
                    .col(string_len(OfferDetail::Title, 200).not_null())
                    .col(integer(OfferDetail::Revisions).not_null())
                    .col(integer(OfferDetail::DeliveryTime).not_null())
                    .col(decimal_len(OfferDetail::Price, 10, 2).not_null())
                    .col(json_binary(OfferDetail::Features).not_null())
                    .col(string_len(OfferDetail::OfferType, 20).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offer_detail_offer")
                            .from(OfferDetail::Table, OfferDetail::OfferId)
                            .to(Offer::Table, Offer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OfferDetail::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OfferDetail { Table, Id, OfferId, Title, Revisions, DeliveryTime, Price, Features, OfferType }

#[derive(DeriveIden)]
enum Offer { Table, Id }
