//! Lookup indexes plus the uniqueness constraint that closes the
//! duplicate-review race: one review per (reviewer, business) pair is
//! enforced by the store, not only by the pre-insert check.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Offers: index on owning user
        manager
            .create_index(
                Index::create()
                    .name("idx_offer_user")
                    .table(Offer::Table)
                    .col(Offer::UserId)
                    .to_owned(),
            )
            .await?;

        // Offer details: index on parent offer
        manager
            .create_index(
                Index::create()
                    .name("idx_offer_detail_offer")
                    .table(OfferDetail::Table)
                    .col(OfferDetail::OfferId)
                    .to_owned(),
            )
            .await?;

        // Orders: indexes on both owner sides
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_customer")
                    .table(Orders::Table)
                    .col(Orders::CustomerUserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_business")
                    .table(Orders::Table)
                    .col(Orders::BusinessUserId)
                    .to_owned(),
            )
            .await?;

        // Reviews: lookup by business, unique (reviewer, business) pair
        manager
            .create_index(
                Index::create()
                    .name("idx_review_business")
                    .table(Review::Table)
                    .col(Review::BusinessUserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uniq_review_reviewer_business")
                    .table(Review::Table)
                    .col(Review::ReviewerId)
                    .col(Review::BusinessUserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_offer_user").table(Offer::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_offer_detail_offer").table(OfferDetail::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_orders_customer").table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_orders_business").table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_review_business").table(Review::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_review_reviewer_business").table(Review::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Offer { Table, UserId }

#[derive(DeriveIden)]
enum OfferDetail { Table, OfferId }

#[derive(DeriveIden)]
enum Orders { Table, CustomerUserId, BusinessUserId }

#[derive(DeriveIden)]
enum Review { Table, BusinessUserId, ReviewerId }
