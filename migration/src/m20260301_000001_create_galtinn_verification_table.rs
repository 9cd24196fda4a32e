use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GaltinnVerification::Table)
                    .if_not_exists()
                    .col(string(GaltinnVerification::DiscordId).primary_key())
                    .col(string(GaltinnVerification::Challenge))
                    .col(string_uniq(GaltinnVerification::State))
                    .col(
                        timestamp_with_time_zone(GaltinnVerification::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone(GaltinnVerification::ExpiresAt))
                    .to_owned(),
            )
            .await?;

        // The sweeper scans by expiry.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_galtinn_verification_expires_at")
                    .table(GaltinnVerification::Table)
                    .col(GaltinnVerification::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GaltinnVerification::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum GaltinnVerification {
    Table,
    DiscordId,
    Challenge,
    State,
    CreatedAt,
    ExpiresAt,
}
