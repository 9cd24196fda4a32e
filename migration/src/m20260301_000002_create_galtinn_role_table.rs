use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GaltinnRole::Table)
                    .if_not_exists()
                    .col(string(GaltinnRole::DiscordRoleId).primary_key())
                    .col(string(GaltinnRole::GaltinnOrgId))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GaltinnRole::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum GaltinnRole {
    Table,
    DiscordRoleId,
    GaltinnOrgId,
}
