//! Role mapping factory.

use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Inserts a mapping from a Discord role to a Galtinn organization id.
///
/// # Arguments
/// - `db` - Database connection
/// - `discord_role_id` - Discord role id as string
/// - `galtinn_org_id` - Galtinn group id as string
///
/// # Returns
/// - `Ok(entity::galtinn_role::Model)` - Inserted row
/// - `Err(DbErr)` - Insert failed, e.g. the role is already mapped
pub async fn create_role_mapping(
    db: &DatabaseConnection,
    discord_role_id: impl Into<String>,
    galtinn_org_id: impl Into<String>,
) -> Result<entity::galtinn_role::Model, DbErr> {
    entity::galtinn_role::ActiveModel {
        discord_role_id: ActiveValue::Set(discord_role_id.into()),
        galtinn_org_id: ActiveValue::Set(galtinn_org_id.into()),
    }
    .insert(db)
    .await
}
