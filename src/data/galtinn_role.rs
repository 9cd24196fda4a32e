//! Role mapping repository for the `galtinn_role` table.

use migration::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::model::role::RoleMapping;

pub struct GaltinnRoleRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GaltinnRoleRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Maps a Discord role to a Galtinn organization.
    ///
    /// A role maps to at most one organization; mapping it again replaces
    /// the previous organization.
    ///
    /// # Returns
    /// - `Ok(RoleMapping)` - The stored mapping
    /// - `Err(DbErr)` - Database error
    pub async fn upsert(
        &self,
        discord_role_id: u64,
        galtinn_org_id: &str,
    ) -> Result<RoleMapping, DbErr> {
        let entity = entity::prelude::GaltinnRole::insert(entity::galtinn_role::ActiveModel {
            discord_role_id: ActiveValue::Set(discord_role_id.to_string()),
            galtinn_org_id: ActiveValue::Set(galtinn_org_id.to_string()),
        })
        .on_conflict(
            OnConflict::column(entity::galtinn_role::Column::DiscordRoleId)
                .update_column(entity::galtinn_role::Column::GaltinnOrgId)
                .to_owned(),
        )
        .exec_with_returning(self.db)
        .await?;

        RoleMapping::from_entity(entity)
    }

    /// Removes the mapping for a Discord role.
    ///
    /// # Returns
    /// - `Ok(true)` - A mapping was removed
    /// - `Ok(false)` - The role was not mapped
    /// - `Err(DbErr)` - Database error
    pub async fn delete(&self, discord_role_id: u64) -> Result<bool, DbErr> {
        let result = entity::prelude::GaltinnRole::delete_many()
            .filter(entity::galtinn_role::Column::DiscordRoleId.eq(discord_role_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// All mappings, ordered by organization id.
    pub async fn get_all(&self) -> Result<Vec<RoleMapping>, DbErr> {
        entity::prelude::GaltinnRole::find()
            .order_by_asc(entity::galtinn_role::Column::GaltinnOrgId)
            .order_by_asc(entity::galtinn_role::Column::DiscordRoleId)
            .all(self.db)
            .await?
            .into_iter()
            .map(RoleMapping::from_entity)
            .collect()
    }
}
