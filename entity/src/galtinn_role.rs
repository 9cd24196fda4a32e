//! Operator-maintained mapping from a Discord role to a Galtinn organization.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "galtinn_role")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub discord_role_id: String,
    pub galtinn_org_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
