use serenity::all::RoleId;
use std::collections::HashSet;

use crate::{
    error::galtinn::GaltinnError, model::galtinn::Group, service::galtinn::GaltinnClient,
};

impl GaltinnClient {
    /// Fetches every group with its role profile.
    pub async fn fetch_groups(&self) -> Result<Vec<Group>, GaltinnError> {
        self.fetch_all("groups/", &[]).await
    }

    /// Every Discord role attached to any group profile.
    ///
    /// Groups without a profile contribute nothing.
    pub async fn fetch_all_roles(&self) -> Result<HashSet<RoleId>, GaltinnError> {
        let groups = self.fetch_groups().await?;

        Ok(groups
            .iter()
            .filter_map(|group| group.profile.as_ref())
            .flat_map(|profile| profile.discord_roles.iter())
            .filter(|role| role.discord_id != 0)
            .map(|role| RoleId::new(role.discord_id))
            .collect())
    }
}
