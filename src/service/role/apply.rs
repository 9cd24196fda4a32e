//! Pushing role deltas to Discord.

use dioxus_logger::tracing;
use serenity::{
    all::{GuildId, Role, RoleId, UserId},
    async_trait,
    http::Http,
};
use std::collections::HashMap;

use crate::{error::sync::SyncError, model::role::RoleDelta};

/// Audit log reason attached to every role change.
const AUDIT_REASON: &str = "Galtinn membership sync";

/// The Discord operations role synchronization needs.
#[async_trait]
pub trait RoleGateway: Send + Sync {
    /// Roles currently defined in the guild.
    async fn guild_roles(&self, guild_id: GuildId) -> serenity::Result<Vec<Role>>;

    /// Roles currently held by a guild member.
    async fn member_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> serenity::Result<Vec<RoleId>>;

    async fn add_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> serenity::Result<()>;

    async fn remove_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> serenity::Result<()>;
}

#[async_trait]
impl RoleGateway for Http {
    async fn guild_roles(&self, guild_id: GuildId) -> serenity::Result<Vec<Role>> {
        self.get_guild_roles(guild_id).await
    }

    async fn member_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> serenity::Result<Vec<RoleId>> {
        Ok(self.get_member(guild_id, user_id).await?.roles)
    }

    async fn add_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> serenity::Result<()> {
        self.add_member_role(guild_id, user_id, role_id, Some(AUDIT_REASON))
            .await
    }

    async fn remove_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> serenity::Result<()> {
        self.remove_member_role(guild_id, user_id, role_id, Some(AUDIT_REASON))
            .await
    }
}

/// Applies role deltas to members of one guild.
///
/// Holds the guild's live roles, resolved once, so deltas referencing roles
/// that no longer exist are filtered out instead of failing.
pub struct RoleApplier<'a, G: RoleGateway + ?Sized> {
    gateway: &'a G,
    guild_id: GuildId,
    live_roles: HashMap<RoleId, String>,
}

impl<'a, G: RoleGateway + ?Sized> RoleApplier<'a, G> {
    /// Fetches the guild's roles and builds an applier.
    ///
    /// # Returns
    /// - `Ok(RoleApplier)` - Applier with the live role set
    /// - `Err(SyncError::GuildUnresolvable)` - The guild could not be fetched
    pub async fn resolve(gateway: &'a G, guild_id: GuildId) -> Result<Self, SyncError> {
        let roles = gateway
            .guild_roles(guild_id)
            .await
            .map_err(|e| SyncError::GuildUnresolvable {
                guild_id,
                source: Box::new(e),
            })?;

        Ok(Self {
            gateway,
            guild_id,
            live_roles: roles.into_iter().map(|role| (role.id, role.name)).collect(),
        })
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    /// Roles the member currently holds.
    ///
    /// # Returns
    /// - `Ok(Vec<RoleId>)` - Held roles
    /// - `Err(SyncError::MemberUnresolvable)` - Not in the guild or fetch failed
    pub async fn member_roles(&self, user_id: UserId) -> Result<Vec<RoleId>, SyncError> {
        self.gateway
            .member_roles(self.guild_id, user_id)
            .await
            .map_err(|e| SyncError::MemberUnresolvable {
                user_id,
                source: Box::new(e),
            })
    }

    /// Adds then removes roles for a member.
    ///
    /// Ids not present in the guild are skipped with a debug log. The add
    /// phase and the remove phase are attempted independently; a failure in
    /// either is logged and makes the result `false`, but whatever already
    /// succeeded is kept.
    ///
    /// # Returns
    /// - `true` - Every resolvable role change succeeded
    /// - `false` - At least one change failed
    pub async fn apply(&self, user_id: UserId, delta: &RoleDelta) -> bool {
        let to_add = self.resolve_ids(delta.add.iter().copied());
        let to_remove = self.resolve_ids(delta.remove.iter().copied());

        let mut success = true;

        for role_id in to_add {
            if let Err(e) = self.gateway.add_role(self.guild_id, user_id, role_id).await {
                self.log_failure(user_id, role_id, "add", e);
                success = false;
            }
        }

        for role_id in to_remove {
            if let Err(e) = self
                .gateway
                .remove_role(self.guild_id, user_id, role_id)
                .await
            {
                self.log_failure(user_id, role_id, "remove", e);
                success = false;
            }
        }

        if success {
            tracing::debug!(
                "Applied roles for {}: +{} -{}",
                user_id,
                delta.add.len(),
                delta.remove.len()
            );
        }

        success
    }

    /// Live ids among `ids`, in ascending order.
    fn resolve_ids(&self, ids: impl Iterator<Item = RoleId>) -> Vec<RoleId> {
        let mut resolved: Vec<RoleId> = ids
            .filter(|id| {
                let live = self.live_roles.contains_key(id);
                if !live {
                    tracing::debug!("Skipping role {} missing from guild {}", id, self.guild_id);
                }
                live
            })
            .collect();
        resolved.sort();
        resolved
    }

    fn log_failure(
        &self,
        user_id: UserId,
        role_id: RoleId,
        action: &'static str,
        source: serenity::Error,
    ) {
        let role_name = self
            .live_roles
            .get(&role_id)
            .map(String::as_str)
            .unwrap_or("unknown");
        let err = SyncError::RoleApplyFailed {
            user_id,
            role_id,
            action,
            source: Box::new(source),
        };

        tracing::warn!("{} ({})", err, role_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::role::fake::FakeGateway;
    use std::collections::HashSet;

    fn ids(ids: &[u64]) -> HashSet<RoleId> {
        ids.iter().copied().map(RoleId::new).collect()
    }

    #[tokio::test]
    async fn applies_add_then_remove() {
        let gateway = FakeGateway::with_roles(&[1, 2, 3]);
        let applier = RoleApplier::resolve(&gateway, FakeGateway::GUILD).await.unwrap();

        let ok = applier
            .apply(
                UserId::new(10),
                &RoleDelta {
                    add: ids(&[1, 2]),
                    remove: ids(&[3]),
                },
            )
            .await;

        assert!(ok);
        assert_eq!(gateway.added(), vec![(10, 1), (10, 2)]);
        assert_eq!(gateway.removed(), vec![(10, 3)]);
    }

    #[tokio::test]
    async fn skips_roles_missing_from_guild() {
        let gateway = FakeGateway::with_roles(&[1]);
        let applier = RoleApplier::resolve(&gateway, FakeGateway::GUILD).await.unwrap();

        let ok = applier
            .apply(
                UserId::new(10),
                &RoleDelta {
                    add: ids(&[1, 404]),
                    remove: ids(&[405]),
                },
            )
            .await;

        assert!(ok);
        assert_eq!(gateway.added(), vec![(10, 1)]);
        assert!(gateway.removed().is_empty());
    }

    /// Tests that a failed add does not stop or undo the remove phase.
    ///
    /// Expected: false, with the removal still performed
    #[tokio::test]
    async fn reports_partial_failure_without_rollback() {
        let gateway = FakeGateway::with_roles(&[1, 2, 3]);
        gateway.fail_add(2);
        let applier = RoleApplier::resolve(&gateway, FakeGateway::GUILD).await.unwrap();

        let ok = applier
            .apply(
                UserId::new(10),
                &RoleDelta {
                    add: ids(&[1, 2]),
                    remove: ids(&[3]),
                },
            )
            .await;

        assert!(!ok);
        assert_eq!(gateway.added(), vec![(10, 1)]);
        assert_eq!(gateway.removed(), vec![(10, 3)]);
    }

    #[tokio::test]
    async fn unresolvable_guild_is_an_error() {
        let gateway = FakeGateway::with_roles(&[1]);
        gateway.fail_guild();

        let result = RoleApplier::resolve(&gateway, FakeGateway::GUILD).await;

        assert!(matches!(result, Err(SyncError::GuildUnresolvable { .. })));
    }

    #[tokio::test]
    async fn unknown_member_is_unresolvable() {
        let gateway = FakeGateway::with_roles(&[1]);
        let applier = RoleApplier::resolve(&gateway, FakeGateway::GUILD).await.unwrap();

        let result = applier.member_roles(UserId::new(77)).await;

        assert!(matches!(result, Err(SyncError::MemberUnresolvable { .. })));
    }
}
