use sea_orm::DbErr;
use serenity::all::RoleId;
use std::collections::HashSet;

/// Operator-defined mapping from a Discord role to a Galtinn group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMapping {
    pub discord_role_id: RoleId,
    pub galtinn_org_id: String,
}

impl RoleMapping {
    /// Converts an entity model to a role mapping.
    ///
    /// # Returns
    /// - `Ok(RoleMapping)` - Converted mapping
    /// - `Err(DbErr::Custom)` - Stored role id is not a non-zero u64
    pub fn from_entity(entity: entity::galtinn_role::Model) -> Result<Self, DbErr> {
        let role_id = entity
            .discord_role_id
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| {
                DbErr::Custom(format!(
                    "Failed to parse discord_role_id '{}'",
                    entity.discord_role_id
                ))
            })?;

        Ok(Self {
            discord_role_id: RoleId::new(role_id),
            galtinn_org_id: entity.galtinn_org_id,
        })
    }
}

/// Roles to grant and revoke for one member.
///
/// `add` and `remove` are always disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleDelta {
    pub add: HashSet<RoleId>,
    pub remove: HashSet<RoleId>,
}

impl RoleDelta {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    /// Narrows the delta to the changes a member with `current` roles needs.
    ///
    /// Roles already held are not re-added and roles not held are not removed.
    pub fn against(&self, current: &[RoleId]) -> RoleDelta {
        let current: HashSet<RoleId> = current.iter().copied().collect();

        RoleDelta {
            add: self.add.difference(&current).copied().collect(),
            remove: self.remove.intersection(&current).copied().collect(),
        }
    }
}
