use serenity::all::RoleId;
use std::collections::{HashMap, HashSet};

use crate::{
    config::RoleConfig,
    model::{
        galtinn::MembershipRecord,
        role::{RoleDelta, RoleMapping},
    },
};

/// Inputs to reconciliation besides the record itself.
#[derive(Debug, Clone)]
pub struct ReconcileContext {
    pub member_role: RoleId,
    pub volunteer_role: RoleId,
    /// Operator mappings keyed by Galtinn organization (group) id.
    pub org_roles: HashMap<String, Vec<RoleId>>,
}

impl ReconcileContext {
    pub fn new(roles: &RoleConfig, mappings: &[RoleMapping]) -> Self {
        let mut org_roles: HashMap<String, Vec<RoleId>> = HashMap::new();
        for mapping in mappings {
            org_roles
                .entry(mapping.galtinn_org_id.clone())
                .or_default()
                .push(mapping.discord_role_id);
        }

        Self {
            member_role: roles.member_role,
            volunteer_role: roles.volunteer_role,
            org_roles,
        }
    }

    /// Roles this context can grant regardless of any record.
    pub fn managed_roles(&self) -> impl Iterator<Item = RoleId> + '_ {
        [self.member_role, self.volunteer_role]
            .into_iter()
            .chain(self.org_roles.values().flatten().copied())
    }
}

/// Computes the roles a member should gain and lose.
///
/// The member role follows `is_member`, the volunteer role follows
/// `is_volunteer`, and each group contributes its profile's Discord roles plus
/// any roles mapped to its id. Every other role in `known_roles` is removed.
/// Groups without a profile contribute only mapped roles.
///
/// # Arguments
/// - `record` - The member's Galtinn record
/// - `known_roles` - Every role the bot manages
/// - `ctx` - Configured and mapped roles
///
/// # Returns
/// - `RoleDelta` - Disjoint add and remove sets
pub fn reconcile(
    record: &MembershipRecord,
    known_roles: &HashSet<RoleId>,
    ctx: &ReconcileContext,
) -> RoleDelta {
    let mut add = HashSet::new();

    if record.is_member {
        add.insert(ctx.member_role);
    }
    if record.is_volunteer {
        add.insert(ctx.volunteer_role);
    }

    for group in &record.groups {
        if let Some(mapped) = ctx.org_roles.get(&group.id.to_string()) {
            add.extend(mapped.iter().copied());
        }

        let Some(profile) = &group.profile else {
            continue;
        };

        add.extend(
            profile
                .discord_roles
                .iter()
                .filter(|role| role.discord_id != 0)
                .map(|role| RoleId::new(role.discord_id)),
        );
    }

    let remove = known_roles.difference(&add).copied().collect();

    RoleDelta { add, remove }
}
