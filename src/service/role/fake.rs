//! In-memory [`RoleGateway`] recording every call.

use serenity::{
    all::{GuildId, Role, RoleId, UserId},
    async_trait,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use test_utils::serenity::guild_roles;

use crate::service::role::apply::RoleGateway;

#[derive(Default)]
struct Calls {
    added: Vec<(u64, u64)>,
    removed: Vec<(u64, u64)>,
}

pub struct FakeGateway {
    roles: Vec<Role>,
    members: Mutex<HashMap<u64, Vec<RoleId>>>,
    failing_adds: Mutex<HashSet<u64>>,
    guild_fails: Mutex<bool>,
    calls: Mutex<Calls>,
}

impl FakeGateway {
    pub const GUILD: GuildId = GuildId::new(4242);

    /// Guild defining the given role ids and no members.
    pub fn with_roles(role_ids: &[u64]) -> Self {
        Self {
            roles: guild_roles(Self::GUILD, role_ids),
            members: Mutex::new(HashMap::new()),
            failing_adds: Mutex::new(HashSet::new()),
            guild_fails: Mutex::new(false),
            calls: Mutex::new(Calls::default()),
        }
    }

    /// Adds a guild member holding `role_ids`.
    pub fn add_member(&self, user_id: u64, role_ids: &[u64]) {
        self.members.lock().unwrap().insert(
            user_id,
            role_ids.iter().copied().map(RoleId::new).collect(),
        );
    }

    pub fn fail_add(&self, role_id: u64) {
        self.failing_adds.lock().unwrap().insert(role_id);
    }

    pub fn fail_guild(&self) {
        *self.guild_fails.lock().unwrap() = true;
    }

    /// `(user, role)` pairs added, in call order.
    pub fn added(&self) -> Vec<(u64, u64)> {
        self.calls.lock().unwrap().added.clone()
    }

    /// `(user, role)` pairs removed, in call order.
    pub fn removed(&self) -> Vec<(u64, u64)> {
        self.calls.lock().unwrap().removed.clone()
    }

    /// Current roles of a member, sorted.
    pub fn member_role_ids(&self, user_id: u64) -> Vec<u64> {
        let mut roles: Vec<u64> = self
            .members
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|roles| roles.iter().map(|r| r.get()).collect())
            .unwrap_or_default();
        roles.sort();
        roles
    }
}

#[async_trait]
impl RoleGateway for FakeGateway {
    async fn guild_roles(&self, _guild_id: GuildId) -> serenity::Result<Vec<Role>> {
        if *self.guild_fails.lock().unwrap() {
            return Err(serenity::Error::Other("Unknown Guild"));
        }
        Ok(self.roles.clone())
    }

    async fn member_roles(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
    ) -> serenity::Result<Vec<RoleId>> {
        self.members
            .lock()
            .unwrap()
            .get(&user_id.get())
            .cloned()
            .ok_or(serenity::Error::Other("Unknown Member"))
    }

    async fn add_role(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> serenity::Result<()> {
        if self.failing_adds.lock().unwrap().contains(&role_id.get()) {
            return Err(serenity::Error::Other("Missing Permissions"));
        }

        if let Some(roles) = self.members.lock().unwrap().get_mut(&user_id.get()) {
            if !roles.contains(&role_id) {
                roles.push(role_id);
            }
        }
        self.calls
            .lock()
            .unwrap()
            .added
            .push((user_id.get(), role_id.get()));
        Ok(())
    }

    async fn remove_role(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> serenity::Result<()> {
        if let Some(roles) = self.members.lock().unwrap().get_mut(&user_id.get()) {
            roles.retain(|r| *r != role_id);
        }
        self.calls
            .lock()
            .unwrap()
            .removed
            .push((user_id.get(), role_id.get()));
        Ok(())
    }
}
