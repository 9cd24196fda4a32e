//! JSON fixtures for Galtinn directory resources.

use serde_json::{json, Value};

/// Builder for a user record as returned by `/users/`.
///
/// # Example
/// ```rust,ignore
/// let record = fixture::galtinn::user(7)
///     .discord_id(123456789)
///     .member(true)
///     .group(fixture::galtinn::group(3, "kameraklubben", &[1001]))
///     .build();
/// ```
pub struct UserBuilder {
    id: u64,
    username: String,
    is_member: bool,
    is_volunteer: bool,
    groups: Vec<Value>,
    discord_id: Option<u64>,
}

/// Starts a user record with the given Galtinn id and no Discord link.
pub fn user(id: u64) -> UserBuilder {
    UserBuilder {
        id,
        username: format!("user{}", id),
        is_member: false,
        is_volunteer: false,
        groups: Vec::new(),
        discord_id: None,
    }
}

impl UserBuilder {
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn member(mut self, is_member: bool) -> Self {
        self.is_member = is_member;
        self
    }

    pub fn volunteer(mut self, is_volunteer: bool) -> Self {
        self.is_volunteer = is_volunteer;
        self
    }

    pub fn group(mut self, group: Value) -> Self {
        self.groups.push(group);
        self
    }

    /// Links the record to a Discord account.
    pub fn discord_id(mut self, discord_id: u64) -> Self {
        self.discord_id = Some(discord_id);
        self
    }

    pub fn build(self) -> Value {
        let discord_profile = self
            .discord_id
            .map(|discord_id| discord_profile(self.id + 10_000, discord_id, self.id));

        json!({
            "id": self.id,
            "username": self.username,
            "email": format!("{}@example.org", self.username),
            "first_name": "Test",
            "last_name": format!("User {}", self.id),
            "phone_number": null,
            "is_volunteer": self.is_volunteer,
            "is_member": self.is_member,
            "last_membership": null,
            "groups": self.groups,
            "discord_profile": discord_profile,
        })
    }
}

/// Group with a role profile carrying the given Discord role ids.
pub fn group(id: u64, name: &str, discord_role_ids: &[u64]) -> Value {
    let discord_roles: Vec<Value> = discord_role_ids
        .iter()
        .enumerate()
        .map(|(index, role_id)| {
            json!({
                "id": id * 100 + index as u64,
                "discord_id": role_id,
                "description": format!("{} role", name),
            })
        })
        .collect();

    json!({
        "id": id,
        "name": name,
        "profile": {
            "id": id,
            "posix_name": name,
            "description": null,
            "type": "standard",
            "discord_roles": discord_roles,
        },
    })
}

/// Group without a role profile.
pub fn group_without_profile(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "profile": null,
    })
}

/// Discord profile linking a Galtinn user to a Discord account.
pub fn discord_profile(id: u64, discord_id: u64, user_id: u64) -> Value {
    json!({
        "id": id,
        "discord_id": discord_id,
        "user": user_id,
    })
}

/// OpenID Connect userinfo document.
pub fn userinfo(sub: u64, preferred_username: &str) -> Value {
    json!({
        "sub": sub.to_string(),
        "preferred_username": preferred_username,
        "email": format!("{}@example.org", preferred_username),
    })
}
