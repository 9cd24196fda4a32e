//! Documents returned by the Galtinn directory and OAuth endpoints.

use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Discord role attached to a group profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDiscordRole {
    pub id: u64,
    pub discord_id: u64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Role-related data of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupProfile {
    pub id: u64,
    #[serde(default)]
    pub posix_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub discord_roles: Vec<GroupDiscordRole>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub profile: Option<GroupProfile>,
}

/// Link between a Galtinn user and a Discord account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordProfile {
    pub id: u64,
    pub discord_id: u64,
    pub user: u64,
}

/// A Galtinn user as seen by the membership check.
///
/// The default value is a user with no flags and no groups, which
/// reconciles to removing every known role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_member: bool,
    #[serde(default)]
    pub is_volunteer: bool,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub discord_profile: Option<DiscordProfile>,
}

impl MembershipRecord {
    /// Discord account linked to this user, if any.
    pub fn discord_id(&self) -> Option<u64> {
        self.discord_profile
            .as_ref()
            .map(|profile| profile.discord_id)
            .filter(|id| *id != 0)
    }
}

/// OpenID Connect userinfo response.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    /// Galtinn user id as a decimal string.
    pub sub: String,
    pub preferred_username: String,
}

/// Query filters for `/users/`.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub id: Option<u64>,
    pub discord_id: Option<u64>,
}

impl UserFilter {
    pub fn by_id(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn by_discord_id(discord_id: u64) -> Self {
        Self {
            discord_id: Some(discord_id),
            ..Default::default()
        }
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.id {
            pairs.push(("id", id.to_string()));
        }
        if let Some(discord_id) = self.discord_id {
            pairs.push(("discord_profile__discord_id", discord_id.to_string()));
        }
        pairs
    }
}

/// Query filters for `/discordprofiles/`.
#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    pub discord_id: Option<u64>,
    pub user_id: Option<u64>,
}

impl ProfileFilter {
    pub fn by_discord_id(discord_id: u64) -> Self {
        Self {
            discord_id: Some(discord_id),
            ..Default::default()
        }
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(discord_id) = self.discord_id {
            pairs.push(("discord_id", discord_id.to_string()));
        }
        if let Some(user_id) = self.user_id {
            pairs.push(("user", user_id.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::fixture;

    #[test]
    fn decodes_user_fixture() {
        let value = fixture::galtinn::user(7)
            .discord_id(123456789)
            .member(true)
            .group(fixture::galtinn::group(3, "kameraklubben", &[1001, 1002]))
            .group(fixture::galtinn::group_without_profile(4, "styret"))
            .build();

        let record: MembershipRecord = serde_json::from_value(value).unwrap();

        assert_eq!(record.id, 7);
        assert!(record.is_member);
        assert!(!record.is_volunteer);
        assert_eq!(record.discord_id(), Some(123456789));
        assert_eq!(record.groups.len(), 2);
        let roles: Vec<u64> = record.groups[0]
            .profile
            .as_ref()
            .unwrap()
            .discord_roles
            .iter()
            .map(|role| role.discord_id)
            .collect();
        assert_eq!(roles, vec![1001, 1002]);
        assert!(record.groups[1].profile.is_none());
    }

    #[test]
    fn unlinked_record_has_no_discord_id() {
        let record: MembershipRecord =
            serde_json::from_value(fixture::galtinn::user(8).build()).unwrap();

        assert_eq!(record.discord_id(), None);
    }

    #[test]
    fn filters_only_emit_set_fields() {
        assert!(UserFilter::default().query_pairs().is_empty());
        assert_eq!(
            UserFilter::by_discord_id(42).query_pairs(),
            vec![("discord_profile__discord_id", "42".to_string())]
        );
        assert_eq!(
            ProfileFilter::by_discord_id(42).query_pairs(),
            vec![("discord_id", "42".to_string())]
        );
    }
}
