//! Guild roles as Discord returns them from `GET /guilds/{id}/roles`.

use serenity::all::{GuildId, Role};

/// A plain guild role: no color, permissions or hoisting.
///
/// # Panics
/// - If Serenity rejects the JSON shape (a test setup bug)
pub fn guild_role(guild_id: GuildId, role_id: u64, name: &str, position: u16) -> Role {
    serde_json::from_value(serde_json::json!({
        "id": role_id.to_string(),
        "guild_id": guild_id.to_string(),
        "name": name,
        "color": 0,
        "colors": {
            "primary_color": 0,
            "secondary_color": null,
            "tertiary_color": null,
        },
        "hoist": false,
        "icon": null,
        "unicode_emoji": null,
        "position": position,
        "permissions": "0",
        "managed": false,
        "mentionable": false,
    }))
    .unwrap_or_else(|e| panic!("invalid role fixture {}: {}", role_id, e))
}

/// Roles named `role-{id}`, positioned in the order given.
pub fn guild_roles(guild_id: GuildId, role_ids: &[u64]) -> Vec<Role> {
    role_ids
        .iter()
        .enumerate()
        .map(|(position, id)| guild_role(guild_id, *id, &format!("role-{}", id), position as u16))
        .collect()
}
