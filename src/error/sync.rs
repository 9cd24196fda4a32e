use serenity::all::{GuildId, RoleId, UserId};
use thiserror::Error;

/// Failures while applying roles to Discord members.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The configured guild could not be fetched; the run is aborted.
    #[error("Guild {guild_id} could not be resolved: {source}")]
    GuildUnresolvable {
        guild_id: GuildId,
        #[source]
        source: Box<serenity::Error>,
    },

    /// The member is not in the guild or could not be fetched; the member is skipped.
    #[error("Member {user_id} could not be resolved: {source}")]
    MemberUnresolvable {
        user_id: UserId,
        #[source]
        source: Box<serenity::Error>,
    },

    /// Adding or removing a single role failed.
    #[error("Failed to {action} role {role_id} for member {user_id}: {source}")]
    RoleApplyFailed {
        user_id: UserId,
        role_id: RoleId,
        action: &'static str,
        #[source]
        source: Box<serenity::Error>,
    },
}
