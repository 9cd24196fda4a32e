use chrono::{DateTime, Utc};
use sea_orm::DbErr;

/// Pending link attempt for a Discord user.
///
/// `challenge` is the PKCE code verifier; only its S256 digest is sent to
/// Galtinn in the authorization URL.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationChallenge {
    pub discord_id: u64,
    pub challenge: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerificationChallenge {
    /// Converts an entity model to a verification challenge.
    ///
    /// # Returns
    /// - `Ok(VerificationChallenge)` - Converted challenge
    /// - `Err(DbErr::Custom)` - Stored Discord id is not a valid u64
    pub fn from_entity(entity: entity::galtinn_verification::Model) -> Result<Self, DbErr> {
        let discord_id = entity.discord_id.parse::<u64>().map_err(|e| {
            DbErr::Custom(format!(
                "Failed to parse discord_id '{}': {}",
                entity.discord_id, e
            ))
        })?;

        Ok(Self {
            discord_id,
            challenge: entity.challenge,
            state: entity.state,
            created_at: entity.created_at,
            expires_at: entity.expires_at,
        })
    }

    /// A challenge is usable strictly before its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Parameters for persisting a new challenge.
#[derive(Debug, Clone)]
pub struct CreateVerificationParam {
    pub discord_id: u64,
    pub challenge: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
