//! Cross-process "auth completed" notifications.
//!
//! The callback server publishes an [`AuthCompleted`] event after a successful
//! OAuth exchange and the bot subscribes to it to apply roles straight away.
//! Production uses PostgreSQL `NOTIFY`/`LISTEN` on [`AUTH_COMPLETE_CHANNEL`];
//! tests use the in-memory bus. Payloads are plain text, `"{discord_id} {external_id}"`.

pub mod memory;
pub mod postgres;

use serenity::async_trait;
use std::{fmt, str::FromStr};

use crate::error::{event::EventError, AppError};

/// Channel name shared by publisher and subscriber.
pub const AUTH_COMPLETE_CHANNEL: &str = "galtinn_auth_complete";

/// A Discord user finished linking to the Galtinn user `external_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCompleted {
    pub discord_id: u64,
    pub external_id: u64,
}

impl AuthCompleted {
    pub fn to_payload(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AuthCompleted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.discord_id, self.external_id)
    }
}

impl FromStr for AuthCompleted {
    type Err = EventError;

    /// Parses exactly two space-separated unsigned integers.
    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| EventError::MalformedPayload {
            payload: payload.to_string(),
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = payload.split(' ').collect();
        let [discord_id, external_id] = fields.as_slice() else {
            return Err(malformed("expected exactly two fields"));
        };

        let discord_id =
            parse_id(discord_id).map_err(|e| malformed(&format!("discord id: {}", e)))?;
        let external_id =
            parse_id(external_id).map_err(|e| malformed(&format!("external id: {}", e)))?;

        Ok(Self {
            discord_id,
            external_id,
        })
    }
}

/// Parses a field made of ASCII digits only; `u64::from_str` alone also takes a leading `+`.
fn parse_id(field: &str) -> Result<u64, String> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("{:?} is not an unsigned integer", field));
    }

    field.parse::<u64>().map_err(|e| e.to_string())
}

/// Sends auth events to whoever is listening.
#[async_trait]
pub trait AuthEventPublisher: Send + Sync {
    async fn publish(&self, event: &AuthCompleted) -> Result<(), AppError>;
}

/// Receives raw auth event payloads.
///
/// Payloads are returned unparsed so a malformed one can be logged and
/// skipped without ending the subscription.
#[async_trait]
pub trait AuthEventSubscriber: Send {
    /// Waits for the next payload.
    ///
    /// # Returns
    /// - `Ok(Some(payload))` - A payload arrived
    /// - `Ok(None)` - The channel is closed for good
    /// - `Err(AppError)` - Transient receive failure; calling again may recover
    async fn recv(&mut self) -> Result<Option<String>, AppError>;
}
