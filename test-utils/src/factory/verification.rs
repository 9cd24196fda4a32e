//! Verification challenge factory.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for pending verification rows.
///
/// Defaults produce a live challenge expiring two minutes from now with a
/// unique Discord id and state.
///
/// # Example
///
/// ```rust,ignore
/// let row = VerificationFactory::new(&db)
///     .discord_id("123456789")
///     .state("known-state")
///     .build()
///     .await?;
/// ```
pub struct VerificationFactory<'a> {
    db: &'a DatabaseConnection,
    discord_id: String,
    challenge: String,
    state: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl<'a> VerificationFactory<'a> {
    /// Creates a factory with default values.
    ///
    /// Defaults:
    /// - discord_id: auto-incremented counter
    /// - challenge: `"challenge-{id}"`
    /// - state: `"state-{id}"`
    /// - expires_at: now + 2 minutes
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        let now = Utc::now();
        Self {
            db,
            discord_id: id.to_string(),
            challenge: format!("challenge-{}", id),
            state: format!("state-{}", id),
            created_at: now,
            expires_at: now + Duration::minutes(2),
        }
    }

    pub fn discord_id(mut self, discord_id: impl Into<String>) -> Self {
        self.discord_id = discord_id.into();
        self
    }

    pub fn challenge(mut self, challenge: impl Into<String>) -> Self {
        self.challenge = challenge.into();
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Sets the expiry instant. Values in the past produce an expired row.
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Inserts the row.
    ///
    /// # Returns
    /// - `Ok(entity::galtinn_verification::Model)` - Inserted row
    /// - `Err(DbErr)` - Insert failed, e.g. duplicate Discord id or state
    pub async fn build(self) -> Result<entity::galtinn_verification::Model, DbErr> {
        entity::galtinn_verification::ActiveModel {
            discord_id: ActiveValue::Set(self.discord_id),
            challenge: ActiveValue::Set(self.challenge),
            state: ActiveValue::Set(self.state),
            created_at: ActiveValue::Set(self.created_at),
            expires_at: ActiveValue::Set(self.expires_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a live verification row with default values.
pub async fn create_verification(
    db: &DatabaseConnection,
) -> Result<entity::galtinn_verification::Model, DbErr> {
    VerificationFactory::new(db).build().await
}

/// Creates a verification row whose expiry passed a minute ago.
pub async fn create_expired_verification(
    db: &DatabaseConnection,
) -> Result<entity::galtinn_verification::Model, DbErr> {
    VerificationFactory::new(db)
        .expires_at(Utc::now() - Duration::minutes(1))
        .build()
        .await
}
