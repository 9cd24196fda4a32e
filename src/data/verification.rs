//! Verification challenge repository.
//!
//! Provides `VerificationRepository` for the `galtinn_verification` table,
//! holding at most one pending challenge per Discord user. The primary key on
//! `discord_id` and the unique `state` column are what make concurrent
//! `/galtinn registrer` invocations safe.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

use crate::model::verification::{CreateVerificationParam, VerificationChallenge};

/// Repository providing database operations for pending challenges.
pub struct VerificationRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VerificationRepository<'a> {
    /// Creates a new VerificationRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `VerificationRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new challenge.
    ///
    /// Fails with a unique-constraint violation when the Discord user already
    /// has a row or the state collides; callers map that to an in-progress
    /// error rather than overwriting.
    ///
    /// # Arguments
    /// - `param` - Challenge to persist
    ///
    /// # Returns
    /// - `Ok(VerificationChallenge)` - The stored challenge
    /// - `Err(DbErr)` - Constraint violation or database error
    pub async fn create(
        &self,
        param: CreateVerificationParam,
    ) -> Result<VerificationChallenge, DbErr> {
        let entity = entity::galtinn_verification::ActiveModel {
            discord_id: ActiveValue::Set(param.discord_id.to_string()),
            challenge: ActiveValue::Set(param.challenge),
            state: ActiveValue::Set(param.state),
            created_at: ActiveValue::Set(param.created_at),
            expires_at: ActiveValue::Set(param.expires_at),
        }
        .insert(self.db)
        .await?;

        VerificationChallenge::from_entity(entity)
    }

    /// Finds the challenge for a Discord user, expired or not.
    pub async fn find_by_discord_id(
        &self,
        discord_id: u64,
    ) -> Result<Option<VerificationChallenge>, DbErr> {
        entity::prelude::GaltinnVerification::find_by_id(discord_id.to_string())
            .one(self.db)
            .await?
            .map(VerificationChallenge::from_entity)
            .transpose()
    }

    /// Finds the challenge issued with the given opaque state, expired or not.
    pub async fn find_by_state(&self, state: &str) -> Result<Option<VerificationChallenge>, DbErr> {
        entity::prelude::GaltinnVerification::find()
            .filter(entity::galtinn_verification::Column::State.eq(state))
            .one(self.db)
            .await?
            .map(VerificationChallenge::from_entity)
            .transpose()
    }

    /// Deletes the challenge for a Discord user only if it still carries `state`.
    ///
    /// Used by the delayed expiry task so it never removes a newer challenge
    /// issued to the same user.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of rows deleted (0 or 1)
    /// - `Err(DbErr)` - Database error
    pub async fn delete(&self, discord_id: u64, state: &str) -> Result<u64, DbErr> {
        let result = entity::prelude::GaltinnVerification::delete_many()
            .filter(entity::galtinn_verification::Column::DiscordId.eq(discord_id.to_string()))
            .filter(entity::galtinn_verification::Column::State.eq(state))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Deletes whatever challenge the Discord user has.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of rows deleted (0 or 1)
    /// - `Err(DbErr)` - Database error
    pub async fn delete_by_discord_id(&self, discord_id: u64) -> Result<u64, DbErr> {
        let result = entity::prelude::GaltinnVerification::delete_many()
            .filter(entity::galtinn_verification::Column::DiscordId.eq(discord_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Deletes every challenge whose expiry is at or before `now`.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of rows deleted
    /// - `Err(DbErr)` - Database error
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = entity::prelude::GaltinnVerification::delete_many()
            .filter(entity::galtinn_verification::Column::ExpiresAt.lte(now))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
