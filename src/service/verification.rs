//! Starting and expiring account link attempts.

use chrono::{Duration, Utc};
use dioxus_logger::tracing;
use oauth2::{CsrfToken, PkceCodeChallenge, Scope};
use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use std::{collections::HashMap, sync::Arc};
use tokio::{sync::RwLock, task::AbortHandle};
use url::Url;

use crate::{
    data::verification::VerificationRepository,
    error::{verification::VerificationError, AppError},
    model::{galtinn::ProfileFilter, verification::CreateVerificationParam},
    service::galtinn::GaltinnClient,
    state::OAuth2Client,
};

/// How long a verification link stays valid.
pub const CHALLENGE_TTL_MINUTES: i64 = 2;

/// Bytes of entropy in the `state` parameter.
const STATE_BYTES: u32 = 32;

/// Delayed deletion scheduled for one challenge.
struct PendingExpiry {
    state: String,
    handle: AbortHandle,
}

/// Issues verification links and expires them.
///
/// Cloning shares the table of delayed deletion tasks, so `cancel` and
/// `shutdown` reach tasks started through any clone.
#[derive(Clone)]
pub struct VerificationService {
    db: DatabaseConnection,
    galtinn: GaltinnClient,
    oauth_client: OAuth2Client,
    ttl: Duration,
    pending: Arc<RwLock<HashMap<u64, PendingExpiry>>>,
}

impl VerificationService {
    pub fn new(db: DatabaseConnection, galtinn: GaltinnClient, oauth_client: OAuth2Client) -> Self {
        Self {
            db,
            galtinn,
            oauth_client,
            ttl: Duration::minutes(CHALLENGE_TTL_MINUTES),
            pending: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Overrides the challenge lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Starts linking a Discord user to Galtinn.
    ///
    /// Stores a fresh PKCE verifier and state for the user and returns the
    /// Galtinn authorization URL carrying the S256 challenge. The row is
    /// deleted again after the TTL unless the callback consumes it first.
    ///
    /// # Arguments
    /// - `discord_id` - Discord user starting the flow
    ///
    /// # Returns
    /// - `Ok(Url)` - Authorization URL to hand to the user
    /// - `Err(VerificationError::AlreadyLinked)` - User already has a Galtinn discord profile
    /// - `Err(VerificationError::VerificationInProgress)` - A live challenge exists
    /// - `Err(AppError)` - Galtinn or database failure
    pub async fn begin(&self, discord_id: u64) -> Result<Url, AppError> {
        let profiles = self
            .galtinn
            .fetch_discord_profiles(&ProfileFilter::by_discord_id(discord_id))
            .await?;
        if !profiles.is_empty() {
            return Err(VerificationError::AlreadyLinked.into());
        }

        let repo = VerificationRepository::new(&self.db);
        let now = Utc::now();

        if let Some(existing) = repo.find_by_discord_id(discord_id).await? {
            if !existing.is_expired(now) {
                return Err(VerificationError::VerificationInProgress.into());
            }

            repo.delete(discord_id, &existing.state).await?;
        }

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let (authorize_url, csrf_state) = self
            .oauth_client
            .authorize_url(|| CsrfToken::new_random_len(STATE_BYTES))
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        let challenge = repo
            .create(CreateVerificationParam {
                discord_id,
                challenge: pkce_verifier.secret().to_string(),
                state: csrf_state.secret().to_string(),
                created_at: now,
                expires_at: now + self.ttl,
            })
            .await
            .map_err(map_insert_error)?;

        self.schedule_expiry(discord_id, challenge.state).await;

        tracing::info!("Started Galtinn verification for {}", discord_id);

        Ok(authorize_url)
    }

    /// Deletes the user's challenge and stops its delayed deletion.
    ///
    /// Safe to call when nothing is pending.
    pub async fn cancel(&self, discord_id: u64) -> Result<(), AppError> {
        if let Some(expiry) = self.pending.write().await.remove(&discord_id) {
            expiry.handle.abort();
        }

        VerificationRepository::new(&self.db)
            .delete_by_discord_id(discord_id)
            .await?;

        Ok(())
    }

    /// Aborts every outstanding delayed deletion.
    pub async fn shutdown(&self) {
        let mut pending = self.pending.write().await;
        for (_, expiry) in pending.drain() {
            expiry.handle.abort();
        }
    }

    /// Deletes all challenges past their expiry.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of rows removed
    /// - `Err(DbErr)` - Database error
    pub async fn sweep_expired(&self) -> Result<u64, DbErr> {
        let removed = VerificationRepository::new(&self.db)
            .delete_expired(Utc::now())
            .await?;

        if removed > 0 {
            tracing::debug!("Swept {} expired verification challenges", removed);
        }

        Ok(removed)
    }

    /// Spawns the task deleting this exact challenge once the TTL passes.
    ///
    /// The map lock is held across spawn and insert so the task cannot look
    /// up its own entry before it exists.
    async fn schedule_expiry(&self, discord_id: u64, state: String) {
        let delay = self.ttl.to_std().unwrap_or_default();
        let db = self.db.clone();
        let pending = Arc::clone(&self.pending);
        let task_state = state.clone();

        let mut guard = self.pending.write().await;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            match VerificationRepository::new(&db)
                .delete(discord_id, &task_state)
                .await
            {
                Ok(0) => {}
                Ok(_) => tracing::debug!("Verification for {} expired", discord_id),
                Err(e) => tracing::error!(
                    "Failed to delete expired verification for {}: {}",
                    discord_id,
                    e
                ),
            }

            let mut pending = pending.write().await;
            if pending
                .get(&discord_id)
                .is_some_and(|expiry| expiry.state == task_state)
            {
                pending.remove(&discord_id);
            }
        })
        .abort_handle();

        if let Some(previous) = guard.insert(discord_id, PendingExpiry { state, handle }) {
            previous.handle.abort();
        }
    }
}

/// A lost insert race surfaces as a unique violation on `discord_id`.
fn map_insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            VerificationError::VerificationInProgress.into()
        }
        _ => err.into(),
    }
}
