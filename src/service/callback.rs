//! Completing an account link from the OAuth redirect.

use chrono::Utc;
use dioxus_logger::tracing;
use oauth2::{
    basic::BasicTokenType, AuthorizationCode, EmptyExtraTokenFields, PkceCodeVerifier,
    StandardTokenResponse, TokenResponse,
};
use sea_orm::DatabaseConnection;

use crate::{
    data::verification::VerificationRepository,
    error::{verification::VerificationError, AppError},
    event::{AuthCompleted, AuthEventPublisher},
    model::galtinn::UserInfo,
    state::OAuth2Client,
};

pub struct CallbackService<'a> {
    db: &'a DatabaseConnection,
    http_client: &'a reqwest::Client,
    oauth_client: &'a OAuth2Client,
    api_url: &'a str,
    publisher: &'a dyn AuthEventPublisher,
}

impl<'a> CallbackService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        http_client: &'a reqwest::Client,
        oauth_client: &'a OAuth2Client,
        api_url: &'a str,
        publisher: &'a dyn AuthEventPublisher,
    ) -> Self {
        Self {
            db,
            http_client,
            oauth_client,
            api_url: api_url.trim_end_matches('/'),
            publisher,
        }
    }

    /// Completes the link identified by `state`.
    ///
    /// Exchanges `code` together with the stored PKCE verifier, reads the
    /// Galtinn user from userinfo, announces the link to the bot and deletes
    /// the challenge. Failures before the announcement leave the database
    /// untouched, so a failed exchange can be retried until the link expires.
    ///
    /// # Arguments
    /// - `code` - Authorization code from the redirect
    /// - `state` - Opaque state from the redirect
    ///
    /// # Returns
    /// - `Ok(UserInfo)` - The linked Galtinn user
    /// - `Err(VerificationError::ExpiredOrInvalidLink)` - Unknown or expired state
    /// - `Err(VerificationError::TokenExchangeFailed)` - Token endpoint refused the code
    /// - `Err(VerificationError::UserInfoFetchFailed)` - Userinfo request failed
    pub async fn callback(&self, code: String, state: &str) -> Result<UserInfo, AppError> {
        let repo = VerificationRepository::new(self.db);

        let challenge = repo
            .find_by_state(state)
            .await?
            .filter(|challenge| !challenge.is_expired(Utc::now()))
            .ok_or(VerificationError::ExpiredOrInvalidLink)?;

        let token = self
            .oauth_client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(PkceCodeVerifier::new(challenge.challenge.clone()))
            .request_async(self.http_client)
            .await
            .map_err(|e| VerificationError::TokenExchangeFailed {
                reason: e.to_string(),
            })?;

        let userinfo = self.fetch_userinfo(&token).await?;

        let external_id = userinfo.sub.parse::<u64>().map_err(|e| {
            VerificationError::UserInfoFetchFailed {
                reason: format!("sub '{}' is not a user id: {}", userinfo.sub, e),
            }
        })?;

        self.publisher
            .publish(&AuthCompleted {
                discord_id: challenge.discord_id,
                external_id,
            })
            .await?;

        repo.delete(challenge.discord_id, &challenge.state).await?;

        tracing::info!(
            "Discord user {} verified as Galtinn user {} ({})",
            challenge.discord_id,
            external_id,
            userinfo.preferred_username
        );

        Ok(userinfo)
    }

    async fn fetch_userinfo(
        &self,
        token: &StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    ) -> Result<UserInfo, VerificationError> {
        let failed = |reason: String| VerificationError::UserInfoFetchFailed { reason };

        let response = self
            .http_client
            .get(format!("{}/oauth/userinfo/", self.api_url))
            .bearer_auth(token.access_token().secret())
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("status {}", response.status())));
        }

        response
            .json::<UserInfo>()
            .await
            .map_err(|e| failed(e.to_string()))
    }
}
