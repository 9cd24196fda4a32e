use reqwest::StatusCode;

use crate::{
    error::galtinn::GaltinnError,
    model::galtinn::{DiscordProfile, ProfileFilter},
    service::galtinn::GaltinnClient,
};

impl GaltinnClient {
    /// Fetches the Discord profiles matching `filter`.
    ///
    /// A non-empty result for a Discord id means that account is linked.
    pub async fn fetch_discord_profiles(
        &self,
        filter: &ProfileFilter,
    ) -> Result<Vec<DiscordProfile>, GaltinnError> {
        self.fetch_all("discordprofiles/", &filter.query_pairs()).await
    }

    /// Deletes a Discord profile, unlinking the account.
    ///
    /// # Returns
    /// - `Ok(())` - Profile deleted
    /// - `Err(GaltinnError::NotFound)` - Profile did not exist
    /// - `Err(GaltinnError)` - Request failed
    pub async fn delete_discord_profile(&self, profile_id: u64) -> Result<(), GaltinnError> {
        let url = self.endpoint(&format!("discordprofiles/{}/", profile_id), &[])?;

        let response = self
            .http_client
            .delete(url.clone())
            .bearer_auth(&self.auth_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(GaltinnError::NotFound {
                url: url.to_string(),
            }),
            status => Err(GaltinnError::FetchFailed {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}
