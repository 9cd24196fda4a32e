use crate::{
    error::galtinn::GaltinnError,
    model::galtinn::{MembershipRecord, UserFilter},
    service::galtinn::GaltinnClient,
};

impl GaltinnClient {
    /// Fetches every user record matching `filter`.
    ///
    /// An empty filter lists all users, which is what the daily membership
    /// check iterates over.
    pub async fn fetch_users(
        &self,
        filter: &UserFilter,
    ) -> Result<Vec<MembershipRecord>, GaltinnError> {
        self.fetch_all("users/", &filter.query_pairs()).await
    }

    /// Fetches a single user by Galtinn id.
    ///
    /// # Returns
    /// - `Ok(MembershipRecord)` - The user
    /// - `Err(GaltinnError::NotFound)` - No user with that id
    /// - `Err(GaltinnError)` - Request failed
    pub async fn fetch_user(&self, id: u64) -> Result<MembershipRecord, GaltinnError> {
        let filter = UserFilter::by_id(id);

        self.fetch_users(&filter)
            .await?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or_else(|| GaltinnError::NotFound {
                url: format!("{}/users/?id={}", self.api_url, id),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{error::TestError, fixture, galtinn::MockGaltinn};

    #[tokio::test]
    async fn filters_by_discord_id() -> Result<(), TestError> {
        let galtinn = MockGaltinn::start().await?;
        galtinn.set_users(vec![
            fixture::galtinn::user(1).discord_id(111).build(),
            fixture::galtinn::user(2).discord_id(222).build(),
            fixture::galtinn::user(3).build(),
        ]);
        let client = GaltinnClient::new(reqwest::Client::new(), &galtinn.url, "t".to_string());

        let records = client
            .fetch_users(&UserFilter::by_discord_id(222))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 2);

        Ok(())
    }

    #[tokio::test]
    async fn fetch_user_reports_missing_user() -> Result<(), TestError> {
        let galtinn = MockGaltinn::start().await?;
        galtinn.set_users(vec![fixture::galtinn::user(1).build()]);
        let client = GaltinnClient::new(reqwest::Client::new(), &galtinn.url, "t".to_string());

        assert_eq!(client.fetch_user(1).await.unwrap().id, 1);
        assert!(matches!(
            client.fetch_user(99).await,
            Err(GaltinnError::NotFound { .. })
        ));

        Ok(())
    }
}
