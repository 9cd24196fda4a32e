//! Client for the Galtinn directory API.
//!
//! Every request carries the static bearer token. Listings are drained with
//! [`pagination::drain_pages`], so callers always see complete result sets or
//! an error, never a partial listing.

pub mod group;
pub mod pagination;
pub mod profile;
pub mod user;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    error::galtinn::GaltinnError,
    model::galtinn::Page,
    service::galtinn::pagination::{drain_pages, PageResponse},
};

/// Galtinn API client.
///
/// Cheap to clone: `reqwest::Client` shares its connection pool.
#[derive(Clone)]
pub struct GaltinnClient {
    http_client: reqwest::Client,
    api_url: String,
    auth_token: String,
}

impl GaltinnClient {
    /// Creates a client for the API rooted at `api_url`.
    ///
    /// # Arguments
    /// - `http_client` - Shared HTTP client
    /// - `api_url` - Base URL, e.g. `https://galtinn.neuf.no`
    /// - `auth_token` - Static bearer token
    pub fn new(http_client: reqwest::Client, api_url: &str, auth_token: String) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            auth_token,
        }
    }

    /// Builds `{api_url}/{path}` with `format=json` and the given query pairs.
    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, GaltinnError> {
        let mut url = Url::parse(&format!("{}/{}", self.api_url, path))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "json");
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<PageResponse<T>, GaltinnError> {
        let response = self
            .http_client
            .get(url.clone())
            .bearer_auth(&self.auth_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let page = response
                    .json::<Page<T>>()
                    .await
                    .map_err(|source| GaltinnError::Decode {
                        url: url.to_string(),
                        source,
                    })?;

                Ok(PageResponse::Page(page))
            }
            StatusCode::NOT_FOUND => Ok(PageResponse::NotFound),
            status => Err(GaltinnError::FetchFailed {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }

    /// Drains a listing starting at `path` with the given filters.
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, GaltinnError> {
        let first = self.endpoint(path, query)?;

        drain_pages(first, |url| self.fetch_page(url)).await
    }
}
