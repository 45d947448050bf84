//! Feed gateway client.
//!
//! Thin HTTP interface to the platform's Graph-style API. The rest of the
//! core only depends on the [`FeedSource`] trait, so tests (and alternative
//! gateways) can substitute an in-memory implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{FeedPage, GatewayConfig, GroupInfo, Profile};

/// Fields requested for each feed entry, including the first page of comments.
const FEED_FIELDS: &str = "message,created_time,from{id,name,picture},\
attachments{media,type,url},full_picture,comments{message,from{id,name},created_time}";

/// Source of group metadata and feed pages.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the display name of a group.
    async fn group_name(&self, group_id: &str) -> Result<String>;

    /// Fetch one page of a group's feed, continuing from `after` if given.
    async fn feed_page(&self, group_id: &str, after: Option<&str>) -> Result<FeedPage>;
}

/// HTTP feed gateway client.
#[derive(Debug)]
pub struct FeedGateway {
    client: Client,
    base_url: String,
    access_token: String,
    page_size: u32,
}

impl FeedGateway {
    /// Create a gateway client. Fails with a credential error when the token
    /// is missing; credential errors are surfaced to the caller, no retry.
    pub fn new(config: &GatewayConfig, access_token: &str) -> Result<Self> {
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(AppError::credential("missing access token"));
        }

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            page_size: config.page_size,
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("access_token", &self.access_token);
        }
        Ok(url)
    }

    /// Perform a GET and decode the JSON body. A non-success upstream status
    /// is passed through verbatim as a gateway error.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<FeedPage>(&body)
                .ok()
                .and_then(|page| page.error)
                .map(|error| error.describe())
                .unwrap_or(body);
            return Err(AppError::gateway(status.as_u16(), message));
        }
        Ok(response.json().await?)
    }

    /// Validate the credential against the caller's own profile identity.
    pub async fn validate_token(&self) -> Result<Profile> {
        let url = self.endpoint("me", &[])?;
        let profile: Profile = self.get_json(url).await?;
        if let Some(error) = &profile.error {
            return Err(AppError::credential(error.describe()));
        }
        Ok(profile)
    }
}

#[async_trait]
impl FeedSource for FeedGateway {
    async fn group_name(&self, group_id: &str) -> Result<String> {
        let url = self.endpoint(group_id, &[("fields", "name")])?;
        let info: GroupInfo = self.get_json(url).await?;
        if let Some(error) = info.error {
            return Err(AppError::gateway(200, error.describe()));
        }
        Ok(info.name.unwrap_or_else(|| group_id.to_string()))
    }

    async fn feed_page(&self, group_id: &str, after: Option<&str>) -> Result<FeedPage> {
        let page_size = self.page_size.to_string();
        let mut params = vec![("limit", page_size.as_str()), ("fields", FEED_FIELDS)];
        if let Some(after) = after {
            params.push(("after", after));
        }

        let url = self.endpoint(&format!("{group_id}/feed"), &params)?;
        let page: FeedPage = self.get_json(url).await?;
        if let Some(error) = &page.error {
            return Err(AppError::ingest(group_id, error.describe()));
        }
        Ok(page)
    }
}
