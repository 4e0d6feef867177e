use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::{header::USER_AGENT, Client};
use tracing::instrument;

use crate::domain::post::{PostSource, RawPost};

pub const DEFAULT_POSTS_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Pages through a JSON array endpoint using `_page` / `_limit` query params.
#[derive(Clone)]
pub struct HttpPostSource {
    client: Client,
    base_url: String,
}

impl HttpPostSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: Client::new(), base_url: base_url.into() }
    }
}

#[async_trait]
impl PostSource for HttpPostSource {
    #[instrument(skip(self), fields(url = %self.base_url))]
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<RawPost>> {
        let resp = self
            .client
            .get(&self.base_url)
            .header(USER_AGENT, "taskboard")
            .query(&[("_page", page), ("_limit", limit)])
            .send()
            .await?;
        if !resp.status().is_success() {
            tracing::debug!(status = %resp.status(), "posts endpoint returned an error status");
            bail!("Failed to fetch posts");
        }
        Ok(resp.json().await?)
    }
}
