//! The canonical release feed: a single JSON document listing every
//! published release and whether it is considered stable.

use super::{Source, get_with_retry, http_client, http_error_message};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// One entry of the release feed.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    /// Raw release tag, product prefix included (e.g. "pkg1.21.5").
    pub version: String,
    /// Whether the publisher marks this release stable.
    #[serde(default)]
    pub stable: bool,
}

/// Fetches the JSON version feed. The feed is a curated document, so its
/// consumers treat every entry as expected to convert.
pub struct FeedSource {
    client: Client,
    url: String,
    stable_only: bool,
}

impl FeedSource {
    pub fn new(url: impl Into<String>, stable_only: bool) -> Self {
        Self {
            client: http_client(),
            url: url.into(),
            stable_only,
        }
    }

    /// Fetch the raw feed entries, stability flags included.
    pub async fn entries(&self) -> Result<Vec<FeedEntry>> {
        let response = get_with_retry(&self.client, &self.url).await?;
        if !response.status().is_success() {
            bail!(http_error_message(
                response.status(),
                "version feed",
                &self.url
            ));
        }

        response
            .json()
            .await
            .with_context(|| format!("version feed at {} is not valid JSON", self.url))
    }
}

#[async_trait]
impl Source for FeedSource {
    async fn fetch(&self) -> Result<Vec<String>> {
        Ok(self
            .entries()
            .await?
            .into_iter()
            .filter(|entry| entry.stable || !self.stable_only)
            .map(|entry| entry.version)
            .collect())
    }

    fn name(&self) -> &'static str {
        "feed"
    }
}
