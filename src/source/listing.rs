//! Paginated object-store listing of release artifacts.
//!
//! The listing endpoint returns pages of `{"items": [{"name": ...}],
//! "nextPageToken": ...}`; pages are followed until the token runs out.
//! Object names are arbitrary, so consumers of this source expect some of
//! them not to convert.

use super::{Source, get_with_retry, http_client, http_error_message};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// Upper bound on pages followed in one fetch, against a server that keeps
/// handing back tokens.
const MAX_PAGES: usize = 1000;

pub struct ListingSource {
    client: Client,
    url: Url,
    prefix: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListingPage {
    #[serde(default)]
    items: Vec<ListedObject>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
}

impl ListingSource {
    pub fn new(url: &str, prefix: Option<String>) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("invalid listing URL {:?}", url))?;
        Ok(Self {
            client: http_client(),
            url,
            prefix,
        })
    }

    fn page_url(&self, token: Option<&str>) -> Url {
        let mut url = self.url.clone();
        {
            let mut query = url.query_pairs_mut();
            if let Some(prefix) = &self.prefix {
                query.append_pair("prefix", prefix);
            }
            if let Some(token) = token {
                query.append_pair("pageToken", token);
            }
        }
        url
    }

    async fn fetch_page(&self, token: Option<&str>) -> Result<ListingPage> {
        let url = self.page_url(token);
        let response = get_with_retry(&self.client, url.as_str()).await?;
        if !response.status().is_success() {
            bail!(http_error_message(
                response.status(),
                "object listing",
                url.as_str()
            ));
        }

        response
            .json()
            .await
            .with_context(|| format!("object listing at {} is not valid JSON", url))
    }
}

#[async_trait]
impl Source for ListingSource {
    async fn fetch(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let page = self.fetch_page(token.as_deref()).await?;
            names.extend(
                page.items
                    .into_iter()
                    .map(|object| object.name)
                    .filter(|name| !name.is_empty()),
            );
            token = page.next_page_token.filter(|t| !t.is_empty());
            if token.is_none() {
                return Ok(names);
            }
        }

        bail!(
            "object listing at {} did not finish within {} pages",
            self.url,
            MAX_PAGES
        );
    }

    fn name(&self) -> &'static str {
        "listing"
    }
}
