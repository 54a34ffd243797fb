//! Feed enumeration: the `FeedSource` seam and the Reddit implementation.

use crate::config::Credentials;
use crate::error::RiddleError;
use crate::types::Candidate;
use serde::Deserialize;
use std::future::Future;
use tracing::{debug, info, warn};

/// Default Reddit OAuth token endpoint.
pub const REDDIT_AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Default Reddit API base for authenticated requests.
pub const REDDIT_API_URL: &str = "https://oauth.reddit.com";

/// Reddit returns at most this many items per listing page.
const PAGE_LIMIT: usize = 100;

/// A ranked source of image links.
pub trait FeedSource {
    /// Lists up to `max_count` items of `feed` in rank order.
    ///
    /// `None` lists as many as the source yields. A failure part way through
    /// is logged and the items gathered so far are returned.
    fn list_hot(
        &self,
        feed: &str,
        max_count: Option<usize>,
    ) -> impl Future<Output = Vec<Candidate>> + Send;
}

#[derive(Deserialize, Debug)]
struct AccessToken {
    access_token: String,
}

#[derive(Deserialize, Debug)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize, Debug)]
struct ListingData {
    children: Vec<Child>,
    after: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Child {
    data: Submission,
}

#[derive(Deserialize, Debug)]
struct Submission {
    url: Option<String>,
    #[serde(default)]
    over_18: bool,
}

/// Subreddit "hot" listings via application-only OAuth.
#[derive(Debug, Clone)]
pub struct RedditFeed {
    client: reqwest::Client,
    credentials: Credentials,
    auth_url: String,
    api_url: String,
}

impl RedditFeed {
    pub fn new(client: reqwest::Client, credentials: Credentials) -> Self {
        Self::with_endpoints(client, credentials, REDDIT_AUTH_URL, REDDIT_API_URL)
    }

    /// Points the client at other token and API endpoints.
    pub fn with_endpoints(
        client: reqwest::Client,
        credentials: Credentials,
        auth_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            auth_url: auth_url.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Obtains a bearer token with the client credentials grant.
    async fn access_token(&self) -> Result<String, RiddleError> {
        let response = self
            .client
            .post(&self.auth_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RiddleError::Feed(format!(
                "token request to {} failed: HTTP {}",
                self.auth_url, status
            )));
        }
        let token = response.json::<AccessToken>().await.map_err(|e| {
            RiddleError::Feed(format!("invalid token response from {}: {}", self.auth_url, e))
        })?;
        Ok(token.access_token)
    }

    /// Fetches one listing page.
    async fn page(
        &self,
        token: &str,
        feed: &str,
        limit: usize,
        after: Option<&str>,
    ) -> Result<ListingData, RiddleError> {
        let url = format!("{}/r/{}/hot", self.api_url, feed);
        let mut query = vec![("limit", limit.to_string()), ("raw_json", "1".to_string())];
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }
        debug!("Requesting {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RiddleError::Feed(format!(
                "listing r/{} failed: HTTP {}",
                feed, status
            )));
        }
        let body = response.bytes().await?;
        parse_listing(&body)
    }

    /// Walks the listing pages, appending into `out` until done or an error.
    async fn collect(
        &self,
        feed: &str,
        max_count: Option<usize>,
        out: &mut Vec<Candidate>,
    ) -> Result<(), RiddleError> {
        let token = self.access_token().await?;
        let mut after: Option<String> = None;

        loop {
            let remaining = max_count.map(|max| max.saturating_sub(out.len()));
            if remaining == Some(0) {
                return Ok(());
            }
            let limit = remaining.map_or(PAGE_LIMIT, |r| r.min(PAGE_LIMIT));

            let page = self.page(&token, feed, limit, after.as_deref()).await?;
            if page.children.is_empty() {
                return Ok(());
            }
            for child in page.children {
                if max_count.is_some_and(|max| out.len() >= max) {
                    return Ok(());
                }
                if let Some(url) = child.data.url {
                    out.push(Candidate {
                        url,
                        restricted: child.data.over_18,
                    });
                }
            }
            debug!("[~] {} images", out.len());

            match page.after {
                Some(cursor) => after = Some(cursor),
                None => return Ok(()),
            }
        }
    }
}

/// Decodes a listing page body.
fn parse_listing(body: &[u8]) -> Result<ListingData, RiddleError> {
    Ok(serde_json::from_slice::<Listing>(body)?.data)
}

impl FeedSource for RedditFeed {
    async fn list_hot(&self, feed: &str, max_count: Option<usize>) -> Vec<Candidate> {
        info!("[~] Fetching images for r/{}...", feed);
        let mut candidates = Vec::new();
        if let Err(e) = self.collect(feed, max_count, &mut candidates).await {
            warn!(
                "Listing r/{} stopped after {} items: {}",
                feed,
                candidates.len(),
                e
            );
        }
        info!("[~] {} images listed for r/{}", candidates.len(), feed);
        candidates
    }
}
