//! HTTP client for the upstream social data API.

use crate::error::{SocialError, SocialResult};
use crate::normalize::{normalize_tweet, tweet_array, TweetRecord};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fixed timeout for social API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upstream cap on page size.
const MAX_RESULTS_CAP: u32 = 100;

/// Query parameters for a tweet fetch.
#[derive(Debug, Clone)]
pub struct TweetQuery {
    pub max_results: u32,
    pub since_id: Option<String>,
}

impl Default for TweetQuery {
    fn default() -> Self {
        Self {
            max_results: 10,
            since_id: None,
        }
    }
}

/// Client for the upstream social data API.
pub struct SocialApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SocialApiClient {
    /// Create a new social API client.
    ///
    /// # Arguments
    /// * `base_url` - API base (e.g. "https://api.virtuals.io/api")
    /// * `api_key` - Bearer credential for the upstream API
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> SocialResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| SocialError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Fetch recent tweets for a user, normalized.
    ///
    /// A leading `@` on the username is stripped. HTTP 204 from upstream
    /// means "no content" and yields an empty list. Individual tweets the
    /// normalizer rejects are logged and skipped; an unrecognized response
    /// envelope fails the whole fetch.
    pub async fn user_tweets(
        &self,
        username: &str,
        query: &TweetQuery,
    ) -> SocialResult<Vec<TweetRecord>> {
        let username = username.trim_start_matches('@');
        let url = format!("{}/twitter/user/{}/tweets", self.base_url, username);
        let max_results = query.max_results.min(MAX_RESULTS_CAP);

        info!(username, max_results, "Fetching tweets from social API");

        let mut request = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("max_results", max_results.to_string())]);
        if let Some(since_id) = &query.since_id {
            request = request.query(&[("since_id", since_id.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SocialError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            debug!(username, "Social API returned no content");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SocialError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SocialError::HttpClient(format!("Failed to parse response: {e}")))?;

        let mut tweets = Vec::new();
        for raw in tweet_array(&body)? {
            match normalize_tweet(raw, username) {
                Ok(tweet) => tweets.push(tweet),
                Err(e) => warn!(username, error = %e, "Skipping unrecognized tweet entry"),
            }
        }

        info!(username, count = tweets.len(), "Fetched tweets");
        Ok(tweets)
    }
}
