use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::ContentConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid authorization token")]
    InvalidToken,
}

/// Source of remote tree listings and file objects.
///
/// Failures are reported as `None`; implementations log the cause.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<Value>;
}

/// GitHub contents API client
pub struct GithubClient {
    client: Client,
}

impl GithubClient {
    pub fn new(config: &ContentConfig) -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(ref token) = config.github_token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| FetchError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        } else {
            tracing::warn!("GITHUB_TOKEN not set; content requests are unauthenticated");
        }

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl ContentSource for GithubClient {
    async fn fetch(&self, url: &str) -> Option<Value> {
        match self.get_json(url).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Content fetch failed for {}: {}", url, e);
                None
            }
        }
    }
}
