//! Upstream reference advertisement fetching

use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{FETCH_TIMEOUT_MS, REFS_SUFFIX, USER_AGENT};

/// Default scheme prefix for upstream requests
const DEFAULT_BASE_URL: &str = "https://";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot talk to git repository: {0}")]
    Network(#[from] reqwest::Error),

    #[error("repository not found: {0}")]
    NotFound(String),

    #[error("error from git repository: {0}")]
    UnexpectedStatus(String),
}

/// Fetches the smart-HTTP reference advertisement of an upstream repository
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RefsFetcher: Send + Sync {
    /// Fetches `<repo>.git/info/refs?service=git-upload-pack`
    ///
    /// # Arguments
    /// * `repo_root` - Repository host and path without scheme (e.g., "github.com/upper/db")
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - The raw advertisement
    /// * `Err(FetchError::NotFound)` - If the upstream answered 401 or 404
    /// * `Err(FetchError)` - For any other failure
    async fn fetch_refs(&self, repo_root: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetcher talking to the upstream Git host over HTTP
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Creates a fetcher that prefixes every repository root with `base_url`
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Creates a fetcher for HTTPS upstreams
    pub fn secure() -> Result<Self, FetchError> {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl RefsFetcher for HttpFetcher {
    async fn fetch_refs(&self, repo_root: &str) -> Result<Vec<u8>, FetchError> {
        let url = format!("{}{}{}", self.base_url, repo_root, REFS_SUFFIX);
        debug!("Fetching refs from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::NOT_FOUND
        {
            return Err(FetchError::NotFound(repo_root.to_string()));
        }

        if status != reqwest::StatusCode::OK {
            warn!("Upstream returned status {}: {}", status, url);
            return Err(FetchError::UnexpectedStatus(status.to_string()));
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}
