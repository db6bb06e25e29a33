//! Fetcher and application test utilities

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;

use go_vanity::git::{FetchError, RefPolicy, RefsFetcher};
use go_vanity::repo::RepoRoot;
use go_vanity::server::AppState;
use go_vanity::server::routes::create_router;

pub const REPO_ROOT: &str = "https://github.com/upper";
pub const VANITY_ROOT: &str = "https://upper.io";

/// In-memory upstream keyed by repository root (e.g., "github.com/upper/db")
pub struct StubFetcher {
    advertisements: HashMap<String, Vec<u8>>,
}

#[allow(dead_code)]
impl StubFetcher {
    pub fn new() -> Self {
        Self {
            advertisements: HashMap::new(),
        }
    }

    pub fn with_advertisement(mut self, repo_root: &str, data: Vec<u8>) -> Self {
        self.advertisements.insert(repo_root.to_string(), data);
        self
    }
}

#[async_trait]
impl RefsFetcher for StubFetcher {
    async fn fetch_refs(&self, repo_root: &str) -> Result<Vec<u8>, FetchError> {
        match self.advertisements.get(repo_root) {
            Some(data) => Ok(data.clone()),
            None => Err(FetchError::NotFound(repo_root.to_string())),
        }
    }
}

/// Create a router over the upper.io -> github.com/upper roots
pub fn create_test_app(fetcher: impl RefsFetcher + 'static, policy: RefPolicy) -> Router {
    let root = RepoRoot::new(REPO_ROOT, VANITY_ROOT).unwrap();
    create_router(Arc::new(AppState::new(root, Arc::new(fetcher), policy)))
}
