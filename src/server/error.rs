use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::warn;

use crate::git::{FetchError, RewriteError};
use crate::server::path::PathError;
use crate::version::Version;
use crate::version::types::UNSTABLE_SUFFIX;

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Missing package name.")]
    MissingPackage,

    #[error("Failed to parse request path")]
    InvalidPath,

    #[error("Git repository not found at https://{0}")]
    RepositoryNotFound(String),

    #[error("Git repository at https://{repo} has no branch or tag {}", accepted_shapes(.version))]
    VersionNotFound { repo: String, version: Version },

    #[error("Missing ?go-get=1 parameter.")]
    MissingGoGet,

    #[error("Cannot obtain refs from Git: {0}")]
    Upstream(String),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::MissingPackage
            | ServeError::RepositoryNotFound(_)
            | ServeError::VersionNotFound { .. }
            | ServeError::MissingGoGet => StatusCode::NOT_FOUND,
            ServeError::InvalidPath => StatusCode::INTERNAL_SERVER_ERROR,
            ServeError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Maps a rewrite failure for the given repository and requested version
    pub fn from_rewrite(err: RewriteError, repo: String, version: Version) -> Self {
        match err {
            RewriteError::VersionNotFound => ServeError::VersionNotFound { repo, version },
            RewriteError::Malformed(e) => ServeError::Upstream(e.to_string()),
        }
    }
}

impl From<PathError> for ServeError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::MissingPackage => ServeError::MissingPackage,
            PathError::Malformed(_) => ServeError::InvalidPath,
        }
    }
}

impl From<FetchError> for ServeError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound(repo) => ServeError::RepositoryNotFound(repo),
            other => ServeError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("{}: {}", status, self);
        }
        (status, self.to_string()).into_response()
    }
}

/// Lists the version tokens that would satisfy `version`, e.g.
/// `"v1", "v1.N" or "v1.N.M"`.
fn accepted_shapes(version: &Version) -> String {
    let suffix = if version.is_unstable() {
        UNSTABLE_SUFFIX
    } else {
        ""
    };
    let base = version.with_unstable(false).to_string();

    let mut shapes = vec![base.clone()];
    if version.minor().is_none() {
        shapes.push(format!("{}.N", base));
        shapes.push(format!("{}.N.M", base));
    } else if version.patch().is_none() {
        shapes.push(format!("{}.N", base));
    }

    let quoted: Vec<String> = shapes
        .iter()
        .map(|shape| format!("\"{}{}\"", shape, suffix))
        .collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        _ => quoted.concat(),
    }
}
