//! Request handlers
//!
//! Every package request fetches the upstream advertisement and resolves the
//! requested version before looking at the subpath, so resolution errors win
//! over the subpath-specific responses.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use tracing::{debug, info};

use crate::git;
use crate::server::AppState;
use crate::server::error::ServeError;
use crate::server::html::render_go_get;

/// Content type of a smart-HTTP upload-pack advertisement
pub const ADVERTISEMENT_CONTENT_TYPE: &str = "application/x-git-upload-pack-advertisement";

/// GET /health-check
pub async fn health_check() -> &'static str {
    "ok"
}

/// Any other path: `/<package>[.<version>][<subpath>]`
pub async fn resolve_package(
    State(state): State<Arc<AppState>>,
    uri: Uri,
) -> Result<Response, ServeError> {
    info!("Requested {}", uri);

    let request = state.paths.parse(uri.path())?;
    let mut repo = state.root.repository(&request.name, request.version);
    let requested = repo.requested_version();

    let original = state.fetcher.fetch_refs(&repo.repo_root()).await?;
    let rewritten = git::rewrite(&original, &requested, state.policy)
        .map_err(|e| ServeError::from_rewrite(e, repo.repo_root(), requested))?;
    repo.set_versions(&rewritten);
    debug!(
        "Resolved {} as {} to {} ({} versions upstream)",
        repo.name(),
        repo.vanity_path(),
        repo.git_tree(),
        repo.all_versions().len()
    );

    match request.subpath.as_str() {
        "/git-upload-pack" => Ok((
            StatusCode::MOVED_PERMANENTLY,
            [(LOCATION, repo.upload_pack_url())],
        )
            .into_response()),
        "/info/refs" => Ok((
            [(CONTENT_TYPE, ADVERTISEMENT_CONTENT_TYPE)],
            rewritten.data,
        )
            .into_response()),
        _ if wants_go_get(uri.query()) => Ok(Html(render_go_get(&repo)).into_response()),
        _ => Err(ServeError::MissingGoGet),
    }
}

/// True when the first `go-get` query parameter is `1`
fn wants_go_get(query: Option<&str>) -> bool {
    query
        .and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes()).find(|(key, _)| key == "go-get")
        })
        .is_some_and(|(_, value)| value == "1")
}
