//! HTTP front end
//!
//! # Modules
//!
//! - [`routes`]: Router construction
//! - [`handlers`]: Health check and package resolution handlers
//! - [`path`]: Inbound request path parsing
//! - [`html`]: go-get discovery page
//! - [`error`]: Error type with its HTTP status mapping

pub mod error;
pub mod handlers;
pub mod html;
pub mod path;
pub mod routes;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use tokio::net::{TcpListener, UnixListener};
use tracing::{error, info, warn};

use crate::config::{Config, Listen};
use crate::git::{HttpFetcher, RefPolicy, RefsFetcher};
use crate::repo::RepoRoot;
use crate::server::path::PathMatcher;
use crate::server::routes::create_router;

/// Shared, read-only state for all requests
pub struct AppState {
    pub root: RepoRoot,
    pub fetcher: Arc<dyn RefsFetcher>,
    pub policy: RefPolicy,
    pub paths: PathMatcher,
}

impl AppState {
    pub fn new(root: RepoRoot, fetcher: Arc<dyn RefsFetcher>, policy: RefPolicy) -> Self {
        Self {
            root,
            fetcher,
            policy,
            paths: PathMatcher::new(),
        }
    }
}

/// Builds the application from configuration and serves it until Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let root = RepoRoot::new(&config.repo_root, &config.vanity_root)?;
    let fetcher = HttpFetcher::secure().context("Failed to create HTTP client")?;
    let state = Arc::new(AppState::new(root, Arc::new(fetcher), config.policy));
    let app = create_router(state);

    match &config.listen {
        Listen::Tcp(addr) => {
            let listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind to tcp {}", addr))?;
            info!(
                "Listening at {}. {} -> {}",
                addr, config.vanity_root, config.repo_root
            );
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        Listen::Unix(path) => {
            info!(
                "Listening at {}. {} -> {}",
                path.display(),
                config.vanity_root,
                config.repo_root
            );
            serve_unix(path, app).await?;
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn serve_unix(path: &Path, app: Router) -> anyhow::Result<()> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove stale socket {}", path.display()))?;
    }
    let listener = UnixListener::bind(path)
        .with_context(|| format!("Failed to bind to unix {}", path.display()))?;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, _addr)) => {
                    let service = TowerToHyperService::new(app.clone());
                    tokio::spawn(async move {
                        if let Err(err) = http1::Builder::new()
                            .serve_connection(TokioIo::new(stream), service)
                            .await
                        {
                            warn!("Error serving connection: {:?}", err);
                        }
                    });
                }
                Err(e) => error!("Failed to accept connection: {}", e),
            },
            _ = &mut shutdown => break,
        }
    }

    remove_socket(path);
    Ok(())
}

/// Removes the socket file on shutdown. A file that is already gone is fine.
fn remove_socket(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove socket {}: {}", path.display(), e),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
