//! Axum router configuration

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::server::AppState;
use crate::server::handlers::{health_check, resolve_package};

/// Create the application router
///
/// Package paths are free-form, so everything but the health check goes
/// through the fallback handler.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health-check", get(health_check))
        .fallback(resolve_package)
        .with_state(state)
}
