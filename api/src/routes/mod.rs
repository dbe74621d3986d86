//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint (public)
//! - `/auth` → Login (public)
//! - `/grades` → The grading API (authenticated users; see `grades::grade_routes`)

use axum::Router;
use util::state::AppState;

pub mod auth;
pub mod grades;
pub mod health;

/// Builds the complete application router for all HTTP endpoints.
///
/// Each group carries its own access-control layers, so callers only nest
/// the returned router under the API prefix.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/auth", auth::auth_routes(app_state.clone()))
        .nest("/grades", grades::grade_routes(app_state))
}
