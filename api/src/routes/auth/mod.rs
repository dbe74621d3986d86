//! Authentication routes.
//!
//! Only login is exposed; account management is an administrative concern
//! handled outside this service.

use axum::{Router, routing::post};
use util::state::AppState;

pub mod post;

/// Builds the `/auth` route group.
///
/// Routes:
/// - `POST /auth/login` → Verify credentials and issue a JWT
pub fn auth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/login", post(self::post::login))
        .with_state(app_state)
}
