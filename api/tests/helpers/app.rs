use axum::Router;
use util::{config::AppConfig, state::AppState};

/// Builds the real application router over a fresh in-memory database.
///
/// Returns the router (oneshot it per request) together with the state so
/// tests can seed data directly through the `db` models.
pub async fn make_test_app() -> (Router, AppState) {
    AppConfig::set_jwt_secret("test-secret-key");

    let db = db::test_utils::setup_test_db().await;
    let app_state = AppState::new(db);

    let router = Router::new().nest("/api", api::routes::routes(app_state.clone()));
    (router, app_state)
}
