use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use common::format_validation_errors;
use db::models::user;
use util::state::AppState;

use crate::auth::generate_jwt;
use crate::auth::guards::Empty;
use crate::response::ApiResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: String,
    pub user: user::Model,
}

/// POST /auth/login
///
/// Verifies email + password against the stored argon2 hash and returns a
/// signed JWT together with the user record.
///
/// ### Responses
/// - `200 OK` with `{token, expires_at, user}`
/// - `400 Bad Request` on malformed input
/// - `401 Unauthorized` on unknown email or wrong password
pub async fn login(State(app_state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(format_validation_errors(
                &errors,
            ))),
        )
            .into_response();
    }

    match user::Model::verify_credentials(app_state.db(), &req.email, &req.password).await {
        Ok(Some(user)) => {
            let (token, expires_at) = generate_jwt(user.id, user.admin);
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    LoginResponse {
                        token,
                        expires_at,
                        user,
                    },
                    "Login successful",
                )),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<Empty>::error("Invalid email or password")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Database error during login");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Database error during login")),
            )
                .into_response()
        }
    }
}
