//! Write endpoint of the grading API.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use common::format_validation_errors;
use db::marks::{self, GradeEntry, GradingError};
use util::state::AppState;

use crate::auth::claims::AuthUser;
use crate::auth::guards::Empty;
use crate::response::ApiResponse;

#[derive(Debug, Deserialize, Serialize)]
pub struct GradeEntryRequest {
    pub scheme_id: i64,
    pub grades: Vec<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveGradesRequest {
    /// The grader the marks belong to. Must be the authenticated caller,
    /// unless the caller is an admin submitting on someone's behalf.
    pub user_id: i64,
    #[validate(length(min = 1, message = "At least one rubric entry is required"))]
    pub grades: Vec<GradeEntryRequest>,
}

fn grading_error_response(err: GradingError) -> Response {
    let (status, message) = match err {
        GradingError::StudentNotFound(_) | GradingError::GraderNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        GradingError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        GradingError::NotPermitted(_) => (StatusCode::FORBIDDEN, err.to_string()),
        GradingError::Db(e) => {
            tracing::error!(error = %e, "Database error while saving grades");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error while saving grades".to_string(),
            )
        }
    };
    (status, Json(ApiResponse::<Empty>::error(message))).into_response()
}

/// POST /grades/save/{student_id}
///
/// Replaces the grader's marks for the submitted rubrics and recomputes the
/// student's total inside one transaction. A validation or authorization
/// failure on any rubric aborts the whole submission — no partial marks are
/// ever stored.
///
/// ### Request body
/// ```json
/// {
///   "user_id": 7,
///   "grades": [ { "scheme_id": 1, "grades": [8.0, 4.5] } ]
/// }
/// ```
///
/// ### Responses
/// - `200 OK` on success
/// - `400 Bad Request` naming the offending rubric/criterion
/// - `403 Forbidden` when the grader may not grade a submitted rubric
/// - `404 Not Found` for unknown student or grader
pub async fn save_grades(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(student_id): Path<i64>,
    Json(req): Json<SaveGradesRequest>,
) -> Result<Response, Response> {
    if let Err(errors) = req.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(format_validation_errors(
                &errors,
            ))),
        )
            .into_response());
    }

    // Grading on behalf of someone else is an admin-only operation.
    if req.user_id != claims.sub && !claims.admin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Empty>::error(
                "Cannot submit grades as another user",
            )),
        )
            .into_response());
    }

    let entries: Vec<GradeEntry> = req
        .grades
        .into_iter()
        .map(|e| GradeEntry {
            scheme_id: e.scheme_id,
            grades: e.grades,
        })
        .collect();

    marks::save_grades(app_state.db(), student_id, req.user_id, &entries)
        .await
        .map_err(grading_error_response)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(Empty, "Grades saved successfully")),
    )
        .into_response())
}
