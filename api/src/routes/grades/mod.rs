//! Grading routes.
//!
//! Provides the `/grades` route group:
//! - `GET  /grades/scheme/{student_id}` → rubrics + criteria the caller may grade
//! - `GET  /grades/student/{student_id}` → the caller's own saved marks, zero-filled
//! - `POST /grades/save/{student_id}`   → replace the caller's marks and recompute
//! - `GET  /grades/total-marks`         → materialized totals visible to the caller
//! - `GET  /grades/schemes`             → full rubric catalog (coordinator/admin)
//!
//! All responses follow the standard `ApiResponse` format.
//!
//! Access control: every route requires authentication; the catalog listing
//! additionally requires a coordinator appointment or admin. Whether a
//! caller may actually grade a given student/rubric is decided row-by-row
//! by `db::scheme::can_grade`.

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use util::state::AppState;

use crate::auth::guards::{allow_authenticated, allow_coordinator};

pub mod get;
pub mod post;

/// Builds and returns the `/grades` route group.
pub fn grade_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/scheme/{student_id}", get(self::get::get_marking_scheme))
        .route("/student/{student_id}", get(self::get::get_student_grades))
        .route("/save/{student_id}", post(self::post::save_grades))
        .route("/total-marks", get(self::get::get_total_marks))
        .route(
            "/schemes",
            get(self::get::list_marking_schemes).route_layer(from_fn_with_state(
                app_state.clone(),
                allow_coordinator,
            )),
        )
        .route_layer(from_fn(allow_authenticated))
        .with_state(app_state)
}
