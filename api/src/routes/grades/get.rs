//! Read endpoints of the grading API.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use db::models::{
    course_coordinator, criteria,
    criteria::CriteriaMode,
    grade, rubric,
    student::{self, Course},
    student_grade::{self, Breakdown},
    student_mark, user,
};
use db::scheme::{self, SchemeError};
use util::state::AppState;

use crate::auth::claims::AuthUser;
use crate::auth::guards::Empty;
use crate::response::ApiResponse;

#[derive(Debug, Serialize)]
pub struct CriteriaResponse {
    pub id: i64,
    pub label: String,
    pub weightage: f64,
    pub max_mark: f64,
    pub mode: CriteriaMode,
}

#[derive(Debug, Serialize)]
pub struct RubricSchemeResponse {
    pub id: i64,
    pub label: String,
    pub weightage: f64,
    pub course: Course,
    pub steps: i32,
    pub criteria: Vec<CriteriaResponse>,
}

impl RubricSchemeResponse {
    pub fn new(rubric: rubric::Model, criteria: Vec<criteria::Model>) -> Self {
        Self {
            id: rubric.id,
            label: rubric.label,
            weightage: rubric.weightage,
            course: rubric.course,
            steps: rubric.steps,
            criteria: criteria
                .into_iter()
                .map(|c| CriteriaResponse {
                    id: c.id,
                    label: c.label,
                    weightage: c.weightage,
                    max_mark: c.max_mark,
                    mode: c.mode,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudentGradesResponse {
    pub scheme: RubricSchemeResponse,
    /// The requesting evaluator's own marks, aligned to `scheme.criteria`
    /// order, zero where ungraded.
    pub grades: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct TotalMarkResponse {
    pub id: i64,
    pub student_id: i64,
    pub student: String,
    pub student_number: String,
    pub course: Course,
    pub total_mark: f64,
    pub breakdown: Breakdown,
    /// `None` renders as "N/A" in the front end.
    pub grade_letter: Option<String>,
    pub grade_gpa: Option<f64>,
    pub updated_at: String,
}

fn internal_error(e: impl std::fmt::Display) -> Response {
    tracing::error!(error = %e, "Database error in grades route");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<Empty>::error("Database error")),
    )
        .into_response()
}

pub(super) async fn load_student(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<student::Model, Response> {
    student::Model::get_by_id(db, student_id)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error(format!(
                    "Student {} not found.",
                    student_id
                ))),
            )
                .into_response()
        })
}

/// The authenticated account behind the JWT. A valid token for a since-
/// deleted user is rejected.
pub(super) async fn load_auth_user(
    db: &DatabaseConnection,
    claims_sub: i64,
) -> Result<user::Model, Response> {
    user::Model::get_by_id(db, claims_sub)
        .await
        .map_err(internal_error)?
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<Empty>::error("Authentication required")),
            )
                .into_response()
        })
}

/// GET /grades/scheme/{student_id}
///
/// Resolves the marking scheme the requesting user may grade for the given
/// student: course rubrics the caller's roles cover, each carrying the
/// criteria applicable to the student's mode, in `steps` order.
///
/// ### Responses
/// - `200 OK` with the rubric list
/// - `403 Forbidden` when the caller has no grading relationship
/// - `404 Not Found` for an unknown student
pub async fn get_marking_scheme(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(student_id): Path<i64>,
) -> Result<Response, Response> {
    let db = app_state.db();
    let student = load_student(db, student_id).await?;
    let user = load_auth_user(db, claims.sub).await?;

    match scheme::resolve_scheme(db, &student, &user).await {
        Ok(schemes) => {
            let data: Vec<RubricSchemeResponse> = schemes
                .into_iter()
                .map(|s| RubricSchemeResponse::new(s.rubric, s.criteria))
                .collect();
            Ok((
                StatusCode::OK,
                Json(ApiResponse::success(
                    data,
                    "Marking scheme fetched successfully",
                )),
            )
                .into_response())
        }
        Err(SchemeError::NotPermitted) => Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Empty>::error(
                "User does not have permission to access this student's marking scheme",
            )),
        )
            .into_response()),
        Err(SchemeError::Db(e)) => Err(internal_error(e)),
    }
}

/// GET /grades/student/{student_id}
///
/// Returns, per course rubric, the requesting evaluator's own saved marks
/// aligned to criteria order, zero-filled where ungraded. This backs the
/// grading form, so it covers every rubric of the student's course, not
/// just the ones the caller may write.
pub async fn get_student_grades(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(student_id): Path<i64>,
) -> Result<Response, Response> {
    let db = app_state.db();
    let student = load_student(db, student_id).await?;
    let user = load_auth_user(db, claims.sub).await?;

    let rubrics = scheme::applicable_rubrics(db, student.course.clone())
        .await
        .map_err(internal_error)?;

    let mut result = Vec::new();
    for rubric in rubrics {
        let criteria_list = scheme::applicable_criteria(db, rubric.id, &student.mode)
            .await
            .map_err(internal_error)?;
        if criteria_list.is_empty() {
            continue;
        }

        let criteria_ids: Vec<i64> = criteria_list.iter().map(|c| c.id).collect();
        let marks = student_mark::Entity::find()
            .filter(student_mark::Column::StudentId.eq(student.id))
            .filter(student_mark::Column::EvaluatorId.eq(user.id))
            .filter(student_mark::Column::CriteriaId.is_in(criteria_ids))
            .all(db)
            .await
            .map_err(internal_error)?;
        let by_criteria: HashMap<i64, f64> =
            marks.into_iter().map(|m| (m.criteria_id, m.mark)).collect();

        let grades: Vec<f64> = criteria_list
            .iter()
            .map(|c| by_criteria.get(&c.id).copied().unwrap_or(0.0))
            .collect();

        result.push(StudentGradesResponse {
            scheme: RubricSchemeResponse::new(rubric, criteria_list),
            grades,
        });
    }

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(result, "Grades fetched successfully")),
    )
        .into_response())
}

/// GET /grades/total-marks
///
/// Lists the materialized totals visible to the caller: coordinators and
/// admins see every student, supervisors and examiners only the students
/// they grade. Students without any non-zero mark have no row at all.
pub async fn get_total_marks(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Result<Response, Response> {
    let db = app_state.db();
    let user = load_auth_user(db, claims.sub).await?;

    let sees_all = user.admin
        || course_coordinator::Model::find_for_user(db, user.id)
            .await
            .map_err(internal_error)?
            .is_some();

    let grade_rows = student_grade::Entity::find()
        .all(db)
        .await
        .map_err(internal_error)?;

    let mut result = Vec::new();
    for row in grade_rows {
        let Some(student) = student::Model::get_by_id(db, row.student_id)
            .await
            .map_err(internal_error)?
        else {
            continue;
        };

        if !sees_all {
            let supervises = student.supervisor_id == Some(user.id);
            let examines = student::Model::has_evaluator(db, student.id, user.id)
                .await
                .map_err(internal_error)?;
            if !supervises && !examines {
                continue;
            }
        }

        let account = user::Model::get_by_id(db, student.user_id)
            .await
            .map_err(internal_error)?;
        let band = match row.grade_id {
            Some(grade_id) => grade::Entity::find_by_id(grade_id)
                .one(db)
                .await
                .map_err(internal_error)?,
            None => None,
        };

        result.push(TotalMarkResponse {
            id: row.id,
            student_id: student.id,
            student: account.map(|a| a.name).unwrap_or_default(),
            student_number: student.student_number,
            course: student.course,
            total_mark: row.total_mark,
            breakdown: row.breakdown,
            grade_letter: band.as_ref().map(|b| b.letter.clone()),
            grade_gpa: band.map(|b| b.gpa),
            updated_at: row.updated_at.to_rfc3339(),
        });
    }

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            result,
            "Total marks fetched successfully",
        )),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct SchemeListQuery {
    #[serde(default)]
    pub course: Option<Course>,
}

/// GET /grades/schemes?course=FYP1
///
/// The full rubric catalog (criteria unfiltered by mode) for coordinator
/// and admin screens, ordered by course then `steps`.
pub async fn list_marking_schemes(
    State(app_state): State<AppState>,
    Query(params): Query<SchemeListQuery>,
) -> Result<Response, Response> {
    let db = app_state.db();

    let mut query = rubric::Entity::find();
    if let Some(course) = params.course {
        query = query.filter(rubric::Column::Course.eq(course));
    }
    let rubrics = query
        .order_by_asc(rubric::Column::Course)
        .order_by_asc(rubric::Column::Steps)
        .all(db)
        .await
        .map_err(internal_error)?;

    let mut result = Vec::new();
    for rubric in rubrics {
        let criteria_list = criteria::Entity::find()
            .filter(criteria::Column::RubricId.eq(rubric.id))
            .order_by_asc(criteria::Column::Id)
            .all(db)
            .await
            .map_err(internal_error)?;
        result.push(RubricSchemeResponse::new(rubric, criteria_list));
    }

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            result,
            "Marking schemes fetched successfully",
        )),
    )
        .into_response())
}
