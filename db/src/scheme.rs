//! Rubric catalog resolution and grading authorization.
//!
//! Answers "which rubrics and criteria apply to student X, and who may grade
//! them". All role checks used by the grading layer funnel through
//! [`can_grade`] / [`grading_roles`] so the supervisor/examiner/coordinator
//! rules live in exactly one place.

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use thiserror::Error;

use crate::models::{
    course_coordinator,
    criteria::{self, CriteriaMode},
    rubric::{self, PicRole},
    student::{self, Course, ProjectMode},
    user,
};

/// A rubric together with the criteria applicable to one student's mode,
/// in grading order.
#[derive(Debug, Clone)]
pub struct RubricScheme {
    pub rubric: rubric::Model,
    pub criteria: Vec<criteria::Model>,
}

#[derive(Debug, Error)]
pub enum SchemeError {
    /// The caller has no grading relationship to the student.
    #[error("User does not have permission to access this student's marking scheme")]
    NotPermitted,
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

/// All rubrics configured for a course, ascending by `steps`.
pub async fn applicable_rubrics<C: ConnectionTrait>(
    conn: &C,
    course: Course,
) -> Result<Vec<rubric::Model>, DbErr> {
    rubric::Entity::find()
        .filter(rubric::Column::Course.eq(course))
        .order_by_asc(rubric::Column::Steps)
        .all(conn)
        .await
}

/// The rubric's criteria that apply to the given project mode, in stable
/// (insertion) order.
pub async fn applicable_criteria<C: ConnectionTrait>(
    conn: &C,
    rubric_id: i64,
    mode: &ProjectMode,
) -> Result<Vec<criteria::Model>, DbErr> {
    criteria::Entity::find()
        .filter(criteria::Column::RubricId.eq(rubric_id))
        .filter(criteria::Column::Mode.is_in([CriteriaMode::Both, CriteriaMode::from(mode.clone())]))
        .order_by_asc(criteria::Column::Id)
        .all(conn)
        .await
}

/// The pic roles the user holds *with respect to this student*: supervisor
/// of this student, member of this student's evaluator panel, or course
/// coordinator whose scope covers the student's course.
pub async fn grading_roles<C: ConnectionTrait>(
    conn: &C,
    user: &user::Model,
    student: &student::Model,
) -> Result<Vec<PicRole>, DbErr> {
    let mut roles = Vec::new();

    if student.supervisor_id == Some(user.id) {
        roles.push(PicRole::Supervisor);
    }

    if student::Model::has_evaluator(conn, student.id, user.id).await? {
        roles.push(PicRole::Examiner);
    }

    // Coordinator appointments are not restricted to the coordinator role;
    // a supervisor may hold one too.
    if let Some(appointment) = course_coordinator::Model::find_for_user(conn, user.id).await? {
        if appointment.course.covers(&student.course) {
            roles.push(PicRole::CourseCoordinator);
        }
    }

    Ok(roles)
}

/// The single authorization predicate for grading: may `user` grade
/// `student` on `rubric`?
pub async fn can_grade<C: ConnectionTrait>(
    conn: &C,
    user: &user::Model,
    student: &student::Model,
    rubric: &rubric::Model,
) -> Result<bool, DbErr> {
    if user.admin {
        return Ok(true);
    }
    let roles = grading_roles(conn, user, student).await?;
    Ok(roles.iter().any(|role| rubric.pic.contains(*role)))
}

/// Resolves the marking scheme the requesting user may grade for a student.
///
/// Rubrics are filtered to the student's course and to the caller's roles
/// against each rubric's `pic` set, criteria to the student's mode; rubrics
/// left without criteria are dropped. Order is ascending `steps`.
///
/// A caller with no grading relationship gets [`SchemeError::NotPermitted`];
/// an empty result is reserved for "authorized, but nothing applies".
pub async fn resolve_scheme<C: ConnectionTrait>(
    conn: &C,
    student: &student::Model,
    user: &user::Model,
) -> Result<Vec<RubricScheme>, SchemeError> {
    let roles = if user.admin {
        vec![
            PicRole::Supervisor,
            PicRole::Examiner,
            PicRole::CourseCoordinator,
        ]
    } else {
        grading_roles(conn, user, student).await?
    };

    if roles.is_empty() {
        return Err(SchemeError::NotPermitted);
    }

    let mut schemes = Vec::new();
    for rubric in applicable_rubrics(conn, student.course.clone()).await? {
        if !roles.iter().any(|role| rubric.pic.contains(*role)) {
            continue;
        }
        let criteria = applicable_criteria(conn, rubric.id, &student.mode).await?;
        if criteria.is_empty() {
            continue;
        }
        schemes.push(RubricScheme { rubric, criteria });
    }

    Ok(schemes)
}
