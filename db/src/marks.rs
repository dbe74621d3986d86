//! The mark store: validated, transactional writes of raw per-criterion
//! marks, scoped to one evaluator's grading session for one student.
//!
//! Marks are replaced wholesale per (student, evaluator, rubric) on every
//! save, so replaying a submission is a no-op in effect and two evaluators
//! never touch each other's rows.

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use thiserror::Error;

use crate::models::{
    criteria, rubric, student,
    student_mark,
    user::{self, Role},
};
use crate::{aggregate, scheme};

/// One rubric's worth of raw marks, aligned to the applicable criteria in
/// their stable order. A zero mark means "ungraded" and is not persisted.
#[derive(Debug, Clone)]
pub struct GradeEntry {
    pub scheme_id: i64,
    pub grades: Vec<f64>,
}

#[derive(Debug, Error)]
pub enum GradingError {
    #[error("Student {0} not found")]
    StudentNotFound(i64),
    #[error("Grader {0} not found")]
    GraderNotFound(i64),
    /// Malformed submission: bad scheme id, length mismatch, mark out of
    /// range. The message names the offending rubric/criterion.
    #[error("{0}")]
    Validation(String),
    /// The grader's roles do not cover the rubric being written.
    #[error("{0}")]
    NotPermitted(String),
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

/// Replaces the grader's marks for one rubric.
///
/// Validates the array length against the mode-filtered criteria and every
/// mark against `[0, max_mark]` before touching any row; then deletes the
/// grader's existing marks for those criteria and inserts the non-zero ones.
/// Call on a transaction handle — a returned error must abort the caller's
/// transaction to keep the all-or-nothing guarantee.
pub async fn replace_marks<C: ConnectionTrait>(
    conn: &C,
    student: &student::Model,
    grader: &user::Model,
    rubric: &rubric::Model,
    marks: &[f64],
) -> Result<(), GradingError> {
    let criteria_list = scheme::applicable_criteria(conn, rubric.id, &student.mode).await?;

    if marks.len() != criteria_list.len() {
        return Err(GradingError::Validation(format!(
            "Invalid number of grades for rubric {}: expected {}, got {}",
            rubric.label,
            criteria_list.len(),
            marks.len()
        )));
    }

    for (criteria, &mark) in criteria_list.iter().zip(marks) {
        if !(0.0..=criteria.max_mark).contains(&mark) {
            return Err(GradingError::Validation(format!(
                "Mark {} for {} is out of range (0 to {})",
                mark, criteria.label, criteria.max_mark
            )));
        }
    }

    // Clear the grader's rows for the whole rubric, not just the
    // mode-applicable criteria, so stale rows from a mode change never
    // linger.
    let rubric_criteria_ids: Vec<i64> = criteria::Entity::find()
        .filter(criteria::Column::RubricId.eq(rubric.id))
        .select_only()
        .column(criteria::Column::Id)
        .into_tuple()
        .all(conn)
        .await?;
    student_mark::Entity::delete_many()
        .filter(student_mark::Column::StudentId.eq(student.id))
        .filter(student_mark::Column::EvaluatorId.eq(grader.id))
        .filter(student_mark::Column::CriteriaId.is_in(rubric_criteria_ids))
        .exec(conn)
        .await?;

    let now = chrono::Utc::now();
    for (criteria, &mark) in criteria_list.iter().zip(marks) {
        if mark == 0.0 {
            // Zero means "ungraded": the slot stays empty.
            continue;
        }
        student_mark::ActiveModel {
            id: NotSet,
            student_id: Set(student.id),
            criteria_id: Set(criteria.id),
            evaluator_id: Set(grader.id),
            mark: Set(mark),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await?;
    }

    Ok(())
}

/// Applies a full grading submission for one student in a single
/// transaction: per rubric, authorize and replace the grader's marks; then
/// recompute the student's materialized grade before committing.
///
/// Readers therefore never observe a `student_grades` row that is stale
/// relative to the marks that produced it, and a failure anywhere leaves
/// the store untouched.
pub async fn save_grades(
    db: &DatabaseConnection,
    student_id: i64,
    grader_id: i64,
    entries: &[GradeEntry],
) -> Result<(), GradingError> {
    let student = student::Model::get_by_id(db, student_id)
        .await?
        .ok_or(GradingError::StudentNotFound(student_id))?;
    let grader = user::Model::get_by_id(db, grader_id)
        .await?
        .ok_or(GradingError::GraderNotFound(grader_id))?;
    if grader.role == Role::Student {
        return Err(GradingError::NotPermitted(
            "Students cannot submit grades".into(),
        ));
    }

    let txn = db.begin().await.map_err(GradingError::Db)?;

    for entry in entries {
        let rubric = rubric::Entity::find_by_id(entry.scheme_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                GradingError::Validation(format!("Invalid scheme id {}", entry.scheme_id))
            })?;
        if rubric.course != student.course {
            return Err(GradingError::Validation(format!(
                "Rubric {} does not belong to course {}",
                rubric.label, student.course
            )));
        }
        if !scheme::can_grade(&txn, &grader, &student, &rubric).await? {
            return Err(GradingError::NotPermitted(format!(
                "{} is not allowed to grade rubric {}",
                grader.name, rubric.label
            )));
        }

        replace_marks(&txn, &student, &grader, &rubric, &entry.grades).await?;
    }

    // Recompute inside the same transaction (marks are re-read from the
    // transaction, not from any snapshot).
    aggregate::recompute_student_grade(&txn, &student).await?;

    txn.commit().await.map_err(GradingError::Db)?;
    Ok(())
}
