//! The aggregation engine: computes a student's total mark and per-rubric
//! breakdown from the rubric catalog and the mark store, and keeps the
//! materialized `student_grades` row in sync with the marks that produced it.
//!
//! Normalization is two-stage. A raw mark becomes a fraction of its
//! criterion's weight (`mark / max_mark * weightage / 100`); those fractions
//! sum into a rubric score in `[0, 1]` per contributing role, and the
//! rubric's own weightage scales that score into the 0-100 course total.
//! Supervisor and examiner contributions are independent and additive —
//! only marks from the same role are averaged together.

use std::collections::{BTreeMap, HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, Set,
};

use crate::models::{
    grade,
    rubric::PicRole,
    student,
    student_grade::{self, Breakdown},
    student_mark,
};
use crate::scheme;

/// Result of a full aggregation pass for one student.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedTotal {
    /// Aggregate score in the 0-100 space, rounded to one decimal.
    pub total: f64,
    /// Rubric label → contribution, each rounded to two decimals.
    pub breakdown: BTreeMap<String, f64>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fraction of the maximum, guarded against a misconfigured `max_mark`.
fn fraction_of(mark: f64, max_mark: f64) -> f64 {
    if max_mark <= 0.0 { 0.0 } else { mark / max_mark }
}

fn mean(marks: &[f64]) -> f64 {
    marks.iter().sum::<f64>() / marks.len() as f64
}

/// Computes the total mark and per-rubric breakdown for a student.
///
/// Marks are read fresh from `conn` — callers recomputing after a mutation
/// must pass the mutating transaction so the result reflects exactly the
/// rows being committed. Criteria with no marks from an applicable role
/// contribute zero; partial grading is a normal state.
pub async fn compute_student_total<C: ConnectionTrait>(
    conn: &C,
    student: &student::Model,
) -> Result<ComputedTotal, DbErr> {
    let rubrics = scheme::applicable_rubrics(conn, student.course.clone()).await?;

    let evaluator_ids: HashSet<i64> = student::Model::evaluator_ids(conn, student.id)
        .await?
        .into_iter()
        .collect();

    // One pass over the student's stored marks, grouped per criterion.
    let all_marks = student_mark::Entity::find()
        .filter(student_mark::Column::StudentId.eq(student.id))
        .all(conn)
        .await?;
    let mut marks_by_criteria: HashMap<i64, Vec<student_mark::Model>> = HashMap::new();
    for mark in all_marks {
        marks_by_criteria
            .entry(mark.criteria_id)
            .or_default()
            .push(mark);
    }

    let mut total = 0.0;
    let mut breakdown = BTreeMap::new();

    for rubric in rubrics {
        let criteria_list = scheme::applicable_criteria(conn, rubric.id, &student.mode).await?;

        // Fraction in [0, 1] per contributing role, before rubric weighting.
        let mut rubric_score = 0.0;
        for criteria in &criteria_list {
            let marks = marks_by_criteria
                .get(&criteria.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            // A stored zero is legacy "ungraded" data and never joins an
            // average.
            let examiner_marks: Vec<f64> = marks
                .iter()
                .filter(|m| m.mark != 0.0 && evaluator_ids.contains(&m.evaluator_id))
                .map(|m| m.mark)
                .collect();
            let supervisor_marks: Vec<f64> = marks
                .iter()
                .filter(|m| m.mark != 0.0 && student.supervisor_id == Some(m.evaluator_id))
                .map(|m| m.mark)
                .collect();

            if !examiner_marks.is_empty() && rubric.pic.contains(PicRole::Examiner) {
                rubric_score += fraction_of(mean(&examiner_marks), criteria.max_mark)
                    * criteria.weightage
                    / 100.0;
            }
            if !supervisor_marks.is_empty() && rubric.pic.contains(PicRole::Supervisor) {
                rubric_score += fraction_of(mean(&supervisor_marks), criteria.max_mark)
                    * criteria.weightage
                    / 100.0;
            }
        }

        total += rubric_score * rubric.weightage;
        breakdown.insert(rubric.label.clone(), round2(rubric_score * rubric.weightage));
    }

    Ok(ComputedTotal {
        total: round1(total),
        breakdown,
    })
}

/// Synchronizes the materialized `student_grades` row with the mark store.
///
/// Run inside the same transaction as the mark mutation that triggered it.
/// With no non-zero marks left the row is deleted — "no grade" is absence,
/// not a zero value. Otherwise the total is recomputed, classified into a
/// band and upserted.
pub async fn recompute_student_grade<C: ConnectionTrait>(
    conn: &C,
    student: &student::Model,
) -> Result<Option<student_grade::Model>, DbErr> {
    let graded_marks = student_mark::Entity::find()
        .filter(student_mark::Column::StudentId.eq(student.id))
        .filter(student_mark::Column::Mark.ne(0.0))
        .count(conn)
        .await?;

    if graded_marks == 0 {
        student_grade::Entity::delete_many()
            .filter(student_grade::Column::StudentId.eq(student.id))
            .exec(conn)
            .await?;
        return Ok(None);
    }

    let computed = compute_student_total(conn, student).await?;
    let band = grade::Model::classify(conn, computed.total).await?;
    tracing::debug!(
        student = student.id,
        total = computed.total,
        band = band.as_ref().map(|b| b.letter.as_str()),
        "Recomputed student grade"
    );
    let now = chrono::Utc::now();

    let model = match student_grade::Model::find_for_student(conn, student.id).await? {
        Some(existing) => {
            let mut active = existing.into_active_model();
            active.total_mark = Set(computed.total);
            active.grade_id = Set(band.map(|b| b.id));
            active.breakdown = Set(Breakdown(computed.breakdown));
            active.updated_at = Set(now);
            active.update(conn).await?
        }
        None => {
            student_grade::ActiveModel {
                id: NotSet,
                student_id: Set(student.id),
                total_mark: Set(computed.total),
                grade_id: Set(band.map(|b| b.id)),
                breakdown: Set(Breakdown(computed.breakdown)),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(conn)
            .await?
        }
    };

    Ok(Some(model))
}
