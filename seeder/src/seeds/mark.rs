use crate::seed::Seeder;
use async_trait::async_trait;
use db::marks::{GradeEntry, save_grades};
use db::models::student::Model as StudentModel;
use db::models::user::Model as UserModel;
use db::scheme;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

pub struct MarkSeeder;

/// Grades a handful of students through the real save path, so the demo
/// database comes up with recomputed totals and grade bands in place.
#[async_trait]
impl Seeder for MarkSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let students = db::models::Student::find().all(db).await?;

        for student in students.iter().take(6) {
            let mut graders: Vec<UserModel> = Vec::new();
            if let Some(supervisor_id) = student.supervisor_id {
                if let Some(supervisor) = UserModel::get_by_id(db, supervisor_id).await? {
                    graders.push(supervisor);
                }
            }
            for evaluator_id in StudentModel::evaluator_ids(db, student.id).await? {
                if let Some(examiner) = UserModel::get_by_id(db, evaluator_id).await? {
                    graders.push(examiner);
                }
            }

            for grader in graders {
                let schemes = match scheme::resolve_scheme(db, student, &grader).await {
                    Ok(schemes) => schemes,
                    Err(scheme::SchemeError::NotPermitted) => continue,
                    Err(scheme::SchemeError::Db(e)) => return Err(e),
                };

                let entries: Vec<GradeEntry> = schemes
                    .iter()
                    .map(|s| GradeEntry {
                        scheme_id: s.rubric.id,
                        grades: s
                            .criteria
                            .iter()
                            // Random mark in the upper half of the range.
                            .map(|c| (c.max_mark / 2.0) + fastrand::f64() * (c.max_mark / 2.0))
                            .collect(),
                    })
                    .collect();
                if entries.is_empty() {
                    continue;
                }

                save_grades(db, student.id, grader.id, &entries)
                    .await
                    .map_err(|e| DbErr::Custom(format!("Mark seeding failed: {e}")))?;
            }
        }

        Ok(())
    }
}
