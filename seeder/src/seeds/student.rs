use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::student::{Course, Model as StudentModel, ProjectMode};
use db::models::user::{Model as UserModel, Role};
use fake::{Fake, faker::name::en::Name};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

pub struct StudentSeeder;

#[async_trait]
impl Seeder for StudentSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let supervisors = db::models::User::find()
            .filter(db::models::user::Column::Role.eq(Role::Supervisor))
            .all(db)
            .await?;
        let examiners = db::models::User::find()
            .filter(db::models::user::Column::Role.eq(Role::Examiner))
            .all(db)
            .await?;

        for i in 0..10usize {
            let name: String = Name().fake();
            let email = format!("u{:08}@students.example.com", 20000000 + i);
            let account =
                UserModel::create(db, &email, &name, Role::Student, "password123", false).await?;

            let course = if i % 2 == 0 { Course::Fyp1 } else { Course::Fyp2 };
            let mode = if fastrand::bool() {
                ProjectMode::Development
            } else {
                ProjectMode::Research
            };
            let supervisor = &supervisors[i % supervisors.len()];

            let student = StudentModel::create(
                db,
                account.id,
                &format!("U{:08}", 20000000 + i),
                course,
                mode,
                Some(supervisor.id),
            )
            .await?;

            // Two-examiner panel per student
            for offset in 0..2 {
                let examiner = &examiners[(i + offset) % examiners.len()];
                StudentModel::add_evaluator(db, student.id, examiner.id).await?;
            }
        }

        Ok(())
    }
}
