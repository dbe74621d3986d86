use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::course_coordinator::{self, CoordinatorScope};
use db::models::user::{Model, Role};
use fake::{Fake, faker::internet::en::SafeEmail, faker::name::en::Name};
use sea_orm::{DatabaseConnection, DbErr};

pub struct UserSeeder;

#[async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        // Fixed admin (also the FYP coordinator for both courses)
        let admin = Model::create(
            db,
            "admin@example.com",
            "Admin",
            Role::CourseCoordinator,
            "password123",
            true,
        )
        .await?;
        course_coordinator::Model::create(db, admin.id, CoordinatorScope::Both).await?;

        // Fixed supervisor and examiner for predictable logins
        Model::create(
            db,
            "supervisor@example.com",
            "Main Supervisor",
            Role::Supervisor,
            "password123",
            false,
        )
        .await?;
        Model::create(
            db,
            "examiner@example.com",
            "Main Examiner",
            Role::Examiner,
            "password123",
            false,
        )
        .await?;

        // Random supervisors and examiners
        for _ in 0..5 {
            let email: String = SafeEmail().fake();
            let name: String = Name().fake();
            Model::create(db, &email, &name, Role::Supervisor, "password123", false).await?;
        }
        for _ in 0..5 {
            let email: String = SafeEmail().fake();
            let name: String = Name().fake();
            Model::create(db, &email, &name, Role::Examiner, "password123", false).await?;
        }

        Ok(())
    }
}
