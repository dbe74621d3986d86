use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::grade::Model;
use sea_orm::{DatabaseConnection, DbErr};

pub struct GradeBandSeeder;

#[async_trait]
impl Seeder for GradeBandSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        for (letter, gpa, min_mark, max_mark) in [
            ("A+", 4.0, 90.0, 100.0),
            ("A", 4.0, 80.0, 89.9),
            ("A-", 3.7, 75.0, 79.9),
            ("B+", 3.3, 70.0, 74.9),
            ("B", 3.0, 65.0, 69.9),
            ("B-", 2.7, 60.0, 64.9),
            ("C+", 2.3, 55.0, 59.9),
            ("C", 2.0, 50.0, 54.9),
            ("D", 1.0, 40.0, 49.9),
            ("F", 0.0, 0.0, 39.9),
        ] {
            Model::create(db, letter, gpa, min_mark, max_mark).await?;
        }
        Ok(())
    }
}
