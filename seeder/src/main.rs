use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    grade_band::GradeBandSeeder, mark::MarkSeeder, rubric::RubricSeeder,
    student::StudentSeeder, user::UserSeeder,
};

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let db = db::connect().await;

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(StudentSeeder), "Student"),
        (Box::new(RubricSeeder), "Rubric"),
        (Box::new(GradeBandSeeder), "GradeBand"),
        (Box::new(MarkSeeder), "Mark"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
