use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202606100001_create_users::Migration),
            Box::new(migrations::m202606100002_create_students::Migration),
            Box::new(migrations::m202606100003_create_student_evaluators::Migration),
            Box::new(migrations::m202606100004_create_course_coordinators::Migration),
            Box::new(migrations::m202606180001_create_rubrics::Migration),
            Box::new(migrations::m202606180002_create_criteria::Migration),
            Box::new(migrations::m202607020001_create_student_marks::Migration),
            Box::new(migrations::m202607020002_create_grades::Migration),
            Box::new(migrations::m202607020003_create_student_grades::Migration),
        ]
    }
}
