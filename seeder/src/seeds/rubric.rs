use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::criteria::{CriteriaMode, Model as CriteriaModel};
use db::models::rubric::{Model as RubricModel, PicRole, PicSet};
use db::models::student::Course;
use sea_orm::{DatabaseConnection, DbErr};

pub struct RubricSeeder;

struct CriteriaSpec(&'static str, f64, f64, CriteriaMode);

async fn seed_rubric(
    db: &DatabaseConnection,
    label: &str,
    weightage: f64,
    course: Course,
    steps: i32,
    pic: PicSet,
    criteria: &[CriteriaSpec],
) -> Result<(), DbErr> {
    let rubric = RubricModel::create(db, label, weightage, course, steps, pic).await?;
    for CriteriaSpec(label, weightage, max_mark, mode) in criteria {
        CriteriaModel::create(db, rubric.id, label, *weightage, *max_mark, mode.clone()).await?;
    }
    Ok(())
}

#[async_trait]
impl Seeder for RubricSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        use CriteriaMode::*;
        use PicRole::*;

        // FYP1: proposal and interim stages, supervisor-heavy.
        seed_rubric(
            db,
            "Proposal",
            20.0,
            Course::Fyp1,
            1,
            PicSet::new([Supervisor]),
            &[
                CriteriaSpec("Problem Statement", 40.0, 10.0, Both),
                CriteriaSpec("Objectives & Scope", 30.0, 10.0, Both),
                CriteriaSpec("Feasibility", 30.0, 10.0, Both),
            ],
        )
        .await?;
        seed_rubric(
            db,
            "Interim Presentation",
            30.0,
            Course::Fyp1,
            2,
            PicSet::new([Supervisor, Examiner]),
            &[
                CriteriaSpec("Delivery", 30.0, 10.0, Both),
                CriteriaSpec("Prototype Progress", 40.0, 10.0, Development),
                CriteriaSpec("Methodology", 40.0, 10.0, Research),
                CriteriaSpec("Q&A", 30.0, 10.0, Both),
            ],
        )
        .await?;
        seed_rubric(
            db,
            "Interim Report",
            50.0,
            Course::Fyp1,
            3,
            PicSet::new([Supervisor]),
            &[
                CriteriaSpec("Literature Review", 30.0, 20.0, Both),
                CriteriaSpec("Design", 40.0, 20.0, Development),
                CriteriaSpec("Experimental Plan", 40.0, 20.0, Research),
                CriteriaSpec("Writing Quality", 30.0, 20.0, Both),
            ],
        )
        .await?;

        // FYP2: final deliverables, examiner-heavy.
        seed_rubric(
            db,
            "Final Demo",
            40.0,
            Course::Fyp2,
            1,
            PicSet::new([Supervisor, Examiner]),
            &[
                CriteriaSpec("Functionality", 50.0, 10.0, Development),
                CriteriaSpec("Results & Analysis", 50.0, 10.0, Research),
                CriteriaSpec("Presentation", 50.0, 10.0, Both),
            ],
        )
        .await?;
        seed_rubric(
            db,
            "Dissertation",
            40.0,
            Course::Fyp2,
            2,
            PicSet::new([Supervisor]),
            &[
                CriteriaSpec("Content", 60.0, 25.0, Both),
                CriteriaSpec("Structure & Style", 40.0, 25.0, Both),
            ],
        )
        .await?;
        seed_rubric(
            db,
            "Viva",
            20.0,
            Course::Fyp2,
            3,
            PicSet::new([Examiner, CourseCoordinator]),
            &[
                CriteriaSpec("Understanding", 60.0, 10.0, Both),
                CriteriaSpec("Defence", 40.0, 10.0, Both),
            ],
        )
        .await?;

        Ok(())
    }
}
