use db::models::{
    course_coordinator::{self, CoordinatorScope},
    criteria::{self, CriteriaMode},
    grade,
    rubric::{self, PicRole, PicSet},
    student::{self, Course, ProjectMode},
    user::{self, Role},
};
use sea_orm::DatabaseConnection;

pub const PASSWORD: &str = "password123";

/// A complete grading setup: one FYP1 development student with a
/// supervisor, one panel examiner, a coordinator, an unrelated evaluator,
/// a two-criteria "Proposal" rubric (supervisor + examiner) and the usual
/// grade bands.
pub struct GradingFixture {
    pub student: student::Model,
    pub supervisor: user::Model,
    pub examiner: user::Model,
    pub coordinator: user::Model,
    pub outsider: user::Model,
    pub rubric: rubric::Model,
    pub criteria: Vec<criteria::Model>,
}

pub async fn seed_grading_fixture(db: &DatabaseConnection) -> GradingFixture {
    let supervisor = user::Model::create(db, "sup@uni.edu", "Sup Visor", Role::Supervisor, PASSWORD, false)
        .await
        .unwrap();
    let examiner = user::Model::create(db, "exa@uni.edu", "Exa Miner", Role::Examiner, PASSWORD, false)
        .await
        .unwrap();
    let coordinator = user::Model::create(
        db,
        "coord@uni.edu",
        "Co Ordinator",
        Role::CourseCoordinator,
        PASSWORD,
        false,
    )
    .await
    .unwrap();
    course_coordinator::Model::create(db, coordinator.id, CoordinatorScope::Both)
        .await
        .unwrap();
    let outsider = user::Model::create(
        db,
        "outsider@uni.edu",
        "Out Sider",
        Role::Examiner,
        PASSWORD,
        false,
    )
    .await
    .unwrap();

    let account = user::Model::create(db, "stud@uni.edu", "Stu Dent", Role::Student, PASSWORD, false)
        .await
        .unwrap();
    let student = student::Model::create(
        db,
        account.id,
        "U20001234",
        Course::Fyp1,
        ProjectMode::Development,
        Some(supervisor.id),
    )
    .await
    .unwrap();
    student::Model::add_evaluator(db, student.id, examiner.id)
        .await
        .unwrap();

    let rubric = rubric::Model::create(
        db,
        "Proposal",
        30.0,
        Course::Fyp1,
        1,
        PicSet::new([PicRole::Supervisor, PicRole::Examiner]),
    )
    .await
    .unwrap();
    let mut criteria_list = Vec::new();
    for (label, weight, max) in [("Clarity", 60.0, 10.0), ("Feasibility", 40.0, 5.0)] {
        criteria_list.push(
            criteria::Model::create(db, rubric.id, label, weight, max, CriteriaMode::Both)
                .await
                .unwrap(),
        );
    }

    grade::Model::create(db, "A", 4.0, 75.0, 100.0).await.unwrap();
    grade::Model::create(db, "B", 3.0, 50.0, 74.9).await.unwrap();
    grade::Model::create(db, "C", 2.0, 25.0, 49.9).await.unwrap();
    grade::Model::create(db, "F", 0.0, 0.0, 24.9).await.unwrap();

    GradingFixture {
        student,
        supervisor,
        examiner,
        coordinator,
        outsider,
        rubric,
        criteria: criteria_list,
    }
}
