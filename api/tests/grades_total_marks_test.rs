mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use db::marks::{self, GradeEntry};
use db::models::{
    student::{self, Course, ProjectMode},
    user::{self, Role},
};
use helpers::{app::make_test_app, data};
use serde_json::Value;
use serial_test::serial;
use tower::ServiceExt;

fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
#[serial]
async fn visibility_follows_grading_relationships() {
    let (app, app_state) = make_test_app().await;
    let db = app_state.db();
    let fx = data::seed_grading_fixture(db).await;

    // A second student supervised by someone else, already graded.
    let other_supervisor = user::Model::create(
        db,
        "sup2@uni.edu",
        "Sup Two",
        Role::Supervisor,
        data::PASSWORD,
        false,
    )
    .await
    .unwrap();
    let account = user::Model::create(
        db,
        "stud2@uni.edu",
        "Stu Two",
        Role::Student,
        data::PASSWORD,
        false,
    )
    .await
    .unwrap();
    let other_student = student::Model::create(
        db,
        account.id,
        "U20005678",
        Course::Fyp1,
        ProjectMode::Development,
        Some(other_supervisor.id),
    )
    .await
    .unwrap();

    marks::save_grades(
        db,
        fx.student.id,
        fx.supervisor.id,
        &[GradeEntry {
            scheme_id: fx.rubric.id,
            grades: vec![8.0, 4.0],
        }],
    )
    .await
    .unwrap();
    marks::save_grades(
        db,
        other_student.id,
        other_supervisor.id,
        &[GradeEntry {
            scheme_id: fx.rubric.id,
            grades: vec![10.0, 5.0],
        }],
    )
    .await
    .unwrap();

    // The first supervisor sees only their own student.
    let (token, _) = api::auth::generate_jwt(fx.supervisor.id, false);
    let response = app
        .clone()
        .oneshot(get_request("/api/grades/total-marks", &token))
        .await
        .unwrap();
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["student_number"], "U20001234");

    // The coordinator sees both.
    let (token, _) = api::auth::generate_jwt(fx.coordinator.id, false);
    let response = app
        .clone()
        .oneshot(get_request("/api/grades/total-marks", &token))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    // An evaluator with no relationship sees an empty list.
    let (token, _) = api::auth::generate_jwt(fx.outsider.id, false);
    let response = app
        .clone()
        .oneshot(get_request("/api/grades/total-marks", &token))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[serial]
async fn ungraded_students_have_no_row() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let (token, _) = api::auth::generate_jwt(fx.coordinator.id, false);
    let response = app
        .clone()
        .oneshot(get_request("/api/grades/total-marks", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[serial]
async fn totals_outside_every_band_have_null_grade() {
    let (app, app_state) = make_test_app().await;
    let db = app_state.db();
    let fx = data::seed_grading_fixture(db).await;

    // Leave a gap: remove the F band so 24.0 matches nothing.
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    db::models::grade::Entity::delete_many()
        .filter(db::models::grade::Column::Letter.eq("F"))
        .exec(db)
        .await
        .unwrap();

    marks::save_grades(
        db,
        fx.student.id,
        fx.supervisor.id,
        &[GradeEntry {
            scheme_id: fx.rubric.id,
            grades: vec![8.0, 4.0],
        }],
    )
    .await
    .unwrap();

    let (token, _) = api::auth::generate_jwt(fx.coordinator.id, false);
    let response = app
        .clone()
        .oneshot(get_request("/api/grades/total-marks", &token))
        .await
        .unwrap();
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows[0]["total_mark"], 24.0);
    assert!(rows[0]["grade_letter"].is_null());
    assert!(rows[0]["grade_gpa"].is_null());
}
