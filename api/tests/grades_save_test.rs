mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use db::models::student_grade;
use helpers::{app::make_test_app, data};
use serde_json::{Value, json};
use serial_test::serial;
use tower::ServiceExt;

fn save_request(student_id: i64, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/grades/save/{student_id}"))
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

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
async fn save_recomputes_and_exposes_the_total() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let (token, _) = api::auth::generate_jwt(fx.supervisor.id, false);
    let response = app
        .clone()
        .oneshot(save_request(
            fx.student.id,
            &token,
            json!({
                "user_id": fx.supervisor.id,
                "grades": [{ "scheme_id": fx.rubric.id, "grades": [8.0, 4.0] }],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Clarity 8/10 * 60% + Feasibility 4/5 * 40% = 0.8 → 0.8 * 30 = 24.0
    let response = app
        .clone()
        .oneshot(get_request("/api/grades/total-marks", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["total_mark"], 24.0);
    assert_eq!(rows[0]["breakdown"]["Proposal"], 24.0);
    assert_eq!(rows[0]["grade_letter"], "F");
    assert_eq!(rows[0]["student_number"], "U20001234");
}

#[tokio::test]
#[serial]
async fn both_roles_accumulate_through_the_api() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let (sup_token, _) = api::auth::generate_jwt(fx.supervisor.id, false);
    let (exa_token, _) = api::auth::generate_jwt(fx.examiner.id, false);

    for (token, user_id) in [(&sup_token, fx.supervisor.id), (&exa_token, fx.examiner.id)] {
        let response = app
            .clone()
            .oneshot(save_request(
                fx.student.id,
                token,
                json!({
                    "user_id": user_id,
                    "grades": [{ "scheme_id": fx.rubric.id, "grades": [8.0, 4.0] }],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Same rubric graded by both roles: contributions add up to 48.0 → "C".
    let response = app
        .clone()
        .oneshot(get_request("/api/grades/total-marks", &sup_token))
        .await
        .unwrap();
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows[0]["total_mark"], 48.0);
    assert_eq!(rows[0]["grade_letter"], "C");
    assert_eq!(rows[0]["grade_gpa"], 2.0);
}

#[tokio::test]
#[serial]
async fn out_of_range_mark_is_rejected_with_no_side_effects() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let (token, _) = api::auth::generate_jwt(fx.supervisor.id, false);
    let response = app
        .clone()
        .oneshot(save_request(
            fx.student.id,
            &token,
            json!({
                "user_id": fx.supervisor.id,
                "grades": [{ "scheme_id": fx.rubric.id, "grades": [15.0, 4.0] }],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("Clarity"));

    assert!(
        student_grade::Model::find_for_student(app_state.db(), fx.student.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[serial]
async fn cannot_submit_as_another_user() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let (token, _) = api::auth::generate_jwt(fx.examiner.id, false);
    let response = app
        .clone()
        .oneshot(save_request(
            fx.student.id,
            &token,
            json!({
                "user_id": fx.supervisor.id,
                "grades": [{ "scheme_id": fx.rubric.id, "grades": [8.0, 4.0] }],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn saved_marks_round_trip_zero_filled() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let (token, _) = api::auth::generate_jwt(fx.supervisor.id, false);
    // Grade only the first criterion; the second slot stays zero.
    let response = app
        .clone()
        .oneshot(save_request(
            fx.student.id,
            &token,
            json!({
                "user_id": fx.supervisor.id,
                "grades": [{ "scheme_id": fx.rubric.id, "grades": [8.0, 0.0] }],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/api/grades/student/{}", fx.student.id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["scheme"]["label"], "Proposal");
    assert_eq!(entries[0]["grades"], json!([8.0, 0.0]));

    // The examiner has not graded yet: all slots zero for them.
    let (exa_token, _) = api::auth::generate_jwt(fx.examiner.id, false);
    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/api/grades/student/{}", fx.student.id),
            &exa_token,
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["grades"], json!([0.0, 0.0]));
}

#[tokio::test]
#[serial]
async fn replaying_a_save_is_idempotent() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let (token, _) = api::auth::generate_jwt(fx.supervisor.id, false);
    let body = json!({
        "user_id": fx.supervisor.id,
        "grades": [{ "scheme_id": fx.rubric.id, "grades": [8.0, 4.0] }],
    });

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(save_request(fx.student.id, &token, body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let row = student_grade::Model::find_for_student(app_state.db(), fx.student.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.total_mark, 24.0);
}

#[tokio::test]
#[serial]
async fn empty_submission_is_a_validation_error() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let (token, _) = api::auth::generate_jwt(fx.supervisor.id, false);
    let response = app
        .clone()
        .oneshot(save_request(
            fx.student.id,
            &token,
            json!({ "user_id": fx.supervisor.id, "grades": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
