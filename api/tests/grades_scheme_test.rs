mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use db::models::{
    criteria::{self, CriteriaMode},
    rubric::{self, PicRole, PicSet},
    student::Course,
};
use helpers::{app::make_test_app, data};
use serde_json::Value;
use serial_test::serial;
use tower::ServiceExt;

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
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
async fn scheme_requires_authentication() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let req = Request::builder()
        .method("GET")
        .uri(format!("/api/grades/scheme/{}", fx.student.id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn supervisor_gets_scheme_with_criteria() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let (token, _) = api::auth::generate_jwt(fx.supervisor.id, false);
    let response = app
        .clone()
        .oneshot(get_with_token(
            &format!("/api/grades/scheme/{}", fx.student.id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let schemes = json["data"].as_array().unwrap();
    assert_eq!(schemes.len(), 1);
    assert_eq!(schemes[0]["label"], "Proposal");
    assert_eq!(schemes[0]["course"], "FYP1");
    let criteria = schemes[0]["criteria"].as_array().unwrap();
    assert_eq!(criteria.len(), 2);
    assert_eq!(criteria[0]["label"], "Clarity");
    assert_eq!(criteria[0]["max_mark"], 10.0);
}

#[tokio::test]
#[serial]
async fn scheme_is_filtered_by_pic_role() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;
    let db = app_state.db();

    // An examiner-only rubric after the shared one.
    let viva = rubric::Model::create(
        db,
        "Viva",
        40.0,
        Course::Fyp1,
        2,
        PicSet::new([PicRole::Examiner]),
    )
    .await
    .unwrap();
    criteria::Model::create(db, viva.id, "Delivery", 100.0, 10.0, CriteriaMode::Both)
        .await
        .unwrap();

    let (token, _) = api::auth::generate_jwt(fx.supervisor.id, false);
    let response = app
        .clone()
        .oneshot(get_with_token(
            &format!("/api/grades/scheme/{}", fx.student.id),
            &token,
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    let labels: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Proposal"]);

    let (token, _) = api::auth::generate_jwt(fx.examiner.id, false);
    let response = app
        .clone()
        .oneshot(get_with_token(
            &format!("/api/grades/scheme/{}", fx.student.id),
            &token,
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    let labels: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Proposal", "Viva"]);
}

#[tokio::test]
#[serial]
async fn unrelated_caller_gets_403() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let (token, _) = api::auth::generate_jwt(fx.outsider.id, false);
    let response = app
        .clone()
        .oneshot(get_with_token(
            &format!("/api/grades/scheme/{}", fx.student.id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn unknown_student_gets_404() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let (token, _) = api::auth::generate_jwt(fx.supervisor.id, false);
    let response = app
        .clone()
        .oneshot(get_with_token("/api/grades/scheme/9999", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn catalog_listing_is_coordinator_only() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let (token, _) = api::auth::generate_jwt(fx.examiner.id, false);
    let response = app
        .clone()
        .oneshot(get_with_token("/api/grades/schemes", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let (token, _) = api::auth::generate_jwt(fx.coordinator.id, false);
    let response = app
        .clone()
        .oneshot(get_with_token("/api/grades/schemes?course=FYP1", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let schemes = json["data"].as_array().unwrap();
    assert_eq!(schemes.len(), 1);
    assert_eq!(schemes[0]["label"], "Proposal");
}
