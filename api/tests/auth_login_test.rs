mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use helpers::{app::make_test_app, data};
use serde_json::{Value, json};
use serial_test::serial;
use tower::ServiceExt;

fn login_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
#[serial]
async fn login_returns_token_and_user() {
    let (app, app_state) = make_test_app().await;
    let fx = data::seed_grading_fixture(app_state.db()).await;

    let response = app
        .clone()
        .oneshot(login_request(json!({
            "email": "sup@uni.edu",
            "password": data::PASSWORD,
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["success"], true);
    assert!(json["data"]["token"].as_str().unwrap().len() > 20);
    assert_eq!(json["data"]["user"]["id"], fx.supervisor.id);
    assert_eq!(json["data"]["user"]["role"], "supervisor");
    // The hash must never leak.
    assert!(json["data"]["user"].get("password_hash").is_none());
}

#[tokio::test]
#[serial]
async fn login_rejects_wrong_password() {
    let (app, app_state) = make_test_app().await;
    data::seed_grading_fixture(app_state.db()).await;

    let response = app
        .clone()
        .oneshot(login_request(json!({
            "email": "sup@uni.edu",
            "password": "not-the-password",
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn login_validates_the_payload() {
    let (app, _app_state) = make_test_app().await;

    let response = app
        .clone()
        .oneshot(login_request(json!({
            "email": "not-an-email",
            "password": "pw",
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("valid email address")
    );
}
