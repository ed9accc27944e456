//! Registration, login, and token handling.

use bazaar_integration_tests::TestApp;
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn register_login_and_fetch_profile() {
    let app = TestApp::spawn().await;

    let response = app.register("alice@example.com", "alice", "s3cretpass").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["email"], "alice@example.com");
    assert_eq!(user["username"], "alice");
    assert!(user["id"].is_i64());
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());

    let token = app.login_token("alice@example.com", "s3cretpass").await;

    let response = app
        .client
        .get(app.url("/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["email"], "alice@example.com");
    assert_eq!(me["id"], user["id"]);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = TestApp::spawn().await;

    let first = app.register("bob@example.com", "bob", "s3cretpass").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    // Same email, different username
    let second = app.register("bob@example.com", "robert", "s3cretpass").await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_rejects_invalid_input() {
    let app = TestApp::spawn().await;

    let bad_email = app.register("not-an-email", "carol", "s3cretpass").await;
    assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);

    let short_password = app.register("carol@example.com", "carol", "short").await;
    assert_eq!(short_password.status(), StatusCode::BAD_REQUEST);

    let short_username = app.register("carol@example.com", "cc", "s3cretpass").await;
    assert_eq!(short_username.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("dave@example.com", "dave", "s3cretpass").await;

    let wrong_password = app
        .client
        .post(app.url("/auth/login"))
        .json(&json!({ "email": "dave@example.com", "password": "wrongpass1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let unknown_email = app
        .client
        .post(app.url("/auth/login"))
        .json(&json!({ "email": "nobody@example.com", "password": "s3cretpass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    // A malformed email gets the same answer as a wrong password
    let malformed_email = app
        .client
        .post(app.url("/auth/login"))
        .json(&json!({ "email": "not-an-email", "password": "s3cretpass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(malformed_email.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = TestApp::spawn().await;

    let missing = app.client.get(app.url("/auth/me")).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = app
        .client
        .get(app.url("/auth/me"))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_is_accepted_as_query_parameter() {
    let app = TestApp::spawn().await;
    let token = app
        .register_and_login("erin@example.com", "erin", "s3cretpass")
        .await;

    let response = app
        .client
        .get(app.url(&format!("/auth/me?token={token}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["username"], "erin");
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = TestApp::spawn().await;

    let live = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(live.status(), StatusCode::OK);

    let ready = app
        .client
        .get(app.url("/health/ready"))
        .send()
        .await
        .unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
}
