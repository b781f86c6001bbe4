mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn user_lifecycle() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/users/", json!({"username": "bookworm", "email": "bookworm@example.com"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "User created successfully");
    let id = body["user"]["id"].as_str().unwrap().to_string();
    let created_at = body["user"]["created_at"].clone();

    let (status, user) = app
        .patch(&format!("/users/{id}"), json!({"email": "worm@example.org"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "bookworm");
    assert_eq!(user["email"], "worm@example.org");
    assert_eq!(user["created_at"], created_at);

    let (status, body) = app.get("/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().unwrap().len(), 1);

    let (status, body) = app.delete(&format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], format!("Deleted user {id}"));

    let (status, body) = app.get(&format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/users", json!({"username": "bookworm", "email": "not-an-email"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "email");
    assert!(app.users.is_empty().await);
}

#[tokio::test]
async fn delete_all_users() {
    let app = TestApp::new();
    app.post("/users/", json!({"username": "reader-one", "email": "one@example.com"}))
        .await;
    app.post("/users/", json!({"username": "reader-two", "email": "two@example.com"}))
        .await;

    let (status, body) = app.delete("/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Deleted all users");
    assert!(app.users.is_empty().await);
}
