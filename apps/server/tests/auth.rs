mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn sign_up_sign_in_and_access_protected_route() {
    let app = common::spawn_app().await;

    // Unauthorized request should fail
    let (status, _) = app.request(Method::GET, "/api/v1/recipes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/sign-up",
            None,
            Some(json!({ "email": "Cook@Example.com", "password": "secret-pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["user"]["email"], "cook@example.com");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/sign-in",
            None,
            Some(json!({ "email": "cook@example.com", "password": "secret-pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["accessToken"].as_str().unwrap().to_string();

    let (status, body) = app
        .request(Method::GET, "/api/v1/recipes", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = app
        .request(Method::GET, "/api/v1/auth/status", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["email"], "cook@example.com");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = common::spawn_app().await;
    app.sign_up("cook@example.com").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/sign-in",
            None,
            Some(json!({ "email": "cook@example.com", "password": "not-the-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/sign-in",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "secret-pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = common::spawn_app().await;
    app.sign_up("cook@example.com").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/sign-up",
            None,
            Some(json!({ "email": "COOK@example.com", "password": "another-pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn sign_up_validates_input() {
    let app = common::spawn_app().await;

    for payload in [
        json!({ "email": "not-an-email", "password": "secret-pw" }),
        json!({ "email": "cook@example.com", "password": "short" }),
    ] {
        let (status, _) = app
            .request(Method::POST, "/api/v1/auth/sign-up", None, Some(payload))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn invalid_token_is_rejected() {
    let app = common::spawn_app().await;

    let (status, _) = app
        .request(Method::GET, "/api/v1/recipes", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .request(Method::GET, "/api/v1/auth/status", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);
}

#[tokio::test]
async fn sign_out_revokes_token_and_closes_sessions() {
    let app = common::spawn_app().await;
    let token = app.sign_up("cook@example.com").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/search/sessions",
            Some(&token),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let session_id = body["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(Method::POST, "/api/v1/auth/sign-out", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.state.search_sessions.is_empty());

    let (status, _) = app
        .request(Method::GET, "/api/v1/recipes", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .request(Method::GET, "/api/v1/auth/status", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], false);

    // Signing in again works and the old session stays gone.
    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/sign-in",
            None,
            Some(json!({ "email": "cook@example.com", "password": "secret-pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let fresh = body["accessToken"].as_str().unwrap().to_string();
    let (status, _) = app
        .request(
            Method::GET,
            &format!("/api/v1/search/sessions/{session_id}"),
            Some(&fresh),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sign_out_requires_a_token() {
    let app = common::spawn_app().await;
    let (status, _) = app
        .request(Method::POST, "/api/v1/auth/sign-out", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
