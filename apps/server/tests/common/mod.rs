#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use recipesaver_server::{api::app_router, build_state, config::Config, AppState};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    // Keeps the database and upload directory alive for the test.
    pub tmp: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = Config::for_data_dir(tmp.path());
    config.search_debounce = Duration::from_millis(50);
    config.max_upload_bytes = 1024;
    let state = build_state(&config).await.unwrap();
    let router = app_router(state.clone(), &config);
    TestApp { router, state, tmp }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    /// Signs up a fresh user and returns the access token.
    pub async fn sign_up(&self, email: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/auth/sign-up",
                None,
                Some(serde_json::json!({ "email": email, "password": "secret-pw" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "sign-up failed: {body}");
        body["accessToken"].as_str().unwrap().to_string()
    }

    pub async fn create_recipe(&self, token: &str, recipe: Value) -> Value {
        let (status, body) = self
            .request(Method::POST, "/api/v1/recipes", Some(token), Some(recipe))
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {body}");
        body
    }
}
