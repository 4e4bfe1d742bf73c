mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};

const BOUNDARY: &str = "recipe-saver-boundary";

fn multipart_request(token: &str, field: &str, file_name: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/images")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn upload_returns_public_url_and_serves_file() {
    let app = common::spawn_app().await;
    let token = app.sign_up("cook@example.com").await;

    let (status, body) = app
        .send(multipart_request(&token, "file", "cake.PNG", b"png-bytes"))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:8080/images/"));
    assert!(url.ends_with(".png"));

    let path = url.trim_start_matches("http://localhost:8080");
    let (status, served) = app.request(Method::GET, path, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, "png-bytes");
}

#[tokio::test]
async fn empty_upload_is_rejected() {
    let app = common::spawn_app().await;
    let token = app.sign_up("cook@example.com").await;

    let (status, _) = app
        .send(multipart_request(&token, "file", "empty.png", b""))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let app = common::spawn_app().await;
    let token = app.sign_up("cook@example.com").await;

    let (status, _) = app
        .send(multipart_request(&token, "photo", "cake.png", b"png-bytes"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = common::spawn_app().await;
    let token = app.sign_up("cook@example.com").await;

    let (status, _) = app
        .send(multipart_request(&token, "file", "big.png", &vec![7u8; 4096]))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn upload_requires_authentication() {
    let app = common::spawn_app().await;
    let mut request = multipart_request("garbage", "file", "cake.png", b"png-bytes");
    request.headers_mut().remove(header::AUTHORIZATION);

    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
