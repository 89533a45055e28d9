mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use common::*;

const LIMIT: usize = 4096;

#[tokio::test]
async fn test_static_asset_is_served_with_headers() {
    let (app, config) = offline_app(LIMIT);
    std::fs::write(asset_path(&config, "p1.jpeg"), b"jpeg-bytes").unwrap();

    let request = Request::builder()
        .uri("/assets/p1.jpeg")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers["cross-origin-resource-policy"], "cross-origin");
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
    assert!(headers["content-security-policy"]
        .to_str()
        .unwrap()
        .starts_with("default-src 'self'"));

    let body = to_bytes(response.into_body(), LIMIT).await.unwrap();
    assert_eq!(&body[..], b"jpeg-bytes");
}

#[tokio::test]
async fn test_unknown_route_carries_pipeline_headers() {
    let (app, _config) = offline_app(LIMIT);

    let response = app
        .oneshot(get_request("/definitely/not/here", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["cross-origin-resource-policy"], "cross-origin");
    assert_eq!(response.headers()["referrer-policy"], "no-referrer");
}

#[tokio::test]
async fn test_cors_preflight_is_answered() {
    let (app, _config) = offline_app(LIMIT);

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/posts")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_json_body_exactly_at_limit_reaches_handler() {
    let (app, _config) = offline_app(LIMIT);

    // The cap is inclusive: only bodies longer than the limit are refused
    let base = json!({ "email": "a@example.com", "password": "" }).to_string();
    let body = json!({
        "email": "a@example.com",
        "password": "x".repeat(LIMIT - base.len()),
    });
    assert_eq!(body.to_string().len(), LIMIT);

    let response = app
        .oneshot(json_request("POST", "/auth/login", &body, None))
        .await
        .unwrap();

    // The handler ran and failed on the unreachable database
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["message"], "Login failed");
}

#[tokio::test]
async fn test_json_body_over_limit_is_rejected() {
    let (app, _config) = offline_app(LIMIT);
    let body = json!({
        "email": "a@example.com",
        "password": "x".repeat(LIMIT),
    });

    let response = app
        .oneshot(json_request("POST", "/auth/login", &body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_urlencoded_body_over_limit_is_rejected() {
    let (app, _config) = offline_app(LIMIT);
    let body = format!("email=a%40example.com&password={}", "x".repeat(LIMIT));

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_upload_larger_than_body_limit_is_stored() {
    let limit = 30 * 1024 * 1024;
    let (app, config) = offline_app(limit);
    let picture = vec![1u8; 31 * 1024 * 1024];
    let body = multipart_body(&[], Some(("big.png", picture.as_slice())));

    let response = app
        .oneshot(multipart_request("/auth/register", body, None))
        .await
        .unwrap();

    // Reached the handler: the empty registration fails validation
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Request validation failed"
    );

    let stored = std::fs::metadata(asset_path(&config, "big.png")).unwrap();
    assert_eq!(stored.len(), picture.len() as u64);
}

#[tokio::test]
async fn test_empty_picture_part_is_ignored() {
    let (app, config) = offline_app(LIMIT);
    let body = multipart_body(&[("firstName", "A")], Some(("", &b""[..])));

    let response = app
        .oneshot(multipart_request("/auth/register", body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Request validation failed"
    );
    assert_eq!(std::fs::read_dir(&config.assets_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn test_post_upload_without_token_writes_nothing() {
    let (app, config) = offline_app(LIMIT);
    let body = multipart_body(
        &[("description", "hello")],
        Some(("sneaky.png", &b"png"[..])),
    );

    let response = app
        .oneshot(multipart_request("/posts", body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["message"], "Access Denied");
    assert!(!asset_path(&config, "sneaky.png").exists());
}

#[tokio::test]
async fn test_post_upload_with_invalid_token_writes_nothing() {
    let (app, config) = offline_app(LIMIT);
    let body = multipart_body(&[], Some(("forged.png", &b"png"[..])));

    let response = app
        .oneshot(multipart_request(
            "/posts",
            body,
            Some("Bearer not-a-real-token"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(!asset_path(&config, "forged.png").exists());
}

#[tokio::test]
async fn test_token_for_other_secret_is_rejected() {
    let (app, _config) = offline_app(LIMIT);
    let token = sociopedia_server::auth::JwtService::new(
        "another-secret-key-that-is-long-enough-32chars",
        2,
    )
    .create_user_token(Uuid::new_v4(), "someone@example.com")
    .unwrap();

    let response = app
        .oneshot(get_request("/posts", Some(&format!("Bearer {token}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_keeps_picture_when_validation_fails() {
    let (app, config) = offline_app(LIMIT);
    let body = multipart_body(
        &[("firstName", "A"), ("email", "not-an-email")],
        Some(("kept.png", &b"picture-bytes"[..])),
    );

    let response = app
        .oneshot(multipart_request("/auth/register", body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let stored = std::fs::read(asset_path(&config, "kept.png")).unwrap();
    assert_eq!(stored, b"picture-bytes");
}

#[tokio::test]
async fn test_upload_name_escaping_asset_dir_is_rejected() {
    let (app, config) = offline_app(LIMIT);
    let body = multipart_body(&[], Some(("../outside.png", &b"png"[..])));

    let response = app
        .oneshot(multipart_request("/auth/register", body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!config.assets_dir.join("../outside.png").exists());
}
