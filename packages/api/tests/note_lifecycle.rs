use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use lockify_api::{auth::TokenKeys, rate_limit::RateLimiter, router, settings, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::in_memory(
        TokenKeys::new("integration-secret", Duration::from_secs(3600)),
        RateLimiter::new(100, Duration::from_secs(900)),
    );
    router(state, &settings::Server::default())
}

async fn call(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response: Response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn signup_login_create_list_delete() {
    let app = app();

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "fullName": "Alice", "email": "a@x.com", "password": "password1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Signup successful. You can now log in.");

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "password1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    let alice = body["user"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["fullName"], "Alice");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("password").is_none());

    let (status, note) = call(
        &app,
        "POST",
        "/api/notes/save",
        Some(&token),
        Some(json!({ "title": "t", "content": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["owner"], alice.as_str());
    assert_eq!(note["content"], "hello");
    let id = note["_id"].as_str().unwrap().to_string();

    let (status, list) = call(&app, "GET", "/api/notes/get", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["_id"], id.as_str());

    let (status, body) = call(&app, "DELETE", &format!("/api/notes/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted");

    let (status, list) = call(&app, "GET", "/api/notes/get", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn register_alias_and_rest_paths_share_handlers() {
    let app = app();

    let (status, _) = call(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "fullName": "Bob", "email": "Bob@Example.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Stored lowercased, so a lowercase login works.
    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "bob@example.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, note) = call(
        &app,
        "POST",
        "/api/notes",
        Some(&token),
        Some(json!({ "content": "ciphertext" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["title"], "");

    let id = note["_id"].as_str().unwrap();
    let (status, updated) = call(
        &app,
        "PATCH",
        &format!("/api/notes/{id}"),
        Some(&token),
        Some(json!({ "title": "renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "renamed");
    assert_eq!(updated["content"], "ciphertext");

    let (status, list) = call(&app, "GET", "/api/notes", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["title"], "renamed");
}
