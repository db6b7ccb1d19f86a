//! # HTTP surface: routing table and handlers
//!
//! | Method | Paths | Handler | Auth |
//! |--------|-------|---------|------|
//! | GET | `/api/health` | [`health`] | no |
//! | POST | `/api/auth/signup`, `/api/auth/register` | [`auth::signup`] | no |
//! | POST | `/api/auth/login` | [`auth::login`] | no |
//! | GET | `/api/auth/me` | [`auth::me`] | bearer |
//! | GET | `/api/notes/get`, `/api/notes` | [`notes::list`] | bearer |
//! | POST | `/api/notes/save`, `/api/notes` | [`notes::create`] | bearer |
//! | PUT, PATCH | `/api/notes/{id}` | [`notes::update`] | bearer |
//! | DELETE | `/api/notes/{id}` | [`notes::delete`] | bearer |
//!
//! Several external paths map to one handler; the aliases are plain routes, nothing
//! rewrites requests. Everything under `/api/auth` passes through the rate limiter.

pub mod auth;
pub mod notes;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit},
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::auth::require_auth;
use crate::error::ApiError;
use crate::rate_limit::limit_auth;
use crate::settings;
use crate::state::AppState;

/// A JSON body whose decoding failure the handler reports itself.
pub type JsonBody<T> = Result<Json<T>, JsonRejection>;

/// Unwrap a JSON body, turning a decode failure into a 400.
pub fn payload<T>(body: JsonBody<T>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

/// Decode a body that may be absent. An empty or all-whitespace body reads as
/// `T::default()`, regardless of `Content-Type`.
pub fn optional_payload<T>(body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        ApiError::Validation(format!("Failed to parse the request body as JSON: {e}"))
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "message": "Lockify API running" }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found")
}

fn cors(settings: &settings::Server) -> CorsLayer {
    let origin = if settings.origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = settings
            .origins
            .iter()
            .filter_map(|o| {
                HeaderValue::from_str(o)
                    .map_err(|_| warn!("ignoring invalid CORS origin {o:?}"))
                    .ok()
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Build the application router.
pub fn router(state: AppState, settings: &settings::Server) -> Router {
    let guard = from_fn_with_state(state.clone(), require_auth);

    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/register", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me).route_layer(guard.clone()))
        .layer(from_fn_with_state(state.clone(), limit_auth));

    let note_routes = Router::new()
        .route("/get", get(notes::list))
        .route("/save", post(notes::create))
        .route("/", get(notes::list).post(notes::create))
        .route(
            "/{id}",
            put(notes::update)
                .patch(notes::update)
                .delete(notes::delete),
        )
        .route_layer(guard);

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/auth", auth_routes)
        .nest("/api/notes", note_routes)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(settings.bodylimit))
        .layer(cors(settings))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::TokenKeys;
    use crate::rate_limit::RateLimiter;

    fn app_with_limit(max: u32) -> Router {
        let state = AppState::in_memory(
            TokenKeys::new("test-secret", Duration::from_secs(3600)),
            RateLimiter::new(max, Duration::from_secs(900)),
        );
        router(state, &settings::Server::default())
    }

    fn app() -> Router {
        app_with_limit(100)
    }

    async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
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
        app.clone().oneshot(request.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn signup_and_login(app: &Router, email: &str) -> (String, String) {
        let response = send(
            app,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({ "fullName": "Alice", "email": email, "password": "password1" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(
            app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "password1" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(&app(), "GET", "/api/health", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflicts() {
        let app = app();
        signup_and_login(&app, "a@x.com").await;

        let response = send(
            &app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "fullName": "Alice Again", "email": "A@X.com", "password": "password2" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["error"], "Email already registered");
    }

    #[tokio::test]
    async fn test_signup_validation_error_names_field() {
        let response = send(
            &app(),
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({ "fullName": "Alice", "email": "not-an-email", "password": "password1" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Invalid email");
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let app = app();
        signup_and_login(&app, "a@x.com").await;

        for (email, password) in [("a@x.com", "wrong-password"), ("b@x.com", "password1")] {
            let response = send(
                &app,
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(json_body(response).await["error"], "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn test_notes_require_a_valid_token() {
        let app = app();
        let response = send(&app, "GET", "/api/notes/get", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "Missing token");

        let response = send(&app, "GET", "/api/notes/get", Some("a.b.c"), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "Invalid token");

        let foreign = TokenKeys::new("other-secret", Duration::from_secs(60))
            .issue(uuid::Uuid::new_v4(), "a@x.com")
            .unwrap();
        let response = send(&app, "GET", "/api/notes/get", Some(&foreign), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_returns_profile() {
        let app = app();
        let (token, id) = signup_and_login(&app, "a@x.com").await;
        let response = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], id);
        assert_eq!(body["fullName"], "Alice");
    }

    #[tokio::test]
    async fn test_cross_account_access_is_not_found() {
        let app = app();
        let (alice, _) = signup_and_login(&app, "alice@x.com").await;
        let (bob, _) = signup_and_login(&app, "bob@x.com").await;

        let response = send(&app, "POST", "/api/notes/save", Some(&alice), Some(json!({ "content": "secret" }))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = json_body(response).await["_id"].as_str().unwrap().to_string();

        let response = send(&app, "GET", "/api/notes/get", Some(&bob), None).await;
        assert_eq!(json_body(response).await, json!([]));

        let uri = format!("/api/notes/{id}");
        let response = send(&app, "PUT", &uri, Some(&bob), Some(json!({ "content": "pwned" }))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response = send(&app, "DELETE", &uri, Some(&bob), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, "GET", "/api/notes", Some(&alice), None).await;
        let notes = json_body(response).await;
        assert_eq!(notes.as_array().unwrap().len(), 1);
        assert_eq!(notes[0]["content"], "secret");
    }

    #[tokio::test]
    async fn test_update_semantics() {
        let app = app();
        let (token, _) = signup_and_login(&app, "a@x.com").await;

        let response = send(&app, "POST", "/api/notes", Some(&token), Some(json!({ "title": "t", "content": "c" }))).await;
        let created = json_body(response).await;
        let uri = format!("/api/notes/{}", created["_id"].as_str().unwrap());

        // Empty body: no-op, same note back.
        let response = send(&app, "PUT", &uri, Some(&token), Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, created);

        // No body at all, with or without a JSON content type: also a no-op.
        let response = send(&app, "PUT", &uri, Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, created);

        let request = Request::builder()
            .method("PATCH")
            .uri(&uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, created);

        // A body that is not JSON is still rejected.
        let request = Request::builder()
            .method("PUT")
            .uri(&uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\":"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Present-but-empty content is rejected.
        let response = send(&app, "PUT", &uri, Some(&token), Some(json!({ "content": "" }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, "PATCH", &uri, Some(&token), Some(json!({ "title": "renamed" }))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await;
        assert_eq!(updated["title"], "renamed");
        assert_eq!(updated["content"], "c");
        assert_ne!(updated["updatedAt"], created["updatedAt"]);

        // Malformed id.
        let response = send(&app, "DELETE", "/api/notes/not-a-uuid", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_is_newest_updated_first() {
        let app = app();
        let (token, _) = signup_and_login(&app, "a@x.com").await;

        let mut ids = Vec::new();
        for content in ["one", "two", "three"] {
            let response = send(&app, "POST", "/api/notes/save", Some(&token), Some(json!({ "content": content }))).await;
            ids.push(json_body(response).await["_id"].as_str().unwrap().to_string());
        }
        send(&app, "PUT", &format!("/api/notes/{}", ids[0]), Some(&token), Some(json!({ "content": "one!" }))).await;

        let response = send(&app, "GET", "/api/notes/get", Some(&token), None).await;
        let notes = json_body(response).await;
        let order: Vec<&str> = notes
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["_id"].as_str().unwrap())
            .collect();
        assert_eq!(order, vec![ids[0].as_str(), ids[2].as_str(), ids[1].as_str()]);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app();
        let (token, _) = signup_and_login(&app, "a@x.com").await;
        let response = send(&app, "POST", "/api/notes/save", Some(&token), Some(json!({ "content": 42 }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_auth_routes_are_rate_limited() {
        let app = app_with_limit(2);
        for _ in 0..2 {
            let response = send(&app, "POST", "/api/auth/login", None, Some(json!({}))).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
        let response = send(&app, "POST", "/api/auth/login", None, Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        // Notes routes are not limited.
        let response = send(&app, "GET", "/api/health", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = send(&app(), "GET", "/api/nope", None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Not found");
    }
}
