//! In-process backend for exercising the runtime and commands.
#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;
use stockroom_application::TokenStorage;
use stockroom_domain::TokenPair;
use stockroom_infrastructure::{ClientConfig, FileTokenStorage};

pub fn jwt(marker: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = json!({
        "token_type": "access",
        "exp": 4_102_444_800_i64,
        "jti": marker,
        "user_id": 3,
        "username": "maria",
        "is_staff": false,
    });
    format!("{header}.{}.sig", URL_SAFE_NO_PAD.encode(claims.to_string()))
}

/// Accepts one access token; every refresh is rejected.
#[derive(Default)]
pub struct Backend {
    valid_access: Mutex<String>,
    pub profile_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
}

impl Backend {
    pub fn expire_access(&self) {
        *self.valid_access.lock().unwrap() = "expired".to_string();
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.valid_access.lock().unwrap());
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Given token not valid for any token type"})),
    )
        .into_response()
}

async fn refresh(State(backend): State<Arc<Backend>>) -> Response {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Token is blacklisted", "code": "token_not_valid"})),
    )
        .into_response()
}

async fn profile(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    backend.profile_calls.fetch_add(1, Ordering::SeqCst);
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"id": 3, "username": "maria", "email": "maria@example.com",
                "is_staff": false,
                "profile": {"role": "manager", "default_location": 2, "can_change_location": true}}))
    .into_response()
}

async fn accessible_locations(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    Json(json!([{"id": 1, "name": "Main"}, {"id": 2, "name": "Harbor"}])).into_response()
}

/// Serves the backend, persists a session in `state_dir`, and returns a
/// config pointing at both.
pub async fn start(state_dir: &Path) -> (Arc<Backend>, ClientConfig) {
    let backend = Arc::new(Backend::default());
    let access = jwt("a0");
    *backend.valid_access.lock().unwrap() = access.clone();
    FileTokenStorage::in_dir(state_dir)
        .save(&TokenPair::new(access, "refresh-0").unwrap())
        .await
        .unwrap();

    let app = Router::new()
        .route("/api/token/refresh/", post(refresh))
        .route("/api/user/profile/", get(profile))
        .route("/api/user/accessible-locations/", get(accessible_locations))
        .with_state(backend.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig {
        base_url: format!("http://{addr}"),
        state_dir: Some(state_dir.to_path_buf()),
        ..ClientConfig::default()
    };
    (backend, config)
}
