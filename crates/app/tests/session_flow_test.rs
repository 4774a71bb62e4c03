//! End-to-end session flow against an in-process fake backend.
//!
//! Runs the real reqwest transport, session store, refresh coordinator and
//! services; only the backend is faked.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use stockroom_application::{
    ApiClient, AuthContext, HttpError, LogoutOutcome, LogoutReason, ProductService,
    SessionEvent, SessionStore, TokenStorage,
};
use stockroom_domain::{AuthError, ProductFilters};
use stockroom_infrastructure::{FileTokenStorage, ReqwestTransport};

fn jwt(marker: &str) -> String {
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

#[derive(Default)]
struct Backend {
    valid_access: Mutex<String>,
    valid_refresh: Mutex<String>,
    generation: AtomicUsize,
    refresh_calls: AtomicUsize,
    logout_bodies: Mutex<Vec<Value>>,
}

impl Backend {
    fn issue(&self) -> (String, String) {
        let n = self.generation.fetch_add(1, Ordering::SeqCst);
        let access = jwt(&format!("a{n}"));
        *self.valid_access.lock().unwrap() = access.clone();
        (access, format!("refresh-{n}"))
    }

    fn expire_access(&self) {
        *self.valid_access.lock().unwrap() = "expired".to_string();
    }

    fn revoke_refresh(&self) {
        *self.valid_refresh.lock().unwrap() = "revoked".to_string();
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

async fn token(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    if body["password"] != "correct-horse" {
        return unauthorized();
    }
    let (access, refresh) = backend.issue();
    *backend.valid_refresh.lock().unwrap() = refresh.clone();
    Json(json!({"access": access, "refresh": refresh})).into_response()
}

async fn refresh(State(backend): State<Arc<Backend>>, Json(body): Json<Value>) -> Response {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    if body["refresh"] != *backend.valid_refresh.lock().unwrap() {
        return unauthorized();
    }
    let (access, _) = backend.issue();
    Json(json!({"access": access})).into_response()
}

async fn logout(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    backend.logout_bodies.lock().unwrap().push(body);
    (StatusCode::RESET_CONTENT, Json(json!({"message": "Logged out successfully."})))
        .into_response()
}

async fn profile(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
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

async fn products(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Response {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"count": 1, "next": null, "previous": null,
                "results": [{"id": 10, "name": "Hex bolt", "price": "0.25", "quantity": 400}]}))
    .into_response()
}

struct Client {
    backend: Arc<Backend>,
    auth: AuthContext,
    products: ProductService,
    storage: Arc<FileTokenStorage>,
    _dir: tempfile::TempDir,
}

async fn start() -> Client {
    let backend = Arc::new(Backend::default());
    let app = Router::new()
        .route("/api/token/", post(token))
        .route("/api/token/refresh/", post(refresh))
        .route("/api/logout/", post(logout))
        .route("/api/user/profile/", get(profile))
        .route("/api/user/accessible-locations/", get(accessible_locations))
        .route("/api/products/", get(products))
        .with_state(backend.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileTokenStorage::in_dir(dir.path()));
    let transport = Arc::new(ReqwestTransport::new(Duration::from_secs(5), "stockroom-test").unwrap());
    let session = Arc::new(SessionStore::new(storage.clone()));
    let client = Arc::new(ApiClient::new(format!("http://{addr}/"), transport, session));
    Client {
        backend,
        auth: AuthContext::new(client.clone()),
        products: ProductService::new(client),
        storage,
        _dir: dir,
    }
}

#[tokio::test]
async fn test_login_persists_session_and_loads_profile() {
    let c = start().await;

    let user = c.auth.login("maria", "correct-horse").await.unwrap();

    assert_eq!(user.username, "maria");
    assert!(c.auth.is_manager().await);
    assert!(c.auth.can_access_location(2).await);
    assert_eq!(c.auth.get_default_location().await.map(|l| l.name), Some("Harbor".to_string()));
    let stored = c.storage.load().await.unwrap().unwrap();
    assert_eq!(stored.refresh, "refresh-0");
}

#[tokio::test]
async fn test_wrong_password_leaves_no_session() {
    let c = start().await;

    let err = c.auth.login("maria", "nope").await.unwrap_err();

    assert!(matches!(err, HttpError::Auth(AuthError::InvalidCredentials { .. })));
    assert!(!c.auth.is_authenticated().await);
    assert_eq!(c.storage.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let c = start().await;
    c.auth.login("maria", "correct-horse").await.unwrap();
    c.backend.expire_access();

    let mut calls = tokio::task::JoinSet::new();
    for _ in 0..5 {
        let products = c.products.clone();
        calls.spawn(async move { products.list(&ProductFilters::default(), 1).await });
    }
    let results = calls.join_all().await;

    assert_eq!(results.len(), 5);
    for result in results {
        assert_eq!(result.unwrap().results[0].name, "Hex bolt");
    }
    assert_eq!(c.backend.refresh_calls.load(Ordering::SeqCst), 1);
    // The rotated access token is persisted alongside the unchanged refresh token.
    let stored = c.storage.load().await.unwrap().unwrap();
    assert_eq!(stored.access, *c.backend.valid_access.lock().unwrap());
    assert_eq!(stored.refresh, "refresh-0");
}

#[tokio::test]
async fn test_revoked_refresh_ends_session() {
    let c = start().await;
    c.auth.login("maria", "correct-horse").await.unwrap();
    let mut events = c.auth.subscribe();
    c.backend.expire_access();
    c.backend.revoke_refresh();

    let err = c.products.list(&ProductFilters::default(), 1).await.unwrap_err();

    assert!(matches!(err, HttpError::Auth(AuthError::RefreshFailed { .. })));
    assert!(!c.auth.is_authenticated().await);
    assert_eq!(c.auth.profile().await, None);
    assert_eq!(c.storage.load().await.unwrap(), None);
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::LoggedOut {
            reason: LogoutReason::RefreshFailed
        }
    );
}

#[tokio::test]
async fn test_logout_blacklists_refresh_token() {
    let c = start().await;
    c.auth.login("maria", "correct-horse").await.unwrap();

    let outcome = c.auth.logout().await;

    assert_eq!(outcome, LogoutOutcome::Notified);
    assert_eq!(
        *c.backend.logout_bodies.lock().unwrap(),
        vec![json!({"refresh": "refresh-0"})]
    );
    assert!(!c.auth.is_authenticated().await);
    assert_eq!(c.storage.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_restore_picks_up_saved_session() {
    let c = start().await;
    c.auth.login("maria", "correct-horse").await.unwrap();

    let session = Arc::new(SessionStore::new(c.storage.clone()));
    let user = session.restore().await.unwrap();

    assert_eq!(user.map(|u| u.username), Some("maria".to_string()));
}
