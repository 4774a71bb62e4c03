//! Shared fakes for unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};
use stockroom_domain::TokenPair;

use crate::client::ApiClient;
use crate::ports::{
    HttpTransport, StorageError, TokenStorage, TransportError, TransportRequest, TransportResponse,
};
use crate::session::SessionStore;

pub const BASE_URL: &str = "http://backend.test";

/// Far-future expiry so claims never look expired.
pub const EXP: i64 = 4_102_444_800;

pub fn jwt(username: &str, is_staff: bool, marker: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = json!({
        "token_type": "access",
        "exp": EXP,
        "iat": EXP - 300,
        "jti": marker,
        "user_id": 7,
        "username": username,
        "is_staff": is_staff,
    });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig-{marker}")
}

pub fn pair(marker: &str) -> TokenPair {
    TokenPair::new(jwt("maria", false, marker), format!("refresh-{marker}")).unwrap()
}

pub fn staff_pair(marker: &str) -> TokenPair {
    TokenPair::new(jwt("root", true, marker), format!("refresh-{marker}")).unwrap()
}

/// In-memory storage that counts writes.
#[derive(Default)]
pub struct MemoryStorage {
    tokens: Mutex<Option<TokenPair>>,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn with(tokens: TokenPair) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn stored(&self) -> Option<TokenPair> {
        self.tokens.lock().unwrap().clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<TokenPair>, StorageError> {
        Ok(self.stored())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.tokens.lock().unwrap() = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.tokens.lock().unwrap() = None;
        Ok(())
    }
}

/// What the fake backend answers for one request.
pub struct Reply {
    pub result: Result<TransportResponse, TransportError>,
    pub delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            result: Ok(TransportResponse::new(status, body.to_string())),
            delay: Duration::ZERO,
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            result: Ok(TransportResponse::new(status, Vec::new())),
            delay: Duration::ZERO,
        }
    }

    pub fn error(error: TransportError) -> Self {
        Self {
            result: Err(error),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Handler = dyn Fn(&TransportRequest) -> Reply + Send + Sync;

/// Scripted transport that records every request it sees.
pub struct MockTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new(handler: impl Fn(&TransportRequest) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests whose URL path is exactly `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .count()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let reply = (self.handler)(&request);
        self.requests.lock().unwrap().push(request);
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }
}

/// Path portion of a mock URL, without base or query.
pub fn path_of(url: &str) -> &str {
    let rest = url.strip_prefix(BASE_URL).unwrap_or(url);
    rest.split('?').next().unwrap_or(rest)
}

/// Bearer token a request was sent with.
pub fn bearer(request: &TransportRequest) -> Option<String> {
    request
        .header("Authorization")
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}

pub fn body_json(request: &TransportRequest) -> Value {
    serde_json::from_slice(request.body.as_deref().unwrap_or(b"null")).unwrap()
}

pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub storage: Arc<MemoryStorage>,
    pub session: Arc<SessionStore>,
    pub client: Arc<ApiClient>,
}

pub async fn harness(
    stored: Option<TokenPair>,
    handler: impl Fn(&TransportRequest) -> Reply + Send + Sync + 'static,
) -> Harness {
    let transport = Arc::new(MockTransport::new(handler));
    let storage = Arc::new(stored.map_or_else(MemoryStorage::default, MemoryStorage::with));
    let session = Arc::new(SessionStore::new(storage.clone()));
    session.restore().await.unwrap();
    let client = Arc::new(ApiClient::new(BASE_URL, transport.clone(), session.clone()));
    Harness {
        transport,
        storage,
        session,
        client,
    }
}
