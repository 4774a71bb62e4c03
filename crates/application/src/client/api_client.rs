//! The API client.
//!
//! Every call goes through [`ApiClient::send`], which attaches the bearer
//! token, classifies the response, and on a 401 refreshes the session once
//! and replays the call.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use stockroom_domain::{
    AuthError, DomainError, HttpMethod, PendingRequest, QueryParams, RefreshedTokens,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::endpoints;
use crate::error::{ApiResult, HttpError};
use crate::fetch::cancellable;
use crate::ports::{HttpTransport, TransportRequest};
use crate::session::{LogoutReason, RefreshCoordinator, SessionStore};

use super::{ApiResponse, RequestOptions};

/// Client for the inventory backend.
///
/// Built once at start-up and shared by `Arc`; all callers see the same
/// session and the same refresh coordinator.
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    session: Arc<SessionStore>,
    refresh: RefreshCoordinator,
}

impl ApiClient {
    /// Creates a client for the backend at `base_url`.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        session: Arc<SessionStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            refresh: RefreshCoordinator::new(session.clone()),
            session,
        }
    }

    /// Backend base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session this client authenticates with.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// The coordinator serializing token refreshes.
    #[must_use]
    pub const fn refresh_coordinator(&self) -> &RefreshCoordinator {
        &self.refresh
    }

    /// Sends `method path` with an optional JSON body.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> ApiResult<ApiResponse> {
        let mut request = PendingRequest::new(method, path);
        request.body = body;
        self.send(request, options).await
    }

    /// Sends a request, refreshing and replaying it once on 401.
    ///
    /// # Errors
    ///
    /// - `HttpError::Auth(NoSession)` on a 401 with no session.
    /// - `HttpError::Auth(SessionExpired)` on a 401 after the replay.
    /// - `HttpError::Auth(RefreshFailed)` if the refresh exchange failed.
    /// - `HttpError::Validation` / `HttpError::Server` for other 4xx / 5xx.
    /// - `HttpError::Network` if no response was received.
    ///
    /// The three auth failures end the session.
    pub async fn send(
        &self,
        mut request: PendingRequest,
        options: RequestOptions,
    ) -> ApiResult<ApiResponse> {
        request.validate()?;
        loop {
            let access = if options.is_authenticated() {
                self.session.access_token().await
            } else {
                None
            };
            let response = self.dispatch(&request, access.as_deref()).await?;
            if !(response.status.is_unauthorized() && options.refreshes_on_unauthorized()) {
                return into_result(response);
            }

            let Some(sent_with) = access else {
                warn!(path = %request.path, "unauthorized without a session");
                self.session.clear(LogoutReason::NoSession).await;
                return Err(AuthError::NoSession.into());
            };
            if request.is_retried() {
                warn!(path = %request.path, "unauthorized after refresh, ending session");
                self.session.clear(LogoutReason::SessionExpired).await;
                return Err(AuthError::SessionExpired.into());
            }

            request.mark_retried();
            self.refresh
                .refresh(&sent_with, |refresh| self.exchange(refresh))
                .await?;
            debug!(path = %request.path, "replaying after refresh");
        }
    }

    /// [`send`](Self::send), abandoned with `HttpError::Cancelled` when
    /// `cancel` fires first.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn request_cancellable(
        &self,
        request: PendingRequest,
        options: RequestOptions,
        cancel: &CancellationToken,
    ) -> ApiResult<ApiResponse> {
        cancellable(cancel, self.send(request, options)).await
    }

    /// `GET path?query`, decoded as `T`.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send); also `HttpError::Decode`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: QueryParams,
    ) -> ApiResult<T> {
        let request = PendingRequest::get(path).with_query(query);
        self.send(request, RequestOptions::default()).await?.json()
    }

    /// `POST path` with a JSON body, decoded as `T`.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send); also `HttpError::Decode`.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(HttpMethod::Post, path, body).await
    }

    /// `PUT path` with a JSON body, decoded as `T`.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send); also `HttpError::Decode`.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(HttpMethod::Put, path, body).await
    }

    /// `PATCH path` with a JSON body, decoded as `T`.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send); also `HttpError::Decode`.
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(HttpMethod::Patch, path, body).await
    }

    /// `DELETE path`, ignoring any body.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(
            PendingRequest::new(HttpMethod::Delete, path),
            RequestOptions::default(),
        )
        .await
        .map(drop)
    }

    async fn send_json<B, T>(&self, method: HttpMethod, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = to_body(body)?;
        let request = PendingRequest::new(method, path).with_body(body);
        self.send(request, RequestOptions::default()).await?.json()
    }

    /// Exchanges a refresh token. Anonymous and never retried, so a 401
    /// here cannot recurse into another refresh.
    async fn exchange(&self, refresh: String) -> ApiResult<RefreshedTokens> {
        let request = PendingRequest::post(endpoints::TOKEN_REFRESH, json!({ "refresh": refresh }));
        let response = self.dispatch(&request, None).await?;
        into_result(response)?.json()
    }

    async fn dispatch(
        &self,
        request: &PendingRequest,
        access: Option<&str>,
    ) -> ApiResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path_and_query()?);

        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        let body = match &request.body {
            Some(body) if request.method.has_body() => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(serde_json::to_vec(body)?)
            }
            Some(_) => {
                debug!(method = %request.method, "dropping body on bodiless method");
                None
            }
            None => None,
        };
        if let Some(access) = access {
            headers.push(("Authorization".to_string(), format!("Bearer {access}")));
        }
        headers.extend(
            request
                .headers
                .iter()
                .filter(|(name, _)| !name.eq_ignore_ascii_case("authorization"))
                .map(|(name, value)| (name.clone(), value.clone())),
        );

        let request_id = Uuid::now_v7();
        debug!(
            %request_id,
            method = %request.method,
            path = %request.path,
            authenticated = access.is_some(),
            retried = request.is_retried(),
            "dispatching request"
        );
        let started = Instant::now();
        let response = self
            .transport
            .send(TransportRequest {
                method: request.method,
                url,
                headers,
                body,
            })
            .await
            .map_err(|e| {
                warn!(%request_id, error = %e, "transport failure");
                HttpError::Network(e)
            })?;
        debug!(
            %request_id,
            status = response.status.as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "response received"
        );
        Ok(response.into())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

fn into_result(response: ApiResponse) -> ApiResult<ApiResponse> {
    if response.status.is_success() {
        Ok(response)
    } else {
        Err(HttpError::from_response(response.status, &response.body))
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| {
        HttpError::InvalidRequest(DomainError::InvalidField {
            field: "body",
            message: e.to_string(),
        })
    })
}
