//! Auth context
//!
//! The single entry point front ends use for everything session related.
//! It owns the cached profile and accessible locations; the token pair and
//! its claims live in the [`SessionStore`](crate::session::SessionStore).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use stockroom_domain::{
    AccessScope, AuthError, HttpMethod, ListResponse, Location, LocationId, NewUser,
    PasswordChange, ProfileUpdate, QueryParams, SessionUser, TokenPair, UserProfile,
};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use crate::client::{ApiClient, RequestOptions};
use crate::endpoints;
use crate::error::{ApiResult, HttpError};
use crate::session::{LogoutReason, SessionEvent, SessionStatus};

const GENERIC_LOGIN_FAILURE: &str = "An error occurred during login";

/// Result of an explicit logout. Local state is cleared in every case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LogoutOutcome {
    /// The backend blacklisted the refresh token.
    Notified,
    /// The backend could not be told; the refresh token stays valid until it
    /// expires.
    NotificationFailed {
        /// Why the notification failed.
        message: String,
    },
    /// There was no session to end.
    LocalOnly,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: String,
}

#[derive(Default)]
struct ProfileCache {
    profile: Option<UserProfile>,
    locations: Vec<Location>,
}

/// Login, logout, profile, and role helpers over one [`ApiClient`].
pub struct AuthContext {
    client: Arc<ApiClient>,
    cache: RwLock<ProfileCache>,
}

impl AuthContext {
    /// Creates a context for `client`'s session.
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            cache: RwLock::new(ProfileCache::default()),
        }
    }

    /// The underlying client.
    #[must_use]
    pub const fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Subscribes to session events. Dropping the receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.client.session().subscribe()
    }

    /// Picks up a persisted session and, if there is one, its profile.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Storage` if the persisted record cannot be read.
    pub async fn restore(&self) -> ApiResult<Option<SessionUser>> {
        let user = self.client.session().restore().await?;
        if user.is_some() {
            self.fetch_profile().await;
        }
        Ok(user)
    }

    /// Logs in and loads the profile.
    ///
    /// A failed profile fetch does not fail the login.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidCredentials` if the backend rejects the
    ///   credentials, carrying its message.
    /// - `AuthError::InvalidToken` if the issued access token is unreadable.
    /// - Any other `HttpError` from the token request.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<SessionUser> {
        let credentials = json!({ "username": username, "password": password });
        let response = match self
            .client
            .request(
                HttpMethod::Post,
                endpoints::TOKEN,
                Some(credentials),
                RequestOptions::anonymous(),
            )
            .await
        {
            Ok(response) => response,
            Err(HttpError::Validation {
                status,
                detail,
                fields,
            }) if matches!(status.as_u16(), 400 | 401) => {
                warn!(%username, %status, "login rejected");
                let message = detail
                    .or_else(|| {
                        fields.iter().find_map(|(field, messages)| {
                            messages.first().map(|m| format!("{field}: {m}"))
                        })
                    })
                    .unwrap_or_else(|| GENERIC_LOGIN_FAILURE.to_string());
                return Err(AuthError::InvalidCredentials { message }.into());
            }
            Err(e) => return Err(e),
        };

        let tokens: TokenPair = response.json()?;
        let user = self.client.session().establish(tokens).await?;
        *self.cache.write().await = ProfileCache::default();
        info!(username = %user.username, is_staff = user.is_staff, "logged in");
        self.fetch_profile().await;
        Ok(user)
    }

    /// Ends the session.
    ///
    /// The backend is asked to blacklist the refresh token first; whatever it
    /// answers, the token pair, claims, profile and locations are cleared.
    pub async fn logout(&self) -> LogoutOutcome {
        let outcome = match self.client.session().tokens().await {
            None => LogoutOutcome::LocalOnly,
            Some(tokens) => match self
                .client
                .request(
                    HttpMethod::Post,
                    endpoints::LOGOUT,
                    Some(json!({ "refresh": tokens.refresh })),
                    RequestOptions::authenticated().without_refresh(),
                )
                .await
            {
                Ok(_) => LogoutOutcome::Notified,
                Err(e) => {
                    warn!(error = %e, "logout notification failed");
                    LogoutOutcome::NotificationFailed {
                        message: e.to_string(),
                    }
                }
            },
        };

        self.client.session().clear(LogoutReason::UserRequested).await;
        *self.cache.write().await = ProfileCache::default();
        info!(?outcome, "logged out");
        outcome
    }

    /// Refreshes the cached profile and accessible locations.
    ///
    /// Does nothing without a session. Failures are logged and leave the
    /// previous cache in place.
    pub async fn fetch_profile(&self) {
        if !self.client.session().is_authenticated().await {
            debug!("no session, skipping profile fetch");
            return;
        }

        let (profile, locations) = tokio::join!(
            self.client
                .get_json::<UserProfile>(endpoints::PROFILE, QueryParams::new()),
            self.client.get_json::<ListResponse<Location>>(
                endpoints::ACCESSIBLE_LOCATIONS,
                QueryParams::new()
            ),
        );

        let mut cache = self.cache.write().await;
        match profile {
            Ok(profile) => cache.profile = Some(profile),
            Err(e) => warn!(error = %e, "failed to fetch profile"),
        }
        match locations {
            Ok(locations) => cache.locations = locations.into_items(),
            Err(e) => warn!(error = %e, "failed to fetch accessible locations"),
        }
    }

    /// Signs up a new account. The new user still has to log in.
    ///
    /// # Errors
    ///
    /// `HttpError::InvalidRequest` if the input fails local rules, otherwise
    /// any `HttpError` from the client.
    pub async fn register(&self, user: &NewUser) -> ApiResult<String> {
        user.validate()?;
        let body = serde_json::to_value(user)?;
        let response = self
            .client
            .request(
                HttpMethod::Post,
                endpoints::REGISTER,
                Some(body),
                RequestOptions::anonymous(),
            )
            .await?;
        info!(username = %user.username, "registered");
        Ok(response.json::<MessageResponse>()?.message)
    }

    /// Changes the signed-in user's password.
    ///
    /// # Errors
    ///
    /// `HttpError::InvalidRequest` if the input fails local rules,
    /// `HttpError::Validation` if the old password is wrong, otherwise any
    /// `HttpError` from the client.
    pub async fn change_password(&self, change: &PasswordChange) -> ApiResult<String> {
        change.validate()?;
        let response: MessageResponse = self
            .client
            .patch_json(endpoints::CHANGE_PASSWORD, change)
            .await?;
        info!("password changed");
        Ok(response.message)
    }

    /// Updates the signed-in user's account and caches the result.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<UserProfile> {
        let profile: UserProfile = self.client.patch_json(endpoints::PROFILE, update).await?;
        self.cache.write().await.profile = Some(profile.clone());
        Ok(profile)
    }

    /// Claims of the current access token.
    pub async fn user(&self) -> Option<SessionUser> {
        self.client.session().user().await
    }

    /// Whether a session exists.
    pub async fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated().await
    }

    /// Expiry status of the access token.
    pub async fn status(&self) -> SessionStatus {
        self.client.session().status().await
    }

    /// The cached profile, while a session exists.
    pub async fn profile(&self) -> Option<UserProfile> {
        self.scoped(|_, cache| cache.profile.clone()).await
    }

    /// The cached accessible locations, while a session exists.
    pub async fn locations(&self) -> Vec<Location> {
        self.scoped(|_, cache| cache.locations.clone()).await
    }

    /// True iff the token marks the user as staff, whether or not the
    /// profile could be fetched.
    pub async fn is_admin(&self) -> bool {
        self.scoped(|scope, _| scope.is_admin()).await
    }

    /// True iff the cached profile role is manager.
    pub async fn is_manager(&self) -> bool {
        self.scoped(|scope, _| scope.is_manager()).await
    }

    /// Admins may use any location; others only their accessible ones.
    pub async fn can_access_location(&self, id: LocationId) -> bool {
        self.scoped(|scope, _| scope.can_access_location(id)).await
    }

    /// Admins may always switch location; others need the profile flag.
    pub async fn can_change_location(&self) -> bool {
        self.scoped(|scope, _| scope.can_change_location()).await
    }

    /// The profile's default location if accessible, else the first
    /// accessible location.
    pub async fn get_default_location(&self) -> Option<Location> {
        self.scoped(|scope, _| scope.default_location().cloned())
            .await
    }

    /// Runs `f` over the current access scope. The cache is ignored once the
    /// session is gone, so a forced logout hides the stale profile.
    async fn scoped<R>(&self, f: impl FnOnce(AccessScope<'_>, &ProfileCache) -> R) -> R {
        let user = self.client.session().user().await;
        let cache = self.cache.read().await;
        let empty = ProfileCache::default();
        let visible = if user.is_some() { &*cache } else { &empty };
        let scope = AccessScope::new(
            user.as_ref(),
            visible.profile.as_ref(),
            &visible.locations,
        );
        f(scope, visible)
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
