//! User administration endpoints (admins only)

use std::sync::Arc;

use stockroom_domain::{
    ListResponse, NewUser, ProfileDetails, ProfileUpdate, QueryParams, Role, UserProfile,
};

use crate::client::ApiClient;
use crate::endpoints::{self, USERS};
use crate::error::ApiResult;

/// Account management for administrators.
#[derive(Debug, Clone)]
pub struct UserAdminService {
    client: Arc<ApiClient>,
}

impl UserAdminService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All accounts.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn list(&self) -> ApiResult<Vec<UserProfile>> {
        self.client
            .get_json::<ListResponse<UserProfile>>(USERS, QueryParams::new())
            .await
            .map(ListResponse::into_items)
    }

    /// Creates an account with an optional role and default location.
    ///
    /// # Errors
    ///
    /// `HttpError::InvalidRequest` if the input fails local rules, otherwise
    /// any `HttpError` from the client.
    pub async fn create(&self, user: &NewUser) -> ApiResult<UserProfile> {
        user.validate()?;
        self.client.post_json(USERS, user).await
    }

    /// Partially updates an account.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn update(&self, id: i64, update: &ProfileUpdate) -> ApiResult<UserProfile> {
        self.client
            .patch_json(&endpoints::item(USERS, id), update)
            .await
    }

    /// Deletes an account.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&endpoints::item(USERS, id)).await
    }

    /// Grants or revokes administrator rights. Granting also sets the role to
    /// admin; revoking drops it to employee.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn toggle_admin(&self, user: &UserProfile) -> ApiResult<UserProfile> {
        let grant = !user.is_staff;
        let update = ProfileUpdate {
            is_staff: Some(grant),
            profile: Some(ProfileDetails {
                role: if grant { Role::Admin } else { Role::Employee },
                ..user.profile.clone()
            }),
            ..ProfileUpdate::default()
        };
        self.update(user.id, &update).await
    }

    /// Flips whether the user may switch their working location.
    ///
    /// # Errors
    ///
    /// Any `HttpError` from the client.
    pub async fn toggle_location_access(&self, user: &UserProfile) -> ApiResult<UserProfile> {
        let update = ProfileUpdate {
            profile: Some(ProfileDetails {
                can_change_location: !user.profile.can_change_location,
                ..user.profile.clone()
            }),
            ..ProfileUpdate::default()
        };
        self.update(user.id, &update).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{Reply, body_json, harness, staff_pair};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn employee() -> Value {
        json!({"id": 12, "username": "luis", "email": "luis@example.com",
               "first_name": "Luis", "last_name": "", "is_staff": false,
               "profile": {"role": "employee", "default_location": 2,
                           "can_change_location": false, "phone_number": null}})
    }

    #[tokio::test]
    async fn test_toggle_admin_grants_admin_role() {
        let h = harness(Some(staff_pair("a")), |_| Reply::json(200, &employee())).await;
        let users = UserAdminService::new(h.client.clone());
        let user: UserProfile = serde_json::from_value(employee()).unwrap();

        users.toggle_admin(&user).await.unwrap();

        let sent = &h.transport.requests()[0];
        assert_eq!(sent.url, "http://backend.test/api/users/12/");
        let body = body_json(sent);
        assert_eq!(body["is_staff"], true);
        assert_eq!(body["profile"]["role"], "admin");
        assert_eq!(body["profile"]["default_location"], 2);
    }

    #[tokio::test]
    async fn test_toggle_location_access_keeps_role() {
        let h = harness(Some(staff_pair("a")), |_| Reply::json(200, &employee())).await;
        let users = UserAdminService::new(h.client.clone());
        let user: UserProfile = serde_json::from_value(employee()).unwrap();

        users.toggle_location_access(&user).await.unwrap();

        let body = body_json(&h.transport.requests()[0]);
        assert_eq!(body.get("is_staff"), None);
        assert_eq!(body["profile"]["can_change_location"], true);
        assert_eq!(body["profile"]["role"], "employee");
    }
}
