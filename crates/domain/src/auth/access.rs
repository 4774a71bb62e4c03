//! Role and location access rules.

use crate::inventory::{Location, LocationId};

use super::{Role, SessionUser, UserProfile};

/// A read-only view over what the signed-in user may do.
///
/// Admin rights come from the token claims alone, so they hold even when
/// the profile could not be fetched. Everything location-related falls back
/// to "no access" without a profile.
#[derive(Debug, Clone, Copy)]
pub struct AccessScope<'a> {
    user: Option<&'a SessionUser>,
    profile: Option<&'a UserProfile>,
    locations: &'a [Location],
}

impl<'a> AccessScope<'a> {
    /// Builds a scope from the current session state.
    #[must_use]
    pub const fn new(
        user: Option<&'a SessionUser>,
        profile: Option<&'a UserProfile>,
        locations: &'a [Location],
    ) -> Self {
        Self {
            user,
            profile,
            locations,
        }
    }

    /// True iff the token marks the user as staff.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.is_some_and(|u| u.is_staff)
    }

    /// True iff the profile role is `manager`.
    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.profile.is_some_and(|p| p.profile.role == Role::Manager)
    }

    /// Whether the user may work with the given location.
    #[must_use]
    pub fn can_access_location(&self, id: LocationId) -> bool {
        if self.is_admin() {
            return true;
        }
        self.locations.iter().any(|l| l.id == id)
    }

    /// Whether the user may switch away from their default location.
    #[must_use]
    pub fn can_change_location(&self) -> bool {
        if self.is_admin() {
            return true;
        }
        self.profile.is_some_and(|p| p.profile.can_change_location)
    }

    /// The location to preselect for this user.
    ///
    /// Prefers the profile's default when it is accessible, otherwise the
    /// first accessible location.
    #[must_use]
    pub fn default_location(&self) -> Option<&'a Location> {
        let preferred = self
            .profile
            .and_then(|p| p.profile.default_location)
            .and_then(|id| self.locations.iter().find(|l| l.id == id));
        preferred.or_else(|| self.locations.first())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::ProfileDetails;
    use pretty_assertions::assert_eq;

    fn user(is_staff: bool) -> SessionUser {
        SessionUser {
            user_id: 1,
            username: "ana".to_string(),
            is_staff,
            exp: 1_900_000_000,
            iat: None,
            jti: None,
            token_type: Some("access".to_string()),
        }
    }

    fn profile(role: Role, default_location: Option<LocationId>, can_change: bool) -> UserProfile {
        UserProfile {
            id: 1,
            username: "ana".to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff: false,
            profile: ProfileDetails {
                role,
                default_location,
                can_change_location: can_change,
                phone_number: None,
            },
        }
    }

    fn location(id: LocationId, name: &str) -> Location {
        Location {
            id,
            name: name.to_string(),
            address: String::new(),
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn test_is_admin_ignores_profile() {
        let staff = user(true);
        assert!(AccessScope::new(Some(&staff), None, &[]).is_admin());

        let regular = user(false);
        let admin_profile = profile(Role::Admin, None, true);
        assert!(!AccessScope::new(Some(&regular), Some(&admin_profile), &[]).is_admin());
        assert!(!AccessScope::new(None, None, &[]).is_admin());
    }

    #[test]
    fn test_is_manager_requires_profile() {
        let u = user(false);
        let manager = profile(Role::Manager, None, false);
        assert!(AccessScope::new(Some(&u), Some(&manager), &[]).is_manager());
        assert!(!AccessScope::new(Some(&u), None, &[]).is_manager());
    }

    #[test]
    fn test_location_access() {
        let u = user(false);
        let p = profile(Role::Employee, None, false);
        let locations = [location(1, "Main"), location(4, "North")];
        let scope = AccessScope::new(Some(&u), Some(&p), &locations);
        assert!(scope.can_access_location(4));
        assert!(!scope.can_access_location(9));
        assert!(!scope.can_change_location());

        let staff = user(true);
        let scope = AccessScope::new(Some(&staff), None, &[]);
        assert!(scope.can_access_location(9));
        assert!(scope.can_change_location());
    }

    #[test]
    fn test_default_location_prefers_accessible_default() {
        let u = user(false);
        let locations = [location(1, "Main"), location(4, "North")];

        let p = profile(Role::Employee, Some(4), false);
        let scope = AccessScope::new(Some(&u), Some(&p), &locations);
        assert_eq!(scope.default_location().map(|l| l.id), Some(4));

        let p = profile(Role::Employee, Some(99), false);
        let scope = AccessScope::new(Some(&u), Some(&p), &locations);
        assert_eq!(scope.default_location().map(|l| l.id), Some(1));

        let scope = AccessScope::new(Some(&u), None, &[]);
        assert!(scope.default_location().is_none());
    }
}
