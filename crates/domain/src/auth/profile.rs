//! User profile and account payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::inventory::LocationId;

/// Role assigned to a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Manages stock for their locations.
    Manager,
    /// Regular staff member.
    #[default]
    Employee,
}

impl Role {
    /// Returns the role as its wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extended profile attached to a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProfileDetails {
    /// Role of the user.
    #[serde(default)]
    pub role: Role,
    /// Location preselected for this user.
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_id")]
    pub default_location: Option<LocationId>,
    /// Whether the user may switch to another location.
    #[serde(default)]
    pub can_change_location: bool,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// A user account as returned by `/api/user/profile/` and `/api/users/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account id.
    #[serde(deserialize_with = "crate::serde_helpers::id")]
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Whether the account has administrator rights.
    #[serde(default)]
    pub is_staff: bool,
    /// Extended profile; older backends omit it.
    #[serde(default)]
    pub profile: ProfileDetails,
}

impl UserProfile {
    /// Full name when both parts are set, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if first.is_empty() || last.is_empty() {
            self.username.clone()
        } else {
            format!("{first} {last}")
        }
    }
}

/// Registration payload for `POST /api/register/`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password confirmation; must equal `password`.
    pub password2: String,
    /// Given name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    /// Family name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    /// Optional extended profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileDetails>,
}

impl NewUser {
    /// Checks the rules the backend would otherwise reject.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` for the first failing field.
    pub fn validate(&self) -> DomainResult<()> {
        if self.username.trim().chars().count() < 3 {
            return Err(DomainError::InvalidField {
                field: "username",
                message: "must be at least 3 characters".to_string(),
            });
        }
        if !self.email.contains('@') {
            return Err(DomainError::InvalidField {
                field: "email",
                message: "invalid email address".to_string(),
            });
        }
        if self.password.chars().count() < 8 {
            return Err(DomainError::InvalidField {
                field: "password",
                message: "must be at least 8 characters".to_string(),
            });
        }
        if self.password != self.password2 {
            return Err(DomainError::InvalidField {
                field: "password2",
                message: "passwords do not match".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Payload for `PATCH /api/user/change-password/`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct PasswordChange {
    /// Current password.
    pub old_password: String,
    /// Replacement password.
    pub new_password: String,
    /// Replacement confirmation.
    pub new_password2: String,
}

impl PasswordChange {
    /// Rejects mismatched confirmations locally.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidField` when the confirmation differs.
    pub fn validate(&self) -> DomainResult<()> {
        if self.new_password != self.new_password2 {
            return Err(DomainError::InvalidField {
                field: "new_password",
                message: "passwords do not match".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordChange { .. }")
    }
}

/// Partial update for a user account; unset fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ProfileUpdate {
    /// New email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Administrator flag (admin endpoints only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_staff: Option<bool>,
    /// Replacement extended profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileDetails>,
}
