//! Authentication domain types

mod access;
mod claims;
mod error;
mod profile;
mod tokens;

pub use access::AccessScope;
pub use claims::{ClaimsError, SessionUser};
pub use error::AuthError;
pub use profile::{NewUser, PasswordChange, ProfileDetails, ProfileUpdate, Role, UserProfile};
pub use tokens::{RefreshedTokens, TokenPair};
