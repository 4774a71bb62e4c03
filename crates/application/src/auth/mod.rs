//! Authentication context: login, logout, profile and role helpers.

mod context;

pub use context::{AuthContext, LogoutOutcome};
