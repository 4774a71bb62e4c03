//! Session state: the persisted token pair, its decoded claims, and the
//! single-flight refresh of expired access tokens.

mod events;
mod refresh;
mod store;

pub use events::{LogoutReason, SessionEvent};
pub use refresh::RefreshCoordinator;
pub use store::{SessionStatus, SessionStore};
