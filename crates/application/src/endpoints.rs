//! Backend endpoint paths.

/// Obtain a token pair with username and password.
pub const TOKEN: &str = "/api/token/";
/// Exchange a refresh token for a new access token.
pub const TOKEN_REFRESH: &str = "/api/token/refresh/";
/// Blacklist a refresh token.
pub const LOGOUT: &str = "/api/logout/";
/// Self-service sign-up.
pub const REGISTER: &str = "/api/register/";
/// The signed-in user's account.
pub const PROFILE: &str = "/api/user/profile/";
/// Locations the signed-in user may work at.
pub const ACCESSIBLE_LOCATIONS: &str = "/api/user/accessible-locations/";
/// Password change for the signed-in user.
pub const CHANGE_PASSWORD: &str = "/api/user/change-password/";

/// Product collection.
pub const PRODUCTS: &str = "/api/products/";
/// Type-ahead product search.
pub const PRODUCT_SUGGESTIONS: &str = "/api/products/suggestions/";
/// Stock movement log.
pub const MOVEMENTS: &str = "/api/inventory-movements/";
/// Supplier collection.
pub const SUPPLIERS: &str = "/api/suppliers/";
/// Purchase order collection.
pub const PURCHASE_ORDERS: &str = "/api/purchase-orders/";
/// Location collection.
pub const LOCATIONS: &str = "/api/locations/";
/// User administration.
pub const USERS: &str = "/api/users/";
/// Inventory report.
pub const REPORTS: &str = "/api/reports/";

/// Path of one item in a collection, e.g. `/api/products/4/`.
#[must_use]
pub fn item(collection: &str, id: i64) -> String {
    format!("{collection}{id}/")
}

/// Path of a custom action on one item, e.g. `/api/purchase-orders/4/receive/`.
#[must_use]
pub fn action(collection: &str, id: i64, action: &str) -> String {
    format!("{collection}{id}/{action}/")
}
