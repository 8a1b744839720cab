//! Collection names in the hosted document database.

/// Product catalog documents.
pub const PRODUCTS: &str = "products";
/// Category documents.
pub const CATEGORIES: &str = "categories";
/// One cart document per user, items as JSON-encoded strings.
pub const CARTS: &str = "carts";
/// Immutable order snapshots.
pub const ORDERS: &str = "orders";
/// User profiles, delivery address, and loyalty balance.
pub const USERS: &str = "users";
/// Serviceable postal codes.
pub const PINCODES: &str = "pincodes";
/// Per-area price multipliers, keyed by pincode document id.
pub const PRICE_MULTIPLIERS: &str = "priceMultipliers";
