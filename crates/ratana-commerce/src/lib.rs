//! Cart, pricing, and checkout logic for the Ratana storefront.
//!
//! This crate is the storefront's business core, extracted from the mobile
//! app: it owns no storage, screens, or transport. Persistence and auth live
//! behind the [`DocumentStore`](ratana_store::DocumentStore) collaborator,
//! push delivery behind [`NotificationDispatcher`](notify::NotificationDispatcher).
//!
//! - **Location**: postal code → serviceability + price multiplier
//! - **Pricing**: multiplier applied once, at read time, with defined rounding
//! - **Cart**: line-item consolidation with quantity/capacity invariants
//! - **Checkout**: address + adjusted total + loyalty credit + order creation
//!   as one compensated sequence
//!
//! # Example
//!
//! ```rust,ignore
//! use ratana_commerce::prelude::*;
//!
//! let carts = CartService::new(store.clone());
//! carts.add_item(&user_id, line_item).await?;
//!
//! let orchestrator = CheckoutOrchestrator::new(store, dispatcher);
//! match orchestrator.checkout(&user_id, CheckoutOptions::default()).await? {
//!     CheckoutOutcome::Success { order_id, .. } => println!("placed {order_id}"),
//!     CheckoutOutcome::PartialSuccess { warnings, .. } => { /* surface support contact */ }
//! }
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod collections;
pub mod error;
pub mod ids;
pub mod location;
pub mod money;
pub mod notify;
pub mod pricing;
pub mod user;

pub use error::StorefrontError;
pub use ids::*;
pub use money::Money;

/// Current Unix timestamp in seconds.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::StorefrontError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    pub use crate::cart::{Cart, CartLineItem, CartMirror, CartMutation, CartService};
    pub use crate::catalog::{CatalogReader, Product};
    pub use crate::checkout::{
        CheckoutOptions, CheckoutOrchestrator, CheckoutOutcome, CheckoutWarning, DeliveryAddress,
        Order,
    };
    pub use crate::location::{PincodeRecord, PincodeResolver, PriceMultiplierRecord};
    pub use crate::notify::{NoopDispatcher, NotificationDispatcher};
    pub use crate::pricing::{adjust, adjusted_subtotal, CartPricing, LinePricing};
    pub use crate::user::UserDirectory;
}
