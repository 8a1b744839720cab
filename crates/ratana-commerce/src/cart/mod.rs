//! Shopping cart: line-item model, store-backed reconciliation, and the
//! optimistic local mirror.

mod cart;
mod mirror;
mod service;

pub use cart::{Cart, CartLineItem, CartMutation, MAX_DISTINCT_ITEMS};
pub use mirror::CartMirror;
pub use service::CartService;
