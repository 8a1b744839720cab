//! Checkout: order snapshots and the compensated checkout sequence.

mod orchestrator;
mod order;

pub use crate::user::DeliveryAddress;
pub use orchestrator::{CheckoutOptions, CheckoutOrchestrator, CheckoutOutcome, CheckoutWarning};
pub use order::Order;
