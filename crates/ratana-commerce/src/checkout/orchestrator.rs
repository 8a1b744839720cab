//! The checkout sequence.
//!
//! The document store has no transactions, so checkout is a manual sequence
//! with explicit compensation. Failures before order creation abort with no
//! persisted side effects. Failures after order creation never roll the
//! order back: an order, once placed, must not silently disappear from the
//! user's history because a follow-up bookkeeping step failed. Those
//! failures surface as warnings on a partial-success outcome, to be
//! reconciled out-of-band.

use crate::cart::CartService;
use crate::checkout::Order;
use crate::collections;
use crate::current_timestamp;
use crate::error::StorefrontError;
use crate::ids::{OrderId, UserId};
use crate::location::PincodeResolver;
use crate::money::Money;
use crate::notify::NotificationDispatcher;
use crate::pricing;
use crate::user::UserDirectory;
use ratana_store::DocumentStore;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Caller choices for a checkout attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckoutOptions {
    /// Apply the user's loyalty balance to the order total.
    pub use_loyalty_cash: bool,
}

/// A non-fatal problem after the order was already created.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutWarning {
    /// The loyalty balance debit failed; the order stands and the balance
    /// must be reconciled out-of-band.
    #[error("Loyalty balance debit failed: {0}")]
    LoyaltyDebitFailed(String),
    /// The cart clear failed; a stale cart is a display annoyance, not a
    /// correctness violation.
    #[error("Cart clear failed: {0}")]
    CartClearFailed(String),
}

/// Result of a checkout that created an order.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// Every step completed.
    Success {
        /// The created order.
        order_id: OrderId,
        /// Payable total after loyalty credit.
        total: Money,
        /// Loyalty credit applied.
        cash_used: Money,
    },
    /// The order was created but a follow-up step failed.
    PartialSuccess {
        /// The created order.
        order_id: OrderId,
        /// Payable total after loyalty credit.
        total: Money,
        /// Loyalty credit applied.
        cash_used: Money,
        /// What went wrong after order creation.
        warnings: Vec<CheckoutWarning>,
    },
}

impl CheckoutOutcome {
    /// The created order's identifier.
    pub fn order_id(&self) -> &OrderId {
        match self {
            CheckoutOutcome::Success { order_id, .. }
            | CheckoutOutcome::PartialSuccess { order_id, .. } => order_id,
        }
    }

    /// Whether any post-order step failed.
    pub fn is_partial(&self) -> bool {
        matches!(self, CheckoutOutcome::PartialSuccess { .. })
    }
}

/// Composes address lookup, adjusted-total computation, loyalty credit,
/// order creation, and cart clearing.
#[derive(Clone)]
pub struct CheckoutOrchestrator {
    store: Arc<dyn DocumentStore>,
    users: UserDirectory,
    carts: CartService,
    resolver: PincodeResolver,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl CheckoutOrchestrator {
    /// Create an orchestrator over the given store and dispatcher.
    pub fn new(store: Arc<dyn DocumentStore>, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        Self {
            users: UserDirectory::new(store.clone()),
            carts: CartService::new(store.clone()),
            resolver: PincodeResolver::new(store.clone()),
            store,
            dispatcher,
        }
    }

    /// Run the checkout sequence for a user.
    ///
    /// Once order creation has been attempted, the sequence runs to
    /// completion; the order-creation write is never blindly retried, since
    /// a retry without an idempotency key could create a duplicate order.
    pub async fn checkout(
        &self,
        user: &UserId,
        options: CheckoutOptions,
    ) -> Result<CheckoutOutcome, StorefrontError> {
        // Steps 1-3 are read-only; any failure aborts with no side effects.
        let address = self
            .users
            .delivery_address(user)
            .await?
            .ok_or_else(|| StorefrontError::AddressMissing(user.to_string()))?;

        let cart = self.carts.fetch(user).await?;
        if cart.is_empty() {
            return Err(StorefrontError::EmptyCart);
        }

        let multiplier = self.resolver.resolve_multiplier(&address.pincode).await;
        let pricing = pricing::adjusted_subtotal(&cart.items, multiplier)?;
        let order_total = pricing.subtotal;

        let cash_used = if options.use_loyalty_cash {
            self.users.loyalty_balance(user).await?.min(order_total)
        } else {
            Money::zero()
        };
        let final_total = order_total
            .try_subtract(cash_used)
            .ok_or(StorefrontError::Overflow)?;

        // Step 4: the point of no return. A failed write aborts the whole
        // checkout and leaves the cart intact for a retry.
        let order = Order {
            id: OrderId::generate(),
            user_id: user.clone(),
            items: cart.items.clone(),
            total_amount: final_total,
            cash_used,
            delivery_address: address,
            created_at: current_timestamp(),
        };
        self.store
            .create(collections::ORDERS, order.id.as_str(), order.to_fields()?)
            .await?;
        info!(order_id = %order.id, %user, total = %final_total, "order created");

        // Steps 5-6: compensating actions. The order stands regardless.
        let mut warnings = Vec::new();

        if cash_used.is_positive() {
            if let Err(err) = self.users.debit_loyalty(user, cash_used).await {
                warn!(order_id = %order.id, %err, "loyalty debit failed after order creation");
                warnings.push(CheckoutWarning::LoyaltyDebitFailed(err.to_string()));
            }
        }

        if let Err(err) = self.carts.clear(user).await {
            warn!(order_id = %order.id, %err, "cart clear failed after order creation");
            warnings.push(CheckoutWarning::CartClearFailed(err.to_string()));
        }

        // Fire-and-forget: a failed push never blocks or degrades checkout.
        if let Err(err) = self
            .dispatcher
            .notify(
                user,
                "Order placed",
                &format!("Your order for {} has been placed.", final_total),
                json!({ "type": "order", "orderId": order.id.as_str() }),
            )
            .await
        {
            warn!(order_id = %order.id, %err, "order notification failed");
        }

        if warnings.is_empty() {
            Ok(CheckoutOutcome::Success {
                order_id: order.id,
                total: final_total,
                cash_used,
            })
        } else {
            Ok(CheckoutOutcome::PartialSuccess {
                order_id: order.id,
                total: final_total,
                cash_used,
                warnings,
            })
        }
    }

    /// The cart service this orchestrator writes through.
    pub fn carts(&self) -> &CartService {
        &self.carts
    }

    /// The pincode resolver this orchestrator prices with.
    pub fn resolver(&self) -> &PincodeResolver {
        &self.resolver
    }
}
