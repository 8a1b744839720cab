//! Location-aware price adjustment.
//!
//! A price is adjusted exactly once, at the point it is read for display or
//! for order-total computation. Persisted prices are always the unadjusted
//! base values; nothing in this crate ever writes an adjusted price back.

use crate::cart::CartLineItem;
use crate::error::StorefrontError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Apply a location multiplier to a base price.
///
/// Returns the base's rupee value times the multiplier, rounded half-up
/// (away from zero) to the nearest whole rupee. Pure: never fails for
/// finite inputs. The caller guarantees `base >= 0` and `multiplier > 0`;
/// unresolved locations pass the neutral multiplier `1.0`.
pub fn adjust(base: Money, multiplier: f64) -> Money {
    Money::from_rupees((base.rupees() * multiplier).round() as i64)
}

/// Pricing breakdown for a single cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    /// Product this line prices.
    pub product_id: ProductId,
    /// Base unit price.
    pub unit_price: Money,
    /// Unit price after location adjustment.
    pub adjusted_unit_price: Money,
    /// Quantity.
    pub quantity: i64,
    /// Line total (adjusted unit price times quantity).
    pub line_total: Money,
}

/// Complete pricing breakdown for a cart at a given location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// The multiplier that was applied.
    pub multiplier: f64,
    /// Sum of all line totals.
    pub subtotal: Money,
    /// Per-line breakdown.
    pub lines: Vec<LinePricing>,
}

/// Compute the adjusted subtotal for a sequence of cart lines.
///
/// Each line's unit price is adjusted through [`adjust`], then multiplied by
/// the quantity with overflow checking.
pub fn adjusted_subtotal(
    items: &[CartLineItem],
    multiplier: f64,
) -> Result<CartPricing, StorefrontError> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let adjusted_unit_price = adjust(item.unit_price, multiplier);
        let line_total = adjusted_unit_price
            .try_multiply(item.quantity)
            .ok_or(StorefrontError::Overflow)?;
        lines.push(LinePricing {
            product_id: item.product_id.clone(),
            unit_price: item.unit_price,
            adjusted_unit_price,
            quantity: item.quantity,
            line_total,
        });
    }

    let subtotal = Money::try_sum(lines.iter().map(|l| l.line_total))
        .ok_or(StorefrontError::Overflow)?;

    Ok(CartPricing {
        multiplier,
        subtotal,
        lines,
    })
}
