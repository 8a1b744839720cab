//! Cart and line item types.

use crate::current_timestamp;
use crate::error::StorefrontError;
use crate::ids::{CartId, PincodeId, ProductId, UserId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Maximum number of distinct product lines a cart may hold.
pub const MAX_DISTINCT_ITEMS: usize = 100;

/// A line item in the cart.
///
/// Owned exclusively by the cart that contains it; destroyed on removal or
/// clear. `product_id` is the unique key within a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product being purchased; unique within the cart.
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Base unit price, unadjusted.
    #[serde(rename = "price")]
    pub unit_price: Money,
    /// Quantity; always positive.
    pub quantity: i64,
    /// Product image, denormalized for display.
    pub image_url: String,
    /// Pincode the item was priced against, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode_id: Option<PincodeId>,
}

impl CartLineItem {
    /// Create a line item.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price,
            quantity,
            image_url: image_url.into(),
            pincode_id: None,
        }
    }
}

/// A mutation against a cart's item sequence.
///
/// The same mutation is applied to the persisted cart by
/// [`CartService`](crate::cart::CartService) and, optionally, to an
/// optimistic local copy by [`CartMirror`](crate::cart::CartMirror).
#[derive(Debug, Clone, PartialEq)]
pub enum CartMutation {
    /// Add an item, merging quantities when the product is already present.
    Add(CartLineItem),
    /// Replace a line's quantity; zero or below removes the line.
    SetQuantity {
        /// Product whose line to change.
        product_id: ProductId,
        /// New quantity.
        quantity: i64,
    },
    /// Remove a line; no-op if absent.
    Remove(ProductId),
    /// Empty the cart.
    Clear,
}

/// A user's shopping cart.
///
/// One cart per user, created lazily on first add. Item order is insertion
/// order and carries no meaning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Cart document id.
    pub id: CartId,
    /// Owning user (1:1).
    pub owner: UserId,
    /// Line items, keyed by product id.
    pub items: Vec<CartLineItem>,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create an empty cart for a user.
    pub fn new(owner: UserId) -> Self {
        Self {
            id: CartId::generate(),
            owner,
            items: Vec::new(),
            updated_at: current_timestamp(),
        }
    }

    /// Apply a mutation to the item sequence.
    ///
    /// On error the cart is left unchanged.
    pub fn apply(&mut self, mutation: &CartMutation) -> Result<(), StorefrontError> {
        match mutation {
            CartMutation::Add(item) => self.add_item(item.clone()),
            CartMutation::SetQuantity {
                product_id,
                quantity,
            } => self.set_quantity(product_id, *quantity),
            CartMutation::Remove(product_id) => {
                self.remove_item(product_id);
                Ok(())
            }
            CartMutation::Clear => {
                self.clear();
                Ok(())
            }
        }
    }

    /// Add an item to the cart.
    ///
    /// If the product is already present, its quantity is incremented;
    /// otherwise the item is appended, subject to the distinct-item capacity.
    pub fn add_item(&mut self, item: CartLineItem) -> Result<(), StorefrontError> {
        if item.quantity <= 0 {
            return Err(StorefrontError::InvalidQuantity(item.quantity));
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            existing.quantity = existing
                .quantity
                .checked_add(item.quantity)
                .ok_or(StorefrontError::Overflow)?;
            self.updated_at = current_timestamp();
            return Ok(());
        }

        if self.items.len() >= MAX_DISTINCT_ITEMS {
            return Err(StorefrontError::CapacityExceeded {
                count: self.items.len(),
                limit: MAX_DISTINCT_ITEMS,
            });
        }

        self.items.push(item);
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Replace a line's quantity.
    ///
    /// A quantity of zero or below is equivalent to [`Cart::remove_item`].
    /// Fails when the product is absent and the quantity is positive.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), StorefrontError> {
        if quantity <= 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| &i.product_id == product_id)
            .ok_or_else(|| StorefrontError::ItemNotInCart(product_id.to_string()))?;
        item.quantity = quantity;
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Remove a line if present. Returns whether anything was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.updated_at = current_timestamp();
        }
        removed
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = current_timestamp();
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct product lines.
    pub fn distinct_count(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line by product id.
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }
}
