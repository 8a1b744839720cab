//! Store-backed cart reconciliation.
//!
//! Every mutation is a read-modify-write: read the persisted cart, apply the
//! mutation in memory, write the full replacement item sequence back. There
//! is no partial-item patch and no concurrency token, so concurrent writers
//! for the same user are last-write-wins (documented limitation).

use crate::cart::{Cart, CartLineItem, CartMutation};
use crate::catalog::CatalogReader;
use crate::collections;
use crate::current_timestamp;
use crate::error::StorefrontError;
use crate::ids::{CartId, ProductId, UserId};
use ratana_store::{fields, with_retry, Document, DocumentStore, Filter, RetryPolicy};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reconciles cart mutations against the persisted cart document.
#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn DocumentStore>,
    catalog: CatalogReader,
    retry: RetryPolicy,
}

impl CartService {
    /// Create a cart service with the default read-retry policy.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            catalog: CatalogReader::new(store.clone()),
            store,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the read-retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch the user's cart, returning an empty one when none is persisted.
    pub async fn fetch(&self, owner: &UserId) -> Result<Cart, StorefrontError> {
        let (cart, _) = self.load(owner).await?;
        Ok(cart)
    }

    /// Apply a mutation and persist the resulting item sequence.
    ///
    /// Returns the cart as written. On error nothing is persisted; callers
    /// holding an optimistic local copy should resync from the store.
    pub async fn apply(
        &self,
        owner: &UserId,
        mutation: CartMutation,
    ) -> Result<Cart, StorefrontError> {
        let (mut cart, persisted) = self.load(owner).await?;
        cart.apply(&mutation)?;

        if let Some(product_id) = mutated_product(&mutation) {
            self.check_stock(&cart, product_id).await?;
        }

        // A cart document is created lazily on first add; a remove or clear
        // against a user with no cart document writes nothing.
        if !persisted && cart.is_empty() {
            return Ok(cart);
        }

        self.persist(&cart, persisted).await?;
        Ok(cart)
    }

    /// Add an item, merging quantities when the product is already present.
    pub async fn add_item(
        &self,
        owner: &UserId,
        item: CartLineItem,
    ) -> Result<Cart, StorefrontError> {
        self.apply(owner, CartMutation::Add(item)).await
    }

    /// Replace a line's quantity; zero or below removes the line.
    pub async fn set_quantity(
        &self,
        owner: &UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Cart, StorefrontError> {
        self.apply(
            owner,
            CartMutation::SetQuantity {
                product_id,
                quantity,
            },
        )
        .await
    }

    /// Remove a line; no-op if absent.
    pub async fn remove_item(
        &self,
        owner: &UserId,
        product_id: ProductId,
    ) -> Result<Cart, StorefrontError> {
        self.apply(owner, CartMutation::Remove(product_id)).await
    }

    /// Empty the cart.
    pub async fn clear(&self, owner: &UserId) -> Result<Cart, StorefrontError> {
        self.apply(owner, CartMutation::Clear).await
    }

    async fn load(&self, owner: &UserId) -> Result<(Cart, bool), StorefrontError> {
        let filters = [Filter::equal("userId", owner.as_str())];
        let docs = with_retry(&self.retry, || {
            self.store.list(collections::CARTS, &filters)
        })
        .await?;

        match docs.into_iter().next() {
            Some(doc) => Ok((cart_from_document(owner.clone(), &doc), true)),
            None => Ok((Cart::new(owner.clone()), false)),
        }
    }

    /// Reject a mutation that would take a line past the product's live stock.
    ///
    /// The check fails open: a missing product document, a product without a
    /// `stock` field, or a failed lookup all skip the check, mirroring the
    /// fail-open pricing policy.
    async fn check_stock(
        &self,
        cart: &Cart,
        product_id: &ProductId,
    ) -> Result<(), StorefrontError> {
        let requested = match cart.get(product_id) {
            Some(line) => line.quantity,
            // The mutation removed the line; nothing to check.
            None => return Ok(()),
        };

        let product = match self.catalog.product(product_id).await {
            Ok(product) => product,
            Err(err) => {
                warn!(%product_id, %err, "stock lookup failed; skipping check");
                return Ok(());
            }
        };

        match product.and_then(|p| p.stock) {
            Some(available) if requested > available => Err(StorefrontError::InsufficientStock {
                product_id: product_id.to_string(),
                requested,
                available,
            }),
            _ => Ok(()),
        }
    }

    async fn persist(&self, cart: &Cart, persisted: bool) -> Result<(), StorefrontError> {
        let items = encode_items(&cart.items);
        debug!(owner = %cart.owner, lines = items.len(), "writing cart");

        if persisted {
            self.store
                .update(
                    collections::CARTS,
                    cart.id.as_str(),
                    fields! {
                        "items" => items,
                        "updatedAt" => cart.updated_at,
                    },
                )
                .await?;
        } else {
            self.store
                .create(
                    collections::CARTS,
                    cart.id.as_str(),
                    fields! {
                        "userId" => cart.owner.as_str(),
                        "items" => items,
                        "createdAt" => current_timestamp(),
                        "updatedAt" => cart.updated_at,
                    },
                )
                .await?;
        }
        Ok(())
    }
}

fn mutated_product(mutation: &CartMutation) -> Option<&ProductId> {
    match mutation {
        CartMutation::Add(item) => Some(&item.product_id),
        CartMutation::SetQuantity { product_id, .. } => Some(product_id),
        CartMutation::Remove(_) | CartMutation::Clear => None,
    }
}

fn cart_from_document(owner: UserId, doc: &Document) -> Cart {
    Cart {
        id: CartId::new(&doc.id),
        owner,
        items: decode_items(&doc.str_array_field("items")),
        updated_at: doc.i64_field("updatedAt").unwrap_or(0),
    }
}

/// Serialize line items as individual JSON-encoded strings, the cart
/// document's wire format.
fn encode_items(items: &[CartLineItem]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match serde_json::to_string(item) {
            Ok(encoded) => Some(encoded),
            Err(err) => {
                warn!(product_id = %item.product_id, %err, "dropping unserializable cart line");
                None
            }
        })
        .collect()
}

/// Parse stored line items, skipping malformed entries rather than failing
/// the whole read.
fn decode_items(raw: &[String]) -> Vec<CartLineItem> {
    raw.iter()
        .filter_map(|entry| match serde_json::from_str::<CartLineItem>(entry) {
            Ok(item) if item.quantity > 0 => Some(item),
            Ok(item) => {
                warn!(product_id = %item.product_id, quantity = item.quantity, "skipping cart line with invalid quantity");
                None
            }
            Err(err) => {
                warn!(%err, "skipping malformed cart line");
                None
            }
        })
        .collect()
}
