//! Optimistic local cart mirroring.

use crate::cart::{Cart, CartMutation, CartService};
use crate::error::StorefrontError;
use crate::ids::UserId;

/// An in-memory copy of a cart for responsive UIs.
///
/// The caller applies a mutation locally for immediate feedback, then issues
/// the same mutation through [`CartService`]. If the persisted write fails,
/// [`CartMirror::resync`] rolls the local copy back to the authoritative
/// stored state.
#[derive(Debug, Clone)]
pub struct CartMirror {
    cart: Cart,
}

impl CartMirror {
    /// Mirror an already-fetched cart.
    pub fn new(cart: Cart) -> Self {
        Self { cart }
    }

    /// Fetch the user's cart and mirror it.
    pub async fn load(service: &CartService, owner: &UserId) -> Result<Self, StorefrontError> {
        Ok(Self::new(service.fetch(owner).await?))
    }

    /// The current local view.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Apply a mutation to the local copy only.
    pub fn apply_local(&mut self, mutation: &CartMutation) -> Result<(), StorefrontError> {
        self.cart.apply(mutation)
    }

    /// Apply a mutation locally and persist it.
    ///
    /// On persisted-write failure the local copy is rolled back by re-reading
    /// the authoritative state, and the original error is returned.
    pub async fn apply(
        &mut self,
        service: &CartService,
        mutation: CartMutation,
    ) -> Result<(), StorefrontError> {
        self.cart.apply(&mutation)?;
        match service.apply(&self.cart.owner, mutation).await {
            Ok(written) => {
                self.cart = written;
                Ok(())
            }
            Err(err) => {
                self.resync(service).await?;
                Err(err)
            }
        }
    }

    /// Replace the local copy with the authoritative stored state.
    pub async fn resync(&mut self, service: &CartService) -> Result<(), StorefrontError> {
        self.cart = service.fetch(&self.cart.owner).await?;
        Ok(())
    }
}
