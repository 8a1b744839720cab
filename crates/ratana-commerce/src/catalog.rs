//! Product catalog reads.
//!
//! The catalog is owned by admin tooling and read-only to this core. Prices
//! persist in paise; [`Money`]'s transparent serialization is the conversion
//! boundary, so a product's price is never scaled twice.

use crate::cart::CartLineItem;
use crate::collections;
use crate::error::StorefrontError;
use crate::ids::ProductId;
use crate::money::Money;
use ratana_store::DocumentStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A catalog product, as much of it as cart and stock logic need.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Document id.
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Base unit price, unadjusted.
    #[serde(default)]
    pub price: Money,
    /// Product image.
    #[serde(default)]
    pub image_url: String,
    /// Units in stock; absent means stock is not tracked.
    #[serde(default)]
    pub stock: Option<i64>,
}

impl Product {
    /// Snapshot this product into a cart line at its base price.
    ///
    /// The line carries the unadjusted price; location adjustment happens at
    /// read time, never at write time.
    pub fn line_item(&self, quantity: i64) -> CartLineItem {
        CartLineItem::new(
            self.id.clone(),
            self.name.clone(),
            self.price,
            quantity,
            self.image_url.clone(),
        )
    }
}

/// Reads product documents.
#[derive(Clone)]
pub struct CatalogReader {
    store: Arc<dyn DocumentStore>,
}

impl CatalogReader {
    /// Create a reader over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Fetch a product; `None` when it does not exist.
    pub async fn product(&self, id: &ProductId) -> Result<Option<Product>, StorefrontError> {
        match self.store.get(collections::PRODUCTS, id.as_str()).await {
            Ok(doc) => Ok(Some(doc.deserialize()?)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratana_store::{fields, MemoryStore};

    #[tokio::test]
    async fn test_product_price_reads_paise() {
        let store = Arc::new(MemoryStore::new());
        store
            .create(
                collections::PRODUCTS,
                "p1",
                fields! { "name" => "Tea", "price" => 4999, "imageUrl" => "x", "stock" => 12 },
            )
            .await
            .unwrap();

        let catalog = CatalogReader::new(store);
        let product = catalog
            .product(&ProductId::new("p1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.price, Money::from_paise(4999));
        assert_eq!(product.stock, Some(12));
    }

    #[tokio::test]
    async fn test_missing_product_is_none() {
        let catalog = CatalogReader::new(Arc::new(MemoryStore::new()));
        assert!(catalog
            .product(&ProductId::new("ghost"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_line_item_snapshot() {
        let store = Arc::new(MemoryStore::new());
        store
            .create(
                collections::PRODUCTS,
                "p1",
                fields! { "name" => "Tea", "price" => 10_000 },
            )
            .await
            .unwrap();

        let catalog = CatalogReader::new(store);
        let product = catalog
            .product(&ProductId::new("p1"))
            .await
            .unwrap()
            .unwrap();
        let line = product.line_item(3);
        assert_eq!(line.unit_price, Money::from_rupees(100));
        assert_eq!(line.quantity, 3);
        assert_eq!(line.name, "Tea");
    }
}
