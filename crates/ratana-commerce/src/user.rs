//! User profile reads and the loyalty ("Ratana Cash") balance.

use crate::collections;
use crate::current_timestamp;
use crate::error::StorefrontError;
use crate::ids::UserId;
use crate::money::Money;
use ratana_store::{fields, Document, DocumentStore, Filter, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where an order ships to, read from the user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryAddress {
    /// Recipient name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// Postal code, the key for serviceability and price adjustment.
    pub pincode: String,
}

/// Reads and updates user profile documents.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn DocumentStore>,
}

impl UserDirectory {
    /// Create a directory over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The user's delivery address, if one is on file.
    ///
    /// A profile without a street address or pincode counts as no address:
    /// checkout must not ship to a blank destination.
    pub async fn delivery_address(
        &self,
        user: &UserId,
    ) -> Result<Option<DeliveryAddress>, StorefrontError> {
        let doc = match self.profile_document(user).await? {
            Some(doc) => doc,
            None => return Ok(None),
        };

        let address = DeliveryAddress {
            name: doc.str_field("name").unwrap_or_default().to_string(),
            phone: doc.str_field("phone").unwrap_or_default().to_string(),
            address: doc.str_field("address").unwrap_or_default().to_string(),
            pincode: doc.str_field("pincode").unwrap_or_default().to_string(),
        };

        if address.address.is_empty() || address.pincode.is_empty() {
            return Ok(None);
        }
        Ok(Some(address))
    }

    /// The user's loyalty balance; zero when no profile or field exists.
    pub async fn loyalty_balance(&self, user: &UserId) -> Result<Money, StorefrontError> {
        Ok(self
            .profile_document(user)
            .await?
            .and_then(|doc| doc.i64_field("ratanaCash"))
            .map(Money::from_storage)
            .unwrap_or_else(Money::zero))
    }

    /// Deduct spent loyalty credit from the user's balance.
    ///
    /// The balance never goes negative; a debit beyond the current balance
    /// clamps to zero.
    pub async fn debit_loyalty(&self, user: &UserId, amount: Money) -> Result<(), StorefrontError> {
        let doc = self
            .profile_document(user)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: collections::USERS.to_string(),
                id: user.to_string(),
            })?;

        let balance = doc
            .i64_field("ratanaCash")
            .map(Money::from_storage)
            .unwrap_or_else(Money::zero);
        let remaining = balance.try_subtract(amount).unwrap_or_else(Money::zero).max(Money::zero());

        self.store
            .update(
                collections::USERS,
                &doc.id,
                fields! {
                    "ratanaCash" => remaining.to_storage(),
                    "updatedAt" => current_timestamp(),
                },
            )
            .await?;
        Ok(())
    }

    async fn profile_document(&self, user: &UserId) -> Result<Option<Document>, StorefrontError> {
        let docs = self
            .store
            .list(collections::USERS, &[Filter::equal("userId", user.as_str())])
            .await?;
        Ok(docs.into_iter().next())
    }
}
