//! Postal-code serviceability and price-multiplier resolution.
//!
//! Lookups here never propagate store errors: missing location data must not
//! block a purchase, only disable dynamic pricing. Pricing fails open to the
//! neutral multiplier; serviceability fails closed, since shipping must not
//! be promised to an unconfirmed area.

use crate::collections;
use crate::ids::PincodeId;
use crate::money::Money;
use ratana_store::{DocumentStore, Filter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// The neutral multiplier applied when no location data resolves.
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

/// A serviceable postal code, read-only to this core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PincodeRecord {
    /// Document id.
    pub id: PincodeId,
    /// Six-digit postal code.
    pub pincode: String,
    /// Whether the record is live.
    pub is_active: bool,
}

/// A per-area price multiplier, read-only to this core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceMultiplierRecord {
    /// Document id.
    pub id: String,
    /// Id of the pincode document this multiplier applies to.
    pub pincode_id: PincodeId,
    /// Scalar applied to base prices; must be positive.
    pub multiplier_value: f64,
    /// Whether the record is live.
    pub is_active: bool,
}

/// Maps a delivery postal code to serviceability and a price multiplier.
#[derive(Clone)]
pub struct PincodeResolver {
    store: Arc<dyn DocumentStore>,
}

impl PincodeResolver {
    /// Create a resolver over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Resolve the price multiplier for a postal code.
    ///
    /// Returns the active multiplier referencing the active pincode record,
    /// or [`NEUTRAL_MULTIPLIER`] when either record is missing, inactive,
    /// non-positive, or the lookup fails.
    pub async fn resolve_multiplier(&self, pincode: &str) -> f64 {
        let record = match self.lookup_pincode(pincode).await {
            Some(record) => record,
            None => return NEUTRAL_MULTIPLIER,
        };

        match self.lookup_multiplier(&record.id).await {
            Some(m) if m.multiplier_value > 0.0 => m.multiplier_value,
            Some(m) => {
                warn!(pincode, value = m.multiplier_value, "ignoring non-positive multiplier");
                NEUTRAL_MULTIPLIER
            }
            None => NEUTRAL_MULTIPLIER,
        }
    }

    /// Whether an active pincode record exists for the postal code.
    ///
    /// Lookup failures count as not serviceable.
    pub async fn is_serviceable(&self, pincode: &str) -> bool {
        self.lookup_pincode(pincode).await.is_some()
    }

    /// Adjusted price for a single product at this postal code.
    ///
    /// Convenience for product-display callers; order totals go through
    /// [`crate::pricing::adjusted_subtotal`] instead so adjustment is never
    /// applied twice.
    pub async fn display_price(&self, base: Money, pincode: &str) -> Money {
        let multiplier = self.resolve_multiplier(pincode).await;
        crate::pricing::adjust(base, multiplier)
    }

    async fn lookup_pincode(&self, pincode: &str) -> Option<PincodeRecord> {
        let docs = match self
            .store
            .list(collections::PINCODES, &[Filter::equal("pincode", pincode)])
            .await
        {
            Ok(docs) => docs,
            Err(err) => {
                warn!(pincode, %err, "pincode lookup failed");
                return None;
            }
        };

        docs.iter()
            .filter_map(|doc| match doc.deserialize::<PincodeRecord>() {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(doc_id = %doc.id, %err, "skipping malformed pincode record");
                    None
                }
            })
            .find(|record| record.is_active)
    }

    async fn lookup_multiplier(&self, pincode_id: &PincodeId) -> Option<PriceMultiplierRecord> {
        let docs = match self
            .store
            .list(
                collections::PRICE_MULTIPLIERS,
                &[Filter::equal("pincodeId", pincode_id.as_str())],
            )
            .await
        {
            Ok(docs) => docs,
            Err(err) => {
                warn!(%pincode_id, %err, "price multiplier lookup failed");
                return None;
            }
        };

        docs.iter()
            .filter_map(|doc| match doc.deserialize::<PriceMultiplierRecord>() {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(doc_id = %doc.id, %err, "skipping malformed multiplier record");
                    None
                }
            })
            .find(|record| record.is_active)
    }
}
