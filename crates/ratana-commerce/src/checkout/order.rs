//! Order types.

use crate::cart::CartLineItem;
use crate::error::StorefrontError;
use crate::ids::{OrderId, UserId};
use crate::money::Money;
use crate::user::DeliveryAddress;
use ratana_store::{Document, Fields};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A completed order: an immutable snapshot of the cart at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Purchasing user.
    pub user_id: UserId,
    /// Snapshot of the cart's line items.
    pub items: Vec<CartLineItem>,
    /// Payable total after location adjustment and loyalty credit.
    pub total_amount: Money,
    /// Loyalty credit applied to this order.
    pub cash_used: Money,
    /// Where the order ships.
    pub delivery_address: DeliveryAddress,
    /// Unix timestamp of placement.
    pub created_at: i64,
}

impl Order {
    /// The document fields this order persists as.
    ///
    /// Line items use the same wire format as the cart document: individual
    /// JSON-encoded strings in an array field.
    pub fn to_fields(&self) -> Result<Fields, StorefrontError> {
        let items: Vec<Value> = self
            .items
            .iter()
            .map(|item| serde_json::to_string(item).map(Value::String))
            .collect::<Result<_, _>>()?;

        let mut fields = Fields::new();
        fields.insert("userId".to_string(), Value::from(self.user_id.as_str()));
        fields.insert("items".to_string(), Value::Array(items));
        fields.insert(
            "totalAmount".to_string(),
            Value::from(self.total_amount.to_storage()),
        );
        fields.insert(
            "cashUsed".to_string(),
            Value::from(self.cash_used.to_storage()),
        );
        fields.insert(
            "deliveryAddress".to_string(),
            serde_json::to_value(&self.delivery_address)?,
        );
        fields.insert("createdAt".to_string(), Value::from(self.created_at));
        Ok(fields)
    }

    /// Rebuild an order from its stored document, for order-history reads.
    pub fn from_document(doc: &Document) -> Result<Order, StorefrontError> {
        let items = doc
            .str_array_field("items")
            .iter()
            .filter_map(|entry| serde_json::from_str::<CartLineItem>(entry).ok())
            .collect();

        let delivery_address = doc
            .field("deliveryAddress")
            .cloned()
            .map(serde_json::from_value)
            .transpose()?
            .unwrap_or(DeliveryAddress {
                name: String::new(),
                phone: String::new(),
                address: String::new(),
                pincode: String::new(),
            });

        Ok(Order {
            id: OrderId::new(&doc.id),
            user_id: UserId::new(doc.str_field("userId").unwrap_or_default()),
            items,
            total_amount: Money::from_storage(doc.i64_field("totalAmount").unwrap_or(0)),
            cash_used: Money::from_storage(doc.i64_field("cashUsed").unwrap_or(0)),
            delivery_address,
            created_at: doc.i64_field("createdAt").unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;

    fn sample_order() -> Order {
        Order {
            id: OrderId::new("o1"),
            user_id: UserId::new("u1"),
            items: vec![CartLineItem::new(
                ProductId::new("p1"),
                "Tea",
                Money::from_rupees(100),
                2,
                "https://img.example/tea.jpg",
            )],
            total_amount: Money::from_rupees(220),
            cash_used: Money::from_rupees(30),
            delivery_address: DeliveryAddress {
                name: "Asha".into(),
                phone: "9000000000".into(),
                address: "12 MG Road".into(),
                pincode: "560001".into(),
            },
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_fields_roundtrip() {
        let order = sample_order();
        let doc = Document::new("o1", order.to_fields().unwrap());
        let restored = Order::from_document(&doc).unwrap();
        assert_eq!(restored, order);
    }

    #[test]
    fn test_items_encode_as_json_strings() {
        let order = sample_order();
        let fields = order.to_fields().unwrap();
        let items = fields.get("items").unwrap().as_array().unwrap();
        assert!(items[0].is_string());
        assert!(items[0].as_str().unwrap().contains("\"productId\":\"p1\""));
    }
}
