//! End-to-end checkout tests over the in-memory store, including the
//! partial-failure paths after order creation.

use async_trait::async_trait;
use ratana_commerce::collections;
use ratana_commerce::notify::{DispatchError, NotificationDispatcher};
use ratana_commerce::prelude::*;
use ratana_store::{fields, Document, DocumentStore, Fields, Filter, MemoryStore, StoreError};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Wraps a MemoryStore and fails configured (operation, collection) pairs
/// with a transient error.
struct FlakyStore {
    inner: MemoryStore,
    failures: Mutex<HashSet<(&'static str, String)>>,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            failures: Mutex::new(HashSet::new()),
        }
    }

    fn fail_writes(&self, op: &'static str, collection: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert((op, collection.to_string()));
    }

    fn check(&self, op: &'static str, collection: &str) -> Result<(), StoreError> {
        if self
            .failures
            .lock()
            .unwrap()
            .contains(&(op, collection.to_string()))
        {
            return Err(StoreError::Transient(format!(
                "injected failure: {op} {collection}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        self.check("get", collection)?;
        self.inner.get(collection, id).await
    }

    async fn list(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, StoreError> {
        self.check("list", collection)?;
        self.inner.list(collection, filters).await
    }

    async fn create(&self, collection: &str, id: &str, f: Fields) -> Result<Document, StoreError> {
        self.check("create", collection)?;
        self.inner.create(collection, id, f).await
    }

    async fn update(&self, collection: &str, id: &str, f: Fields) -> Result<Document, StoreError> {
        self.check("update", collection)?;
        self.inner.update(collection, id, f).await
    }
}

/// Records every notification instead of sending it.
#[derive(Default)]
struct RecordingDispatcher {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingDispatcher {
    fn titles_for(&self, user: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == user)
            .map(|(_, t)| t.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn notify(
        &self,
        user_id: &UserId,
        title: &str,
        _body: &str,
        _data: Value,
    ) -> Result<(), DispatchError> {
        self.sent
            .lock()
            .unwrap()
            .push((user_id.to_string(), title.to_string()));
        Ok(())
    }
}

/// A dispatcher whose push transport is down.
struct FailingDispatcher;

#[async_trait]
impl NotificationDispatcher for FailingDispatcher {
    async fn notify(
        &self,
        _user_id: &UserId,
        _title: &str,
        _body: &str,
        _data: Value,
    ) -> Result<(), DispatchError> {
        Err(DispatchError("push transport down".to_string()))
    }
}

struct Fixture {
    store: Arc<FlakyStore>,
    dispatcher: Arc<RecordingDispatcher>,
    orchestrator: CheckoutOrchestrator,
    carts: CartService,
    user: UserId,
}

/// Seed a user in pincode 560001 (multiplier 1.1) with a given loyalty
/// balance in rupees.
async fn fixture(loyalty_rupees: i64) -> Fixture {
    let store = Arc::new(FlakyStore::new());
    let dispatcher = Arc::new(RecordingDispatcher::default());

    store
        .create(
            collections::USERS,
            "doc-u1",
            fields! {
                "userId" => "u1",
                "name" => "Asha",
                "phone" => "9000000000",
                "address" => "12 MG Road",
                "pincode" => "560001",
                "ratanaCash" => Money::from_rupees(loyalty_rupees).to_storage(),
            },
        )
        .await
        .unwrap();
    store
        .create(
            collections::PINCODES,
            "pin-1",
            fields! { "pincode" => "560001", "isActive" => true },
        )
        .await
        .unwrap();
    store
        .create(
            collections::PRICE_MULTIPLIERS,
            "mul-1",
            fields! { "pincodeId" => "pin-1", "multiplierValue" => 1.1, "isActive" => true },
        )
        .await
        .unwrap();

    let orchestrator = CheckoutOrchestrator::new(store.clone(), dispatcher.clone());
    let carts = CartService::new(store.clone());
    Fixture {
        store,
        dispatcher,
        orchestrator,
        carts,
        user: UserId::new("u1"),
    }
}

fn line(product_id: &str, rupees: i64, quantity: i64) -> CartLineItem {
    CartLineItem::new(
        ProductId::new(product_id),
        product_id.to_string(),
        Money::from_rupees(rupees),
        quantity,
        "https://img.example/p.jpg",
    )
}

async fn orders_for(store: &FlakyStore, user: &str) -> Vec<Order> {
    store
        .list(collections::ORDERS, &[Filter::equal("userId", user)])
        .await
        .unwrap()
        .iter()
        .map(|doc| Order::from_document(doc).unwrap())
        .collect()
}

#[tokio::test]
async fn checkout_applies_location_multiplier() {
    let fx = fixture(0).await;
    fx.carts.add_item(&fx.user, line("A", 100, 2)).await.unwrap();
    fx.carts.add_item(&fx.user, line("B", 50, 1)).await.unwrap();

    let outcome = fx
        .orchestrator
        .checkout(&fx.user, CheckoutOptions::default())
        .await
        .unwrap();

    // adjust(100, 1.1)*2 + adjust(50, 1.1)*1 = 110*2 + 55 = 275
    match outcome {
        CheckoutOutcome::Success { total, cash_used, .. } => {
            assert_eq!(total, Money::from_rupees(275));
            assert!(cash_used.is_zero());
        }
        other => panic!("expected full success, got {other:?}"),
    }

    // Cart cleared, order snapshot persisted.
    assert!(fx.carts.fetch(&fx.user).await.unwrap().is_empty());
    let orders = orders_for(&fx.store, "u1").await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].items.len(), 2);
    assert_eq!(orders[0].total_amount, Money::from_rupees(275));
    assert_eq!(orders[0].delivery_address.pincode, "560001");

    assert_eq!(fx.dispatcher.titles_for("u1"), vec!["Order placed"]);
}

#[tokio::test]
async fn loyalty_credit_caps_at_balance() {
    // orderTotal 500, balance 200 → cash 200, final 300, post balance 0.
    let fx = fixture(200).await;
    fx.carts.add_item(&fx.user, line("A", 250, 2)).await.unwrap();
    // Neutralize the multiplier so the total is exactly 500.
    fx.store
        .update(
            collections::PRICE_MULTIPLIERS,
            "mul-1",
            fields! { "multiplierValue" => 1.0 },
        )
        .await
        .unwrap();

    let outcome = fx
        .orchestrator
        .checkout(&fx.user, CheckoutOptions { use_loyalty_cash: true })
        .await
        .unwrap();

    match outcome {
        CheckoutOutcome::Success { total, cash_used, .. } => {
            assert_eq!(cash_used, Money::from_rupees(200));
            assert_eq!(total, Money::from_rupees(300));
        }
        other => panic!("expected full success, got {other:?}"),
    }

    let users = UserDirectory::new(fx.store.clone() as Arc<dyn DocumentStore>);
    assert!(users.loyalty_balance(&fx.user).await.unwrap().is_zero());
}

#[tokio::test]
async fn loyalty_credit_caps_at_total() {
    // orderTotal 100, balance 300 → cash 100, final 0, post balance 200.
    let fx = fixture(300).await;
    fx.carts.add_item(&fx.user, line("A", 100, 1)).await.unwrap();
    fx.store
        .update(
            collections::PRICE_MULTIPLIERS,
            "mul-1",
            fields! { "multiplierValue" => 1.0 },
        )
        .await
        .unwrap();

    let outcome = fx
        .orchestrator
        .checkout(&fx.user, CheckoutOptions { use_loyalty_cash: true })
        .await
        .unwrap();

    match outcome {
        CheckoutOutcome::Success { total, cash_used, .. } => {
            assert_eq!(cash_used, Money::from_rupees(100));
            assert!(total.is_zero());
        }
        other => panic!("expected full success, got {other:?}"),
    }

    let users = UserDirectory::new(fx.store.clone() as Arc<dyn DocumentStore>);
    assert_eq!(
        users.loyalty_balance(&fx.user).await.unwrap(),
        Money::from_rupees(200)
    );
}

#[tokio::test]
async fn missing_address_aborts_before_any_write() {
    let fx = fixture(0).await;
    fx.store
        .update(collections::USERS, "doc-u1", fields! { "pincode" => "" })
        .await
        .unwrap();
    fx.carts.add_item(&fx.user, line("A", 100, 1)).await.unwrap();

    let err = fx
        .orchestrator
        .checkout(&fx.user, CheckoutOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::AddressMissing(_)));

    assert!(orders_for(&fx.store, "u1").await.is_empty());
    assert_eq!(fx.carts.fetch(&fx.user).await.unwrap().item_count(), 1);
    assert!(fx.dispatcher.titles_for("u1").is_empty());
}

#[tokio::test]
async fn empty_cart_is_rejected() {
    let fx = fixture(0).await;
    let err = fx
        .orchestrator
        .checkout(&fx.user, CheckoutOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StorefrontError::EmptyCart));
}

#[tokio::test]
async fn failed_order_write_leaves_cart_intact() {
    let fx = fixture(0).await;
    fx.carts.add_item(&fx.user, line("A", 100, 2)).await.unwrap();
    fx.store.fail_writes("create", collections::ORDERS);

    let err = fx
        .orchestrator
        .checkout(&fx.user, CheckoutOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_transient());

    // Cart intact so the user can retry; no notification went out.
    assert_eq!(fx.carts.fetch(&fx.user).await.unwrap().item_count(), 2);
    assert!(fx.dispatcher.titles_for("u1").is_empty());
}

#[tokio::test]
async fn failed_loyalty_debit_is_partial_success() {
    let fx = fixture(200).await;
    fx.carts.add_item(&fx.user, line("A", 500, 1)).await.unwrap();
    fx.store.fail_writes("update", collections::USERS);

    let outcome = fx
        .orchestrator
        .checkout(&fx.user, CheckoutOptions { use_loyalty_cash: true })
        .await
        .unwrap();

    match &outcome {
        CheckoutOutcome::PartialSuccess { warnings, .. } => {
            assert!(matches!(warnings[0], CheckoutWarning::LoyaltyDebitFailed(_)));
        }
        other => panic!("expected partial success, got {other:?}"),
    }

    // The order stands even though the balance was not debited.
    assert_eq!(orders_for(&fx.store, "u1").await.len(), 1);
    assert!(fx.carts.fetch(&fx.user).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_cart_clear_is_partial_success() {
    let fx = fixture(0).await;
    fx.carts.add_item(&fx.user, line("A", 100, 1)).await.unwrap();
    fx.store.fail_writes("update", collections::CARTS);

    let outcome = fx
        .orchestrator
        .checkout(&fx.user, CheckoutOptions::default())
        .await
        .unwrap();

    assert!(outcome.is_partial());
    match &outcome {
        CheckoutOutcome::PartialSuccess { warnings, .. } => {
            assert!(matches!(warnings[0], CheckoutWarning::CartClearFailed(_)));
        }
        other => panic!("expected partial success, got {other:?}"),
    }
    assert_eq!(orders_for(&fx.store, "u1").await.len(), 1);
    // The notification still goes out: the order was placed.
    assert_eq!(fx.dispatcher.titles_for("u1"), vec!["Order placed"]);
}

#[tokio::test]
async fn failed_notification_does_not_degrade_checkout() {
    let fx = fixture(0).await;
    fx.carts.add_item(&fx.user, line("A", 100, 1)).await.unwrap();

    let orchestrator = CheckoutOrchestrator::new(
        fx.store.clone() as Arc<dyn DocumentStore>,
        Arc::new(FailingDispatcher),
    );
    let outcome = orchestrator
        .checkout(&fx.user, CheckoutOptions::default())
        .await
        .unwrap();

    // Dispatch failure is logged only: full success, no warnings, and every
    // persisted side effect of a healthy checkout.
    assert!(matches!(outcome, CheckoutOutcome::Success { .. }));
    assert_eq!(orders_for(&fx.store, "u1").await.len(), 1);
    assert!(fx.carts.fetch(&fx.user).await.unwrap().is_empty());
}

#[tokio::test]
async fn unresolved_pincode_checks_out_at_base_price() {
    let fx = fixture(0).await;
    fx.store
        .update(collections::USERS, "doc-u1", fields! { "pincode" => "123456" })
        .await
        .unwrap();
    fx.carts.add_item(&fx.user, line("A", 100, 2)).await.unwrap();

    let outcome = fx
        .orchestrator
        .checkout(&fx.user, CheckoutOptions::default())
        .await
        .unwrap();

    match outcome {
        CheckoutOutcome::Success { total, .. } => {
            assert_eq!(total, Money::from_rupees(200));
        }
        other => panic!("expected full success, got {other:?}"),
    }
}
