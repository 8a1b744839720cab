//! Push notification dispatch.
//!
//! The dispatcher is an injected capability, not a global singleton: the
//! orchestrator receives it explicitly. Every call site treats dispatch as
//! fire-and-forget; failures are logged and never block cart or checkout
//! operations.

use crate::ids::UserId;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Failure to hand a notification to the push transport.
#[derive(Error, Debug)]
#[error("Notification dispatch failed: {0}")]
pub struct DispatchError(pub String);

/// Delivers push notifications to a user's devices.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Send a notification. Transport and token management live behind the
    /// implementation.
    async fn notify(
        &self,
        user_id: &UserId,
        title: &str,
        body: &str,
        data: Value,
    ) -> Result<(), DispatchError>;
}

/// A dispatcher that drops notifications, for tests and headless callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDispatcher;

#[async_trait]
impl NotificationDispatcher for NoopDispatcher {
    async fn notify(
        &self,
        user_id: &UserId,
        title: &str,
        _body: &str,
        _data: Value,
    ) -> Result<(), DispatchError> {
        debug!(%user_id, title, "dropping notification (noop dispatcher)");
        Ok(())
    }
}
