//! Mempool Capture — Pending-Transaction Feed
//!
//! Purpose:
//!     Abstract the node's pending-transaction subscription behind a
//!     trait so the capture loop can run against a scripted feed in
//!     tests. The live implementation subscribes over WebSocket for
//!     full transaction objects.
//!
//! Notes:
//!     - The live feed should sit on its own WS connection, separate
//!       from the one used for quotes and broadcast, to keep the
//!       subscription reader uncontended.
//!     - Unsubscribe is drop-based: dropping the stream tears down the
//!       server-side subscription on every exit path.

use alloy::providers::Provider;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;

use super::types::{CaptureError, PendingTx};

/// A subscribable source of pending transactions.
/// `subscribe` resolving Ok means the subscription is confirmed active.
#[async_trait]
pub trait PendingFeed: Send + Sync {
    async fn subscribe(&self) -> Result<BoxStream<'static, PendingTx>, CaptureError>;
}

// Shared handles subscribe like the feed itself; the orchestrator keeps
// one while the spawned listener owns another.
#[async_trait]
impl<F: PendingFeed> PendingFeed for std::sync::Arc<F> {
    async fn subscribe(&self) -> Result<BoxStream<'static, PendingTx>, CaptureError> {
        (**self).subscribe().await
    }
}

/// Live feed over a WebSocket provider. Items that fail to deserialize
/// are dropped inside the subscription layer; they never reach the
/// capture loop.
pub struct WsPendingFeed<P> {
    provider: P,
}

impl<P> WsPendingFeed<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider + 'static> PendingFeed for WsPendingFeed<P> {
    async fn subscribe(&self) -> Result<BoxStream<'static, PendingTx>, CaptureError> {
        let sub = self
            .provider
            .subscribe_full_pending_transactions()
            .await
            .map_err(|e| CaptureError::Subscribe(e.into()))?;

        Ok(sub
            .into_stream()
            .map(|tx| PendingTx::from_rpc(&tx))
            .boxed())
    }
}
