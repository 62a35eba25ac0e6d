//! Mempool Capture — Listener Loop
//!
//! Purpose:
//!     Subscribe to the pending-transaction feed, signal readiness once
//!     the subscription is confirmed, accumulate router-bound swaps in
//!     arrival order, and terminate on the count threshold or the
//!     wall-clock deadline — whichever fires first.
//!
//! Termination:
//!     Both conditions resolve inside a single `tokio::select!` loop,
//!     so finalization is exactly-once by construction: one task owns
//!     the result, and the first condition to complete ends the loop.
//!     No transaction is accepted after that point even if the feed has
//!     more queued.
//!
//! Usage:
//!     Spawned as a background task by the orchestrator; the readiness
//!     sender fires exactly once, before any traffic should be
//!     generated against the watched router.

use futures::StreamExt;
use tokio::sync::oneshot;
use tracing::{debug, info};

use super::feed::PendingFeed;
use super::filter;
use super::types::{CaptureCriteria, CaptureError, CapturedSwap};

/// Capture engine over an injected pending-transaction feed.
pub struct MempoolListener<F> {
    feed: F,
    criteria: CaptureCriteria,
}

impl<F: PendingFeed> MempoolListener<F> {
    pub fn new(feed: F, criteria: CaptureCriteria) -> Self {
        Self { feed, criteria }
    }

    /// Run the capture to completion. `ready` fires exactly once, after
    /// the subscription is confirmed and before any event is consumed.
    /// Returns accepted swaps in arrival order; the deadline expiring
    /// with fewer than `max_count` matches (including zero) is a normal
    /// outcome, not an error.
    pub async fn capture(
        self,
        ready: oneshot::Sender<()>,
    ) -> Result<Vec<CapturedSwap>, CaptureError> {
        let criteria = self.criteria;
        let mut stream = self.feed.subscribe().await?;

        // Orchestrator may have gone away; capture still proceeds.
        let _ = ready.send(());
        info!(
            "Mempool capture active | router={} | max_count={} | max_seconds={}",
            criteria.router,
            criteria.max_count,
            criteria.max_duration.as_secs()
        );

        let mut captured: Vec<CapturedSwap> = Vec::with_capacity(criteria.max_count);
        if criteria.max_count == 0 {
            return Ok(captured);
        }

        let deadline = tokio::time::sleep(criteria.max_duration);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => {
                    info!(
                        "Capture deadline reached: {}/{} swaps observed",
                        captured.len(),
                        criteria.max_count
                    );
                    break;
                }

                maybe_tx = stream.next() => {
                    let tx = match maybe_tx {
                        Some(tx) => tx,
                        None => return Err(CaptureError::StreamClosed),
                    };

                    let Some(swap) = filter::classify(&tx, &criteria) else {
                        continue;
                    };

                    debug!(
                        "Captured router swap {} | fn={} | gas_price={}",
                        swap.tx_hash,
                        swap.function.unwrap_or("?"),
                        swap.effective_gas_price
                    );
                    captured.push(swap);

                    if captured.len() >= criteria.max_count {
                        info!("Capture count threshold reached: {} swaps", captured.len());
                        break;
                    }
                }
            }
        }

        // Dropping the stream unsubscribes from the feed.
        Ok(captured)
    }
}
