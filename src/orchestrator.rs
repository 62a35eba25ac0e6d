//! Run Orchestrator
//!
//! Purpose:
//!     Tie the capture engine and the swap submitter together: start
//!     the listener as a background task, block on its readiness signal
//!     (so no swap is broadcast before the subscription exists), then
//!     issue a fixed number of test swaps with weighted random
//!     notionals, and finally collect the listener's result.
//!
//! Sequencing:
//!     readiness strictly precedes the first submission. Beyond that no
//!     ordering is guaranteed between a submission completing and the
//!     feed observing it — a swap may show up arbitrarily late, or not
//!     at all before the deadline, and that is a normal outcome.
//!
//! Error policy:
//!     a failed submission is logged and skipped; remaining swaps still
//!     run, since the listener is independently bounded. Listener
//!     failures are fatal to the run.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::U256;
use rand::Rng;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::mempool::{CaptureCriteria, CaptureError, MempoolListener, PendingFeed};
use crate::swap::SubmitSwap;
use crate::types::CaptureRun;

// Weighted notional ranges (ETH): mostly small retail-sized swaps with
// the occasional larger one, to emulate varied trading activity.
const COMMON_RANGE_ETH: (f64, f64) = (0.0003, 0.002);
const LARGE_RANGE_ETH: (f64, f64) = (0.005, 0.02);
const LARGE_PROBABILITY: f64 = 0.1;

const WEI_PER_MICROETH: u64 = 1_000_000_000_000;

/// How much test traffic to generate after readiness.
#[derive(Debug, Clone)]
pub struct SwapPlan {
    pub count: usize,
    /// Pause between submissions, to avoid overwhelming the node.
    pub pause: Duration,
}

/// Drives one capture run end to end.
pub struct Orchestrator<F, S> {
    feed: Arc<F>,
    submitter: S,
    criteria: CaptureCriteria,
    plan: SwapPlan,
}

impl<F, S> Orchestrator<F, S>
where
    F: PendingFeed + 'static,
    S: SubmitSwap,
{
    pub fn new(feed: Arc<F>, submitter: S, criteria: CaptureCriteria, plan: SwapPlan) -> Self {
        Self {
            feed,
            submitter,
            criteria,
            plan,
        }
    }

    pub async fn run(self) -> Result<CaptureRun, CaptureError> {
        let started = Instant::now();
        let requested = self.criteria.max_count;

        let (ready_tx, ready_rx) = oneshot::channel();
        let feed = Arc::clone(&self.feed);
        let criteria = self.criteria.clone();
        let handle = tokio::spawn(async move {
            MempoolListener::new(feed, criteria).capture(ready_tx).await
        });

        // The listener only drops the sender without firing on a
        // subscription failure — surface that instead of submitting
        // swaps nobody is watching for.
        if ready_rx.await.is_err() {
            return match handle.await {
                Ok(Err(e)) => Err(e),
                Ok(Ok(_)) => Err(CaptureError::Subscribe(anyhow::anyhow!(
                    "listener exited before confirming the subscription"
                ))),
                Err(join) => Err(CaptureError::ListenerGone(join.into())),
            };
        }
        info!(
            "Subscription confirmed — submitting {} test swaps",
            self.plan.count
        );

        let mut submitted = Vec::with_capacity(self.plan.count);
        let mut failed_submissions = 0usize;
        for i in 0..self.plan.count {
            let amount = draw_notional(&mut rand::thread_rng());
            match self.submitter.submit(amount).await {
                Ok(hash) => {
                    info!("Swap {}/{} broadcast: {}", i + 1, self.plan.count, hash);
                    submitted.push(hash);
                }
                Err(e) => {
                    warn!(
                        "Swap {}/{} failed ({}), continuing with the rest",
                        i + 1,
                        self.plan.count,
                        e
                    );
                    failed_submissions += 1;
                }
            }
            tokio::time::sleep(self.plan.pause).await;
        }

        let captured = match handle.await {
            Ok(result) => result?,
            Err(join) => return Err(CaptureError::ListenerGone(join.into())),
        };

        Ok(CaptureRun {
            captured,
            requested,
            submitted,
            failed_submissions,
            elapsed: started.elapsed(),
        })
    }
}

/// Draw a per-swap notional in wei: 90% from the small range, 10% from
/// the large one, rounded to whole microether.
fn draw_notional<R: Rng>(rng: &mut R) -> U256 {
    let eth = if rng.gen_bool(LARGE_PROBABILITY) {
        rng.gen_range(LARGE_RANGE_ETH.0..LARGE_RANGE_ETH.1)
    } else {
        rng.gen_range(COMMON_RANGE_ETH.0..COMMON_RANGE_ETH.1)
    };
    let microeth = (eth * 1e6).round() as u64;
    U256::from(microeth) * U256::from(WEI_PER_MICROETH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mempool::PendingTx;
    use crate::swap::SubmitError;
    use alloy::primitives::{address, Address, Bytes, TxHash};
    use async_trait::async_trait;
    use futures::stream::{self, BoxStream, StreamExt};
    use std::sync::Mutex;

    const ROUTER: Address = address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D");

    fn criteria(max_count: usize, max_secs: u64) -> CaptureCriteria {
        CaptureCriteria {
            router: ROUTER,
            max_count,
            max_duration: Duration::from_secs(max_secs),
            require_known_selector: false,
        }
    }

    fn plan(count: usize) -> SwapPlan {
        SwapPlan {
            count,
            pause: Duration::from_millis(500),
        }
    }

    fn pending(tag: u8) -> PendingTx {
        PendingTx {
            hash: TxHash::repeat_byte(tag),
            from: address!("00000000000000000000000000000000000000f0"),
            to: Some(ROUTER),
            input: Bytes::from(vec![0x7f, 0xf3, 0x6a, 0xb5]),
            value: U256::from(1u64),
            gas_price: None,
            max_fee_per_gas: 30_000_000_000,
            max_priority_fee_per_gas: Some(2_000_000_000),
        }
    }

    /// Feed that confirms after a delay and then replays scripted events,
    /// recording when the subscription was confirmed.
    struct InstrumentedFeed {
        confirm_after: Duration,
        confirmed_at: Mutex<Option<Instant>>,
        events: Vec<(Duration, PendingTx)>,
    }

    #[async_trait]
    impl PendingFeed for InstrumentedFeed {
        async fn subscribe(&self) -> Result<BoxStream<'static, PendingTx>, CaptureError> {
            tokio::time::sleep(self.confirm_after).await;
            *self.confirmed_at.lock().unwrap() = Some(Instant::now());
            let events = self.events.clone();
            Ok(stream::iter(events)
                .then(|(delay, tx)| async move {
                    tokio::time::sleep(delay).await;
                    tx
                })
                .chain(stream::pending())
                .boxed())
        }
    }

    struct RefusingFeed;

    #[async_trait]
    impl PendingFeed for RefusingFeed {
        async fn subscribe(&self) -> Result<BoxStream<'static, PendingTx>, CaptureError> {
            Err(CaptureError::Subscribe(anyhow::anyhow!("no pubsub")))
        }
    }

    /// Submitter that records call instants and amounts, failing on the
    /// configured attempt numbers (1-based).
    struct RecordingSubmitter {
        calls: Arc<Mutex<Vec<(Instant, U256)>>>,
        fail_on: Vec<usize>,
    }

    #[async_trait]
    impl SubmitSwap for RecordingSubmitter {
        async fn submit(&self, amount_in_wei: U256) -> Result<TxHash, SubmitError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((Instant::now(), amount_in_wei));
            let attempt = calls.len();
            if self.fail_on.contains(&attempt) {
                return Err(SubmitError::Broadcast(anyhow::anyhow!("node rejected")));
            }
            Ok(TxHash::repeat_byte(attempt as u8))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn no_submission_before_readiness() {
        let confirm_after = Duration::from_millis(400);
        let feed = Arc::new(InstrumentedFeed {
            confirm_after,
            confirmed_at: Mutex::new(None),
            events: vec![(Duration::from_millis(100), pending(0x10))],
        });
        let calls = Arc::new(Mutex::new(Vec::new()));
        let submitter = RecordingSubmitter {
            calls: Arc::clone(&calls),
            fail_on: vec![],
        };

        let run = Orchestrator::new(Arc::clone(&feed), submitter, criteria(1, 5), plan(2))
            .run()
            .await
            .unwrap();

        let confirmed_at = feed.confirmed_at.lock().unwrap().unwrap();
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(at, _)| *at >= confirmed_at));
        assert_eq!(run.captured.len(), 1);
        assert_eq!(run.submitted.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_submission_skips_and_continues() {
        let feed = Arc::new(InstrumentedFeed {
            confirm_after: Duration::ZERO,
            confirmed_at: Mutex::new(None),
            events: vec![
                (Duration::from_millis(200), pending(0x10)),
                (Duration::from_millis(200), pending(0x11)),
            ],
        });
        let calls = Arc::new(Mutex::new(Vec::new()));
        let submitter = RecordingSubmitter {
            calls: Arc::clone(&calls),
            fail_on: vec![2],
        };

        let run = Orchestrator::new(feed, submitter, criteria(2, 5), plan(3))
            .run()
            .await
            .unwrap();

        // Attempts #1 and #3 still ran; the capture window was unaffected.
        assert_eq!(calls.lock().unwrap().len(), 3);
        assert_eq!(run.failed_submissions, 1);
        assert_eq!(
            run.submitted,
            vec![TxHash::repeat_byte(1), TxHash::repeat_byte(3)]
        );
        assert_eq!(run.captured.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn subscription_failure_fails_the_run_before_any_swap() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let submitter = RecordingSubmitter {
            calls: Arc::clone(&calls),
            fail_on: vec![],
        };

        let err = Orchestrator::new(Arc::new(RefusingFeed), submitter, criteria(2, 5), plan(3))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, CaptureError::Subscribe(_)));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn run_reports_requested_versus_captured() {
        // Deadline ends the window with fewer matches than requested.
        let feed = Arc::new(InstrumentedFeed {
            confirm_after: Duration::ZERO,
            confirmed_at: Mutex::new(None),
            events: vec![(Duration::from_millis(100), pending(0x10))],
        });
        let submitter = RecordingSubmitter {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on: vec![],
        };

        let run = Orchestrator::new(feed, submitter, criteria(5, 2), plan(1))
            .run()
            .await
            .unwrap();

        assert_eq!(run.requested, 5);
        assert_eq!(run.captured.len(), 1);
    }

    #[test]
    fn notional_draws_stay_inside_the_weighted_ranges() {
        let mut rng = rand::thread_rng();
        let common_lo = U256::from(300u64) * U256::from(WEI_PER_MICROETH);
        let large_hi = U256::from(20_000u64) * U256::from(WEI_PER_MICROETH);
        for _ in 0..1_000 {
            let wei = draw_notional(&mut rng);
            assert!(wei >= common_lo && wei <= large_hi);
            // Whole microether, as submitted amounts are rounded.
            assert_eq!(wei % U256::from(WEI_PER_MICROETH), U256::ZERO);
        }
    }
}
