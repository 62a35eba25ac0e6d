//! Mempool Capture Probe Library
//!
//! Observes a node's pending-transaction feed for swaps addressed to a
//! DEX router while submitting its own test swaps to generate that
//! traffic, then reports the captured set ranked by gas price.

pub mod config;
pub mod contracts;
pub mod mempool;
pub mod orchestrator;
pub mod report;
pub mod swap;
pub mod types;

// Re-export commonly used types
pub use config::load_config_from_file;
pub use mempool::{
    CaptureCriteria, CaptureError, CapturedSwap, MempoolListener, PendingFeed, PendingTx,
    WsPendingFeed,
};
pub use orchestrator::{Orchestrator, SwapPlan};
pub use report::CaptureReport;
pub use swap::{RouterSwapSubmitter, SubmitError, SubmitSwap};
pub use types::{CaptureRun, ProbeConfig};
