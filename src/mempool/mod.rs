//! Mempool Capture Module
//!
//! Purpose:
//!     Observe the node's pending-transaction feed and capture swaps
//!     addressed to the configured router, bounded by a count threshold
//!     and a wall-clock deadline.
//!
//! Architecture:
//!     types.rs    — PendingTx, CaptureCriteria, CapturedSwap, CaptureError
//!     feed.rs     — PendingFeed trait + live WS implementation
//!     filter.rs   — destination/selector matching
//!     listener.rs — readiness hand-off + select-driven capture loop

pub mod feed;
pub mod filter;
pub mod listener;
pub mod types;

pub use feed::{PendingFeed, WsPendingFeed};
pub use listener::MempoolListener;
pub use types::{CaptureCriteria, CaptureError, CapturedSwap, PendingTx};
