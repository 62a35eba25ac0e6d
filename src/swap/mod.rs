//! Swap Submission Module
//!
//! Builds and broadcasts the probe's own router swaps — the traffic
//! the mempool listener is expected to capture.

pub mod submitter;

pub use submitter::{RouterSwapSubmitter, SubmitError, SubmitSwap};
