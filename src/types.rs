// Core configuration and run-result structures.

use alloy::primitives::{Address, TxHash};
use std::path::PathBuf;
use std::time::Duration;

use crate::mempool::{CaptureCriteria, CapturedSwap};
use crate::orchestrator::SwapPlan;

/// Probe configuration, loaded from a dotenv file.
/// Everything external — no addresses or credentials hardcoded in the core.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    // Network
    pub ws_rpc_url: String,
    pub chain_id: u64,

    // Wallet
    pub private_key: String,

    // Contracts
    pub router_address: Address,
    pub weth_token: Address,
    pub usdc_token: Address,

    // Capture window
    pub max_capture_count: usize,
    pub max_capture_seconds: u64,

    // Test-traffic generation
    pub swap_count: usize,
    pub swap_pause_ms: u64,
    pub slippage_bps: u64,
    pub priority_tip_gwei: u64,
    pub swap_deadline_secs: u64,

    // Filtering
    pub require_known_selector: bool,

    // Reporting
    pub output_file: PathBuf,
}

impl ProbeConfig {
    pub fn capture_criteria(&self) -> CaptureCriteria {
        CaptureCriteria {
            router: self.router_address,
            max_count: self.max_capture_count,
            max_duration: Duration::from_secs(self.max_capture_seconds),
            require_known_selector: self.require_known_selector,
        }
    }

    pub fn swap_plan(&self) -> SwapPlan {
        SwapPlan {
            count: self.swap_count,
            pause: Duration::from_millis(self.swap_pause_ms),
        }
    }
}

/// Outcome of one full orchestrated run: what the listener captured
/// plus submission bookkeeping for the report.
#[derive(Debug)]
pub struct CaptureRun {
    /// Accepted swaps in arrival order (feed order, not submission order).
    pub captured: Vec<CapturedSwap>,
    /// The count threshold that was requested.
    pub requested: usize,
    /// Hashes of our own successfully broadcast test swaps.
    pub submitted: Vec<TxHash>,
    /// Submissions that failed and were skipped.
    pub failed_submissions: usize,
    pub elapsed: Duration,
}
