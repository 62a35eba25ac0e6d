//! Capture Report
//!
//! Purpose:
//!     Final presentation of a capture run: rank the captured swaps by
//!     effective gas price (ranking is this layer's job, never the
//!     listener's), log a summary table, and persist the full records
//!     as JSON for later inspection.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::mempool::CapturedSwap;
use crate::types::CaptureRun;

/// Report over a finished run, with swaps ordered by effective gas
/// price descending.
#[derive(Debug, Serialize)]
pub struct CaptureReport {
    pub requested: usize,
    pub captured: usize,
    pub submitted: usize,
    pub failed_submissions: usize,
    pub elapsed_ms: u64,
    pub swaps: Vec<CapturedSwap>,
}

impl CaptureReport {
    pub fn from_run(run: CaptureRun) -> Self {
        let mut swaps = run.captured;
        // Stable sort keeps arrival order among equal gas prices.
        swaps.sort_by(|a, b| b.effective_gas_price.cmp(&a.effective_gas_price));

        Self {
            requested: run.requested,
            captured: swaps.len(),
            submitted: run.submitted.len(),
            failed_submissions: run.failed_submissions,
            elapsed_ms: run.elapsed.as_millis() as u64,
            swaps,
        }
    }

    /// Log the "captured N of requested M" summary and the ranked
    /// hash/gas-price table.
    pub fn log_summary(&self) {
        info!(
            "Captured {}/{} router swaps in {:.1}s ({} submitted, {} failed)",
            self.captured,
            self.requested,
            self.elapsed_ms as f64 / 1000.0,
            self.submitted,
            self.failed_submissions
        );
        for swap in &self.swaps {
            info!(
                "  {} | {:>14} wei | {}",
                swap.tx_hash,
                swap.effective_gas_price,
                swap.function.unwrap_or("-")
            );
        }
    }

    /// Persist the report as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output dir: {:?}", parent))?;
            }
        }

        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize capture report")?;
        fs::write(path, json).with_context(|| format!("Failed to write report: {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, Bytes, TxHash, U256};
    use std::time::Duration;

    fn swap(tag: u8, effective_gas_price: u128) -> CapturedSwap {
        CapturedSwap {
            observed_at_utc: "2026-08-29T00:00:00.000Z".to_string(),
            tx_hash: TxHash::repeat_byte(tag),
            from: address!("00000000000000000000000000000000000000f0"),
            router: address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D"),
            function: Some("swapExactETHForTokens"),
            input: Bytes::from(vec![0x7f, 0xf3, 0x6a, 0xb5]),
            value: U256::from(1u64),
            effective_gas_price,
            max_priority_fee_per_gas: Some(2_000_000_000),
        }
    }

    fn run(swaps: Vec<CapturedSwap>) -> CaptureRun {
        CaptureRun {
            requested: 5,
            captured: swaps,
            submitted: vec![TxHash::repeat_byte(0xee)],
            failed_submissions: 1,
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn report_ranks_by_effective_gas_price_descending() {
        let report = CaptureReport::from_run(run(vec![
            swap(0x01, 10),
            swap(0x02, 30),
            swap(0x03, 20),
        ]));

        let order: Vec<TxHash> = report.swaps.iter().map(|s| s.tx_hash).collect();
        assert_eq!(
            order,
            vec![
                TxHash::repeat_byte(0x02),
                TxHash::repeat_byte(0x03),
                TxHash::repeat_byte(0x01)
            ]
        );
        assert_eq!(report.captured, 3);
        assert_eq!(report.requested, 5);
        assert_eq!(report.elapsed_ms, 1500);
    }

    #[test]
    fn equal_gas_prices_keep_arrival_order() {
        let report =
            CaptureReport::from_run(run(vec![swap(0x01, 10), swap(0x02, 10), swap(0x03, 10)]));
        let order: Vec<TxHash> = report.swaps.iter().map(|s| s.tx_hash).collect();
        assert_eq!(
            order,
            vec![
                TxHash::repeat_byte(0x01),
                TxHash::repeat_byte(0x02),
                TxHash::repeat_byte(0x03)
            ]
        );
    }

    #[test]
    fn writes_json_with_parent_directories() {
        let dir = std::env::temp_dir().join(format!("capture_report_{}", std::process::id()));
        let path = dir.join("nested").join("swaps.json");

        let report = CaptureReport::from_run(run(vec![swap(0x01, 10)]));
        report.write_json(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["captured"], 1);
        assert_eq!(value["swaps"][0]["effective_gas_price"], 10);

        fs::remove_dir_all(&dir).ok();
    }
}
