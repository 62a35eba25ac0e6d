//! Mempool Capture — Router Swap Filter
//!
//! Purpose:
//!     Decide whether a pending transaction belongs in the capture
//!     result. Destination-address matching is the mandatory filter;
//!     selector recognition is an optional stricter check
//!     (CaptureCriteria::require_known_selector).
//!
//! Recognized V2 Router Selectors:
//!     0x38ed1739 — swapExactTokensForTokens
//!     0x8803dbee — swapTokensForExactTokens
//!     0x7ff36ab5 — swapExactETHForTokens
//!     0xfb3bdb41 — swapETHForExactTokens
//!     0x18cbafe5 — swapExactTokensForETH
//!     0x4a25d94a — swapTokensForExactETH

use chrono::Utc;

use super::types::{CaptureCriteria, CapturedSwap, PendingTx};

const SWAP_EXACT_TOKENS_FOR_TOKENS: [u8; 4] = [0x38, 0xed, 0x17, 0x39];
const SWAP_TOKENS_FOR_EXACT_TOKENS: [u8; 4] = [0x88, 0x03, 0xdb, 0xee];
const SWAP_EXACT_ETH_FOR_TOKENS: [u8; 4] = [0x7f, 0xf3, 0x6a, 0xb5];
const SWAP_ETH_FOR_EXACT_TOKENS: [u8; 4] = [0xfb, 0x3b, 0xdb, 0x41];
const SWAP_EXACT_TOKENS_FOR_ETH: [u8; 4] = [0x18, 0xcb, 0xaf, 0xe5];
const SWAP_TOKENS_FOR_EXACT_ETH: [u8; 4] = [0x4a, 0x25, 0xd9, 0x4a];

/// Map a 4-byte calldata selector to its router function name.
/// Returns None for unrecognized or truncated calldata.
pub fn selector_name(input: &[u8]) -> Option<&'static str> {
    if input.len() < 4 {
        return None;
    }

    let selector: [u8; 4] = input[..4].try_into().ok()?;
    match selector {
        SWAP_EXACT_TOKENS_FOR_TOKENS => Some("swapExactTokensForTokens"),
        SWAP_TOKENS_FOR_EXACT_TOKENS => Some("swapTokensForExactTokens"),
        SWAP_EXACT_ETH_FOR_TOKENS => Some("swapExactETHForTokens"),
        SWAP_ETH_FOR_EXACT_TOKENS => Some("swapETHForExactTokens"),
        SWAP_EXACT_TOKENS_FOR_ETH => Some("swapExactTokensForETH"),
        SWAP_TOKENS_FOR_EXACT_ETH => Some("swapTokensForExactETH"),
        _ => None,
    }
}

/// Classify a feed event against the capture criteria.
/// Returns the accepted observation, or None with no side effect.
pub fn classify(tx: &PendingTx, criteria: &CaptureCriteria) -> Option<CapturedSwap> {
    if tx.to != Some(criteria.router) {
        return None;
    }

    let function = selector_name(&tx.input);
    if criteria.require_known_selector && function.is_none() {
        return None;
    }

    Some(CapturedSwap {
        observed_at_utc: Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        tx_hash: tx.hash,
        from: tx.from,
        router: criteria.router,
        function,
        input: tx.input.clone(),
        value: tx.value,
        effective_gas_price: tx.effective_gas_price(),
        max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
    })
}
