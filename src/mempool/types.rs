//! Mempool Capture — Type Definitions
//!
//! Purpose:
//!     Data structures for the pending-transaction capture loop:
//!     the feed-side record, the acceptance criteria, the accepted
//!     observation, and the capture error taxonomy.
//!
//! Dependencies:
//!     - alloy (Address, TxHash, U256, Bytes)
//!     - serde (JSON report output)

use alloy::consensus::Transaction as _;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::Transaction as RpcTransaction;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// A pending transaction as observed from the feed, reduced to the
/// fields the capture filter and the report need. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTx {
    pub hash: TxHash,
    pub from: Address,
    /// None for contract-creation transactions (never router-bound).
    pub to: Option<Address>,
    pub input: Bytes,
    pub value: U256,
    /// Legacy gas price (None for EIP-1559 transactions).
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: Option<u128>,
}

impl PendingTx {
    /// Build from a full transaction object delivered by the node's
    /// pending-transaction subscription.
    pub fn from_rpc(tx: &RpcTransaction) -> Self {
        Self {
            hash: *tx.inner.tx_hash(),
            from: tx.inner.signer(),
            to: tx.inner.to(),
            input: tx.inner.input().clone(),
            value: tx.inner.value(),
            gas_price: tx.inner.gas_price(),
            max_fee_per_gas: tx.inner.max_fee_per_gas(),
            max_priority_fee_per_gas: tx.inner.max_priority_fee_per_gas(),
        }
    }

    /// Gas price used for ranking: the legacy gas price when present,
    /// otherwise the EIP-1559 fee cap.
    pub fn effective_gas_price(&self) -> u128 {
        self.gas_price.unwrap_or(self.max_fee_per_gas)
    }
}

/// What the listener accepts and when it stops. Set once at
/// construction, never mutated.
#[derive(Debug, Clone)]
pub struct CaptureCriteria {
    /// Router address a transaction must be addressed to.
    pub router: Address,
    /// Stop after this many accepted transactions.
    pub max_count: usize,
    /// Stop after this much wall-clock time, whichever comes first.
    pub max_duration: Duration,
    /// When true, the calldata selector must also be a recognized
    /// router swap function. Address matching alone otherwise.
    pub require_known_selector: bool,
}

/// An accepted router-bound pending transaction. This is what lands in
/// the final report.
#[derive(Debug, Clone, Serialize)]
pub struct CapturedSwap {
    pub observed_at_utc: String,
    pub tx_hash: TxHash,
    pub from: Address,
    pub router: Address,
    /// Router function name when the selector was recognized.
    pub function: Option<&'static str>,
    pub input: Bytes,
    pub value: U256,
    pub effective_gas_price: u128,
    pub max_priority_fee_per_gas: Option<u128>,
}

/// Fatal capture failures. A deadline expiring is not one of these —
/// that path returns Ok with whatever was captured.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("pending-transaction subscription failed")]
    Subscribe(#[source] anyhow::Error),

    #[error("pending-transaction stream closed before capture finished")]
    StreamClosed,

    #[error("mempool listener task failed")]
    ListenerGone(#[source] anyhow::Error),
}
