//! Swap Submitter
//!
//! Purpose:
//!     Build and broadcast a single router swap for a given notional
//!     amount: quote the expected output, apply slippage tolerance,
//!     estimate gas with a safety margin, derive EIP-1559 fees from the
//!     latest base fee, then sign and send. Any step failing aborts the
//!     whole submission — retry policy, if any, lives in the
//!     orchestrator.
//!
//! Steps:
//!     1. deadline = now + configured window (bounds router-side execution)
//!     2. next usable nonce (pending tag, so queued swaps stack)
//!     3. getAmountsOut quote along the token path
//!     4. min_out = quote × (1 − slippage)
//!     5. gas limit = estimate × 1.2
//!     6. max fee = latest base fee + fixed priority tip
//!     7. sign + broadcast, return the tx hash

use alloy::eips::BlockNumberOrTag;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::Provider;
use async_trait::async_trait;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info};

use crate::contracts::IUniswapV2Router02;
use crate::types::ProbeConfig;

/// Gas limit safety margin over the node's estimate (12/10 = 1.2×).
const GAS_LIMIT_NUM: u64 = 12;
const GAS_LIMIT_DEN: u64 = 10;
const BPS_DENOMINATOR: u64 = 10_000;
const GWEI: u128 = 1_000_000_000;

/// Per-step submission failures. The variant tells the operator which
/// stage of the pipeline rejected the swap.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("pending nonce fetch failed")]
    Nonce(#[source] anyhow::Error),

    #[error("router quote failed")]
    Quote(#[source] anyhow::Error),

    #[error("router quote returned no amounts")]
    EmptyQuote,

    #[error("gas estimation failed")]
    GasEstimate(#[source] anyhow::Error),

    #[error("base fee lookup failed")]
    Fees(#[source] anyhow::Error),

    #[error("latest block carries no base fee")]
    MissingBaseFee,

    #[error("broadcast failed")]
    Broadcast(#[source] anyhow::Error),
}

/// Submits one swap per call; returns the broadcast transaction's hash.
#[async_trait]
pub trait SubmitSwap: Send + Sync {
    async fn submit(&self, amount_in_wei: U256) -> Result<TxHash, SubmitError>;
}

/// Live submitter over a wallet-backed alloy provider. The provider's
/// wallet filler signs; fee and gas fields are set explicitly here.
pub struct RouterSwapSubmitter<P> {
    provider: P,
    router: Address,
    /// Swap path, input token first (WETH → quote token).
    path: Vec<Address>,
    recipient: Address,
    chain_id: u64,
    slippage_bps: u64,
    priority_tip_gwei: u64,
    deadline_secs: u64,
}

impl<P: Provider> RouterSwapSubmitter<P> {
    pub fn new(provider: P, config: &ProbeConfig, recipient: Address) -> Self {
        Self {
            provider,
            router: config.router_address,
            path: vec![config.weth_token, config.usdc_token],
            recipient,
            chain_id: config.chain_id,
            slippage_bps: config.slippage_bps,
            priority_tip_gwei: config.priority_tip_gwei,
            deadline_secs: config.swap_deadline_secs,
        }
    }

    fn min_out(&self, expected: U256) -> U256 {
        expected * U256::from(BPS_DENOMINATOR - self.slippage_bps) / U256::from(BPS_DENOMINATOR)
    }

    fn deadline(&self) -> U256 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        U256::from(now.saturating_add(self.deadline_secs))
    }
}

#[async_trait]
impl<P: Provider + 'static> SubmitSwap for RouterSwapSubmitter<P> {
    async fn submit(&self, amount_in_wei: U256) -> Result<TxHash, SubmitError> {
        let deadline = self.deadline();

        // Pending tag so back-to-back swaps pick up queued nonces.
        let nonce = self
            .provider
            .get_transaction_count(self.recipient)
            .pending()
            .await
            .map_err(|e| SubmitError::Nonce(e.into()))?;

        let router = IUniswapV2Router02::new(self.router, &self.provider);

        let amounts = router
            .getAmountsOut(amount_in_wei, self.path.clone())
            .call()
            .await
            .map_err(|e| SubmitError::Quote(e.into()))?;
        let expected_out = amounts.last().copied().ok_or(SubmitError::EmptyQuote)?;
        let min_out = self.min_out(expected_out);
        debug!(
            "Swap quote: in={} expected_out={} min_out={}",
            amount_in_wei, expected_out, min_out
        );

        let call = router
            .swapExactETHForTokens(min_out, self.path.clone(), self.recipient, deadline)
            .value(amount_in_wei)
            .from(self.recipient);

        let gas_estimate = call
            .estimate_gas()
            .await
            .map_err(|e| SubmitError::GasEstimate(e.into()))?;
        let gas_limit = gas_estimate.saturating_mul(GAS_LIMIT_NUM) / GAS_LIMIT_DEN;

        let latest = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(|e| SubmitError::Fees(e.into()))?
            .ok_or_else(|| SubmitError::Fees(anyhow::anyhow!("latest block not available")))?;
        let base_fee = latest
            .header
            .base_fee_per_gas
            .ok_or(SubmitError::MissingBaseFee)? as u128;
        let tip = self.priority_tip_gwei as u128 * GWEI;
        let max_fee = base_fee + tip;

        let request = call
            .into_transaction_request()
            .with_chain_id(self.chain_id)
            .with_nonce(nonce)
            .with_gas_limit(gas_limit)
            .with_max_priority_fee_per_gas(tip)
            .with_max_fee_per_gas(max_fee);

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| SubmitError::Broadcast(e.into()))?;
        let tx_hash = *pending.tx_hash();

        info!(
            "Sent test swap {} | value={} wei | gas_limit={} | max_fee={} wei",
            tx_hash, amount_in_wei, gas_limit, max_fee
        );
        Ok(tx_hash)
    }
}
