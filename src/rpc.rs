//! Ledger RPC collaborator
//!
//! The submission engine talks to the network through the [`LedgerRpc`]
//! trait so that retry behavior is testable without a live cluster.
//! [`SolanaLedgerRpc`] is the production implementation over the nonblocking
//! RPC client.

use async_trait::async_trait;
use solana_client::{
    nonblocking::rpc_client::RpcClient, rpc_config::RpcSendTransactionConfig,
};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, signature::Signature,
    transaction::Transaction,
};
use solana_transaction_status::TransactionStatus;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::error::SubmissionError;

/// A freshness anchor bounding how long a signed transaction stays valid.
///
/// Single-use: each submission attempt must fetch a new one. A transaction
/// bound to an expired anchor is guaranteed rejection, which the classifier
/// treats as transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockhashAnchor {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// Network operations consumed by the submission engine.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Fetch a fresh blockhash anchor at the given commitment.
    async fn fetch_anchor(
        &self,
        commitment: CommitmentConfig,
    ) -> Result<BlockhashAnchor, SubmissionError>;

    /// Transmit a signed transaction without preflight simulation.
    async fn send_signed(
        &self,
        tx: &Transaction,
        commitment: CommitmentConfig,
    ) -> Result<Signature, SubmissionError>;

    /// Poll until the signature satisfies the commitment, reports an
    /// execution error, or the anchor's valid height is exceeded.
    async fn await_confirmation(
        &self,
        signature: &Signature,
        anchor: &BlockhashAnchor,
        commitment: CommitmentConfig,
    ) -> Result<(), SubmissionError>;
}

/// Production [`LedgerRpc`] over a Solana JSON-RPC endpoint.
pub struct SolanaLedgerRpc {
    client: Arc<RpcClient>,
    poll_interval: Duration,
}

impl SolanaLedgerRpc {
    pub fn new(endpoint: &str, timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            client: Arc::new(RpcClient::new_with_timeout(endpoint.to_string(), timeout)),
            poll_interval,
        }
    }
}

#[async_trait]
impl LedgerRpc for SolanaLedgerRpc {
    async fn fetch_anchor(
        &self,
        commitment: CommitmentConfig,
    ) -> Result<BlockhashAnchor, SubmissionError> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(commitment)
            .await
            .map_err(|e| SubmissionError::from_client_error(&e))?;

        debug!(
            blockhash = %blockhash,
            last_valid_block_height = last_valid_block_height,
            "Fetched blockhash anchor"
        );
        Ok(BlockhashAnchor {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn send_signed(
        &self,
        tx: &Transaction,
        commitment: CommitmentConfig,
    ) -> Result<Signature, SubmissionError> {
        // Inputs are validated before any network call, so preflight
        // simulation is skipped; retries are handled by the engine, not the
        // RPC node.
        let config = RpcSendTransactionConfig {
            skip_preflight: true,
            preflight_commitment: Some(commitment.commitment),
            max_retries: Some(0),
            ..Default::default()
        };

        self.client
            .send_transaction_with_config(tx, config)
            .await
            .map_err(|e| SubmissionError::from_client_error(&e))
    }

    async fn await_confirmation(
        &self,
        signature: &Signature,
        anchor: &BlockhashAnchor,
        commitment: CommitmentConfig,
    ) -> Result<(), SubmissionError> {
        loop {
            let response = self
                .client
                .get_signature_statuses(std::slice::from_ref(signature))
                .await
                .map_err(|e| SubmissionError::from_client_error(&e))?;
            let status: Option<TransactionStatus> = response.value.into_iter().next().flatten();

            match status {
                Some(status) => {
                    // An execution error at confirmation time is surfaced as
                    // a confirmation failure and classified like any other
                    // attempt failure.
                    if let Some(err) = status.err {
                        return Err(SubmissionError::classified(format!(
                            "transaction failed confirmation: {err}"
                        )));
                    }
                    if status.satisfies_commitment(commitment) {
                        debug!(signature = %signature, "Transaction confirmed");
                        return Ok(());
                    }
                }
                None => {
                    // Not yet visible; give up once the anchor can no longer
                    // be included.
                    let height = self
                        .client
                        .get_block_height_with_commitment(commitment)
                        .await
                        .map_err(|e| SubmissionError::from_client_error(&e))?;
                    if height > anchor.last_valid_block_height {
                        return Err(SubmissionError::classified(format!(
                            "block height exceeded: anchor valid through {}, current height {}",
                            anchor.last_valid_block_height, height
                        )));
                    }
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
