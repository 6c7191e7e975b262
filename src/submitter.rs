//! Transaction submission engine
//!
//! Drives one logical submission through the states
//! `Building → Signing → Sent → Confirming`, looping back to `Building` with
//! a fresh blockhash anchor on transient failures, up to the configured
//! attempt ceiling. Attempts are strictly sequential: attempt N+1 never
//! starts before attempt N has fully resolved, so two signed variants of the
//! same request are never in flight at once.

use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::SubmissionError;
use crate::rpc::LedgerRpc;

/// Retry configuration for a submission. Not mutated at runtime.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt ceiling (including the first attempt)
    pub max_attempts: u32,

    /// Fixed delay between attempts
    pub retry_delay: Duration,

    /// Commitment requested for anchors, sends, and confirmation
    pub commitment: CommitmentConfig,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(2000),
            commitment: CommitmentConfig::confirmed(),
        }
    }
}

/// Signs, transmits, and confirms assembled transactions with bounded retry.
pub struct SubmissionEngine<R> {
    rpc: R,
    policy: RetryPolicy,
}

impl<R: LedgerRpc> SubmissionEngine<R> {
    pub fn new(rpc: R, policy: RetryPolicy) -> Self {
        Self { rpc, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Submit the instruction list signed by `payer`, retrying transient
    /// failures with a fresh anchor per attempt.
    ///
    /// Returns the transaction signature on the first confirmed attempt.
    /// Fatal failures abort immediately without consuming remaining
    /// attempts; on exhaustion the last observed transient error is
    /// returned.
    ///
    /// Caveat: an attempt classified as failed locally may still land on
    /// chain (at-least-once delivery). The update_price instruction is a
    /// pure state overwrite, so a duplicate landing is harmless unless the
    /// caller independently resubmits a different value after a fatal
    /// classification.
    pub async fn submit(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
    ) -> Result<Signature, SubmissionError> {
        let mut last_error: Option<SubmissionError> = None;

        for attempt in 1..=self.policy.max_attempts {
            match self.run_attempt(instructions, payer).await {
                Ok(signature) => {
                    info!(
                        attempt = attempt,
                        signature = %signature,
                        "Transaction confirmed"
                    );
                    return Ok(signature);
                }
                Err(err @ SubmissionError::Fatal(_)) => {
                    warn!(attempt = attempt, error = %err, "Fatal submission error, aborting");
                    return Err(err);
                }
                Err(err) => {
                    warn!(
                        attempt = attempt,
                        max_attempts = self.policy.max_attempts,
                        error = %err,
                        "Attempt failed, will retry"
                    );
                    last_error = Some(err);
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.retry_delay).await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| SubmissionError::Fatal("submission made no attempts".to_string())))
    }

    async fn run_attempt(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
    ) -> Result<Signature, SubmissionError> {
        let commitment = self.policy.commitment;

        // Building: anchors are single-use and expire after a bounded number
        // of blocks, so every attempt fetches its own.
        let anchor = self.rpc.fetch_anchor(commitment).await?;

        // Signing
        let mut tx = Transaction::new_with_payer(instructions, Some(&payer.pubkey()));
        tx.try_sign(&[payer], anchor.blockhash)
            .map_err(|e| SubmissionError::Fatal(format!("signing failed: {e}")))?;

        // Sent
        let signature = self.rpc.send_signed(&tx, commitment).await?;
        info!(signature = %signature, "Transaction sent");

        // Confirming
        self.rpc
            .await_confirmation(&signature, &anchor, commitment)
            .await?;
        Ok(signature)
    }
}
