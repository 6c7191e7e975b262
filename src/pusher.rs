//! Price update entry point
//!
//! [`PricePusher`] owns the whole pipeline behind
//! [`PricePusher::request_price_update`]: registry lookup, fixed-point
//! encoding, payload construction, instruction planning, and submission.
//! Callers (the CLI here, any UI elsewhere) only present the returned
//! signature or classified error.

use solana_sdk::{pubkey::Pubkey, signature::Signature};
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::encoder::scale_decimal;
use crate::error::{PusherError, ValidationError};
use crate::instruction::{
    build_update_price_data, plan_update_instructions, update_price_instruction, UPDATE_PRICE_TAG,
};
use crate::registry::FeedRegistry;
use crate::rpc::{LedgerRpc, SolanaLedgerRpc};
use crate::submitter::SubmissionEngine;
use crate::wallet::WalletManager;

/// Per-update parameters resolved from configuration.
#[derive(Debug, Clone)]
pub struct PusherSettings {
    pub program_id: Pubkey,
    pub exponent: i32,
    pub priority_fee: u64,
    pub compute_unit_limit: u32,
}

/// Facade composing registry, encoder, payload builder, and engine.
pub struct PricePusher<R> {
    registry: FeedRegistry,
    wallet: WalletManager,
    engine: SubmissionEngine<R>,
    settings: PusherSettings,
}

impl PricePusher<SolanaLedgerRpc> {
    /// Wire the production stack from configuration.
    pub fn from_config(
        config: &Config,
        wallet: WalletManager,
        registry: FeedRegistry,
    ) -> anyhow::Result<Self> {
        let rpc = SolanaLedgerRpc::new(
            &config.rpc.endpoint,
            Duration::from_secs(config.rpc.timeout_secs),
            Duration::from_millis(config.rpc.confirmation_poll_ms),
        );
        let engine = SubmissionEngine::new(rpc, config.retry_policy()?);
        let settings = PusherSettings {
            program_id: config.program_id()?,
            exponent: config.feeds.exponent,
            priority_fee: config.submission.priority_fee_microlamports,
            compute_unit_limit: config.submission.compute_unit_limit,
        };
        Ok(Self::new(registry, wallet, engine, settings))
    }
}

impl<R: LedgerRpc> PricePusher<R> {
    pub fn new(
        registry: FeedRegistry,
        wallet: WalletManager,
        engine: SubmissionEngine<R>,
        settings: PusherSettings,
    ) -> Self {
        Self {
            registry,
            wallet,
            engine,
            settings,
        }
    }

    pub fn registry(&self) -> &FeedRegistry {
        &self.registry
    }

    /// Encode and submit one price update for `symbol`.
    ///
    /// Validation and encoding failures short-circuit before any network
    /// call; submission failures follow the engine's retry policy. The
    /// returned error is always one of the taxonomy kinds, never a raw
    /// network exception.
    pub async fn request_price_update(
        &self,
        symbol: &str,
        display_value: &str,
    ) -> Result<Signature, PusherError> {
        let feed = self
            .registry
            .lookup(symbol)
            .ok_or_else(|| ValidationError::UnknownSymbol(symbol.to_string()))?;

        let scaled = scale_decimal(display_value, self.settings.exponent)?;
        info!(
            symbol = symbol,
            display_value = display_value,
            scaled = %scaled,
            exponent = self.settings.exponent,
            feed = %feed,
            "Submitting price update"
        );

        let data = build_update_price_data(UPDATE_PRICE_TAG, &scaled, self.settings.exponent)?;
        let update_ix = update_price_instruction(self.settings.program_id, feed, data);
        let plan = plan_update_instructions(
            self.settings.priority_fee,
            self.settings.compute_unit_limit,
            update_ix,
        );

        let signature = self.engine.submit(&plan, self.wallet.keypair()).await?;
        Ok(signature)
    }
}

/// Explorer URL for a confirmed update, cluster derived from the endpoint.
pub fn explorer_tx_url(signature: &Signature, endpoint: &str) -> String {
    let cluster = if endpoint.contains("devnet") {
        "devnet".to_string()
    } else if endpoint.contains("testnet") {
        "testnet".to_string()
    } else if endpoint.contains("mainnet") {
        "mainnet-beta".to_string()
    } else {
        format!("custom&customUrl={endpoint}")
    };
    format!("https://solscan.io/tx/{signature}?cluster={cluster}")
}
