//! Wallet management module
//!
//! The fee payer's signing identity, injected from a keypair file rather
//! than embedded in source. Secret material is never logged.

use anyhow::{Context, Result};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::sync::Arc;

/// Holds the fee-payer keypair used to sign update transactions.
pub struct WalletManager {
    keypair: Arc<Keypair>,
}

impl WalletManager {
    /// Create a new wallet manager from a keypair file
    ///
    /// Accepts either raw 64-byte files or the JSON byte-array format
    /// written by `solana-keygen`.
    pub fn from_file(path: &str) -> Result<Self> {
        let keypair_bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read keypair file: {}", path))?;

        let keypair = if keypair_bytes.len() == 64 {
            // Raw bytes format - validate before conversion
            if keypair_bytes.iter().all(|&b| b == 0) {
                anyhow::bail!("Invalid keypair: all-zero key rejected");
            }
            Keypair::try_from(keypair_bytes.as_slice()).context("Invalid keypair bytes")?
        } else {
            // JSON format
            let json: Vec<u8> = serde_json::from_slice(&keypair_bytes)
                .context("Failed to parse keypair JSON")?;
            if json.len() != 64 {
                anyhow::bail!(
                    "Invalid keypair length: expected 64 bytes, got {}",
                    json.len()
                );
            }
            if json.iter().all(|&b| b == 0) {
                anyhow::bail!("Invalid keypair: all-zero key rejected");
            }
            Keypair::try_from(json.as_slice()).context("Invalid keypair from JSON")?
        };

        Ok(Self {
            keypair: Arc::new(keypair),
        })
    }

    /// Create a new wallet manager from a keypair
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Arc::new(keypair),
        }
    }

    /// Get the public key
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Get a reference to the keypair (for signing operations)
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

impl Clone for WalletManager {
    fn clone(&self) -> Self {
        Self {
            keypair: Arc::clone(&self.keypair),
        }
    }
}
