//! price-pusher - Solana price feed update client
//!
//! Encodes a decimal price into the mock price-feed program's fixed
//! `update_price` payload and submits the signed transaction with bounded
//! retry under blockhash expiry.
//!
//! Pipeline: display string → [`encoder::scale_decimal`] → scaled integer →
//! [`instruction::build_update_price_data`] → payload bytes →
//! [`instruction::plan_update_instructions`] → instruction list →
//! [`submitter::SubmissionEngine`] → signature or classified error.

pub mod config;
pub mod encoder;
pub mod error;
pub mod instruction;
pub mod pusher;
pub mod registry;
pub mod rpc;
pub mod submitter;
pub mod wallet;

// Re-export commonly used types
pub use config::Config;
pub use error::{EncodingError, PusherError, SubmissionError, ValidationError};
pub use pusher::{PricePusher, PusherSettings};
pub use registry::FeedRegistry;
pub use rpc::{BlockhashAnchor, LedgerRpc, SolanaLedgerRpc};
pub use submitter::{RetryPolicy, SubmissionEngine};
pub use wallet::WalletManager;

pub use solana_sdk::{pubkey::Pubkey, signature::Signature};
