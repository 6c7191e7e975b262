//! Error taxonomy and transient/fatal classification
//!
//! Three layers, matching where a failure can originate:
//! - [`ValidationError`]: caller input problems, reported before any network
//!   call and never retried
//! - [`EncodingError`]: the payload cannot represent the value
//! - [`SubmissionError`]: network/consensus outcomes, partitioned into
//!   `Transient` (retried by the engine) and `Fatal` (aborts immediately)
//!
//! Classification is by matching known transient failure descriptions;
//! unrecognized errors are Fatal (fail-closed).

use solana_client::client_error::ClientError;
use thiserror::Error;

/// Caller input problems. Reported immediately, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The price string does not match the decimal-number grammar
    #[error("invalid decimal format: '{0}'")]
    BadFormat(String),

    /// More fractional digits than the exponent can represent
    #[error("input precision ({digits} fractional digits) exceeds exponent precision ({scale})")]
    PrecisionExceeded { digits: usize, scale: usize },

    /// No feed account registered for the requested symbol
    #[error("no price feed registered for symbol '{0}'")]
    UnknownSymbol(String),
}

/// Payload construction failures. Reported immediately, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The scaled price does not fit in a signed 64-bit integer
    #[error("scaled price {value} does not fit in i64")]
    Overflow { value: String },
}

/// Network/consensus layer outcomes from the submission engine.
///
/// The reason string always carries the last concrete error description
/// received, so operators can distinguish causes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// A failure that may succeed on retry with a fresh blockhash
    #[error("transient submission failure: {0}")]
    Transient(String),

    /// A failure that will not be resolved by retrying
    #[error("fatal submission failure: {0}")]
    Fatal(String),
}

/// Top-level error surfaced by [`crate::pusher::PricePusher`].
///
/// Callers never see a raw RPC exception; every failure is one of the
/// taxonomy kinds below.
#[derive(Debug, Error)]
pub enum PusherError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Retryability class of a submission failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Retryable,
    Fatal,
}

/// Transient failure descriptions known to resolve on retry.
///
/// Matched case-insensitively as substrings. "failed confirmation" is
/// deliberately in the retryable set: a failed confirmation may reflect a
/// now-resubmittable state rather than a permanent rejection, which trades
/// strict exactly-once semantics for availability.
const TRANSIENT_PATTERNS: &[&str] = &[
    "blockhash not found",
    "block height exceeded",
    "transaction expired",
    "timed out",
    "timeout",
    "node is behind",
    "connection",
    "network",
    "io error",
    "error sending request",
    "failed confirmation",
];

/// Classify a failure description as retryable or fatal.
///
/// Pure function of the description; unrecognized errors default to Fatal.
pub fn classify_failure(description: &str) -> FailureClass {
    let lowered = description.to_lowercase();
    if TRANSIENT_PATTERNS.iter().any(|p| lowered.contains(p)) {
        FailureClass::Retryable
    } else {
        FailureClass::Fatal
    }
}

impl SubmissionError {
    /// Wrap a failure description in the variant its classification dictates.
    pub fn classified(description: impl Into<String>) -> Self {
        let description = description.into();
        match classify_failure(&description) {
            FailureClass::Retryable => Self::Transient(description),
            FailureClass::Fatal => Self::Fatal(description),
        }
    }

    /// Classify an RPC client error by its message.
    pub fn from_client_error(err: &ClientError) -> Self {
        Self::classified(err.to_string())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// The concrete reason string carried by either variant.
    pub fn reason(&self) -> &str {
        match self {
            Self::Transient(reason) | Self::Fatal(reason) => reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_descriptions_are_retryable() {
        for desc in [
            "Blockhash not found",
            "Transaction failed: block height exceeded",
            "request timed out after 30s",
            "Node is behind by 42 slots",
            "connection reset by peer",
            "transaction failed confirmation: InstructionError(0, Custom(1))",
        ] {
            assert_eq!(
                classify_failure(desc),
                FailureClass::Retryable,
                "expected retryable: {desc}"
            );
        }
    }

    #[test]
    fn test_unknown_descriptions_fail_closed() {
        for desc in [
            "insufficient funds for fee",
            "invalid instruction data",
            "Attempt to debit an account but found no record of a prior credit",
            "something completely novel",
        ] {
            assert_eq!(
                classify_failure(desc),
                FailureClass::Fatal,
                "expected fatal: {desc}"
            );
        }
    }

    #[test]
    fn test_classified_constructor_partitions() {
        let err = SubmissionError::classified("Blockhash not found");
        assert!(err.is_retryable());
        assert!(matches!(err, SubmissionError::Transient(_)));

        let err = SubmissionError::classified("insufficient funds");
        assert!(!err.is_retryable());
        assert!(matches!(err, SubmissionError::Fatal(_)));
    }

    #[test]
    fn test_reason_carries_concrete_description() {
        let err = SubmissionError::classified("node is behind by 10 slots");
        assert_eq!(err.reason(), "node is behind by 10 slots");
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::PrecisionExceeded {
            digits: 9,
            scale: 8,
        };
        assert_eq!(
            err.to_string(),
            "input precision (9 fractional digits) exceeds exponent precision (8)"
        );

        let err = EncodingError::Overflow {
            value: "99999999999999999999".to_string(),
        };
        assert!(err.to_string().contains("does not fit in i64"));
    }

    #[test]
    fn test_pusher_error_is_transparent() {
        let err: PusherError = ValidationError::UnknownSymbol("DOGE/USD".to_string()).into();
        assert_eq!(err.to_string(), "no price feed registered for symbol 'DOGE/USD'");
    }
}
