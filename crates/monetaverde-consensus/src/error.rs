//! Error types for the currency rules.

use thiserror::Error;

/// Errors surfaced by the currency rule engine.
///
/// Every error is a return value; severity is the caller's decision. The
/// rules never retry and never touch global state on the way out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// A builder setter or an operation argument is out of range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Hex, binary or amount-string input could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),

    /// Block cumulative size exceeds twice the median.
    #[error("block cumulative size {actual} is too big, expected less than {limit}")]
    BlockTooBig { actual: usize, limit: usize },

    /// Coinbase outputs do not sum to the computed reward.
    #[error("miner transaction outputs sum to {summary}, block reward is {reward}")]
    RewardMismatch { summary: u64, reward: u64 },

    /// A 128-bit intermediate product overflowed.
    #[error("128-bit overflow in {0}")]
    Overflow(&'static str),

    /// Merge-mining tag missing, branch over-long, or root mismatch.
    #[error("merge mining violation: {0}")]
    MergeMining(String),

    /// A parsed address carries a foreign prefix.
    #[error("address prefix {found} does not match expected {expected}")]
    AddressPrefixMismatch { found: u64, expected: u64 },

    /// The crypto backend rejected a derivation input.
    #[error("output key derivation failed for output {output_index}")]
    OutputDerivation { output_index: usize },
}

/// Result alias for rule-engine operations.
pub type CurrencyResult<T> = Result<T, CurrencyError>;
