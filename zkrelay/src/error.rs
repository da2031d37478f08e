//! Error types for the relay.
//!
//! Request problems are reported back to the caller as client errors, while
//! submission problems carry the pipeline stage they happened in so that a
//! caller can tell a transaction that was never broadcast from one that was
//! broadcast but never confirmed.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while converting a decimal string into an on-chain value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FieldError {
    #[error("`{0}` is not a non-negative decimal integer")]
    NotDecimal(String),

    #[error("`{0}` does not fit in 32 bytes")]
    Overflow(String),

    #[error("`{0}` is not a canonical field element")]
    OutOfField(String),
}

/// Errors in the submitted request body. All of them map to `400 Bad Request`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RequestError {
    #[error("Missing proof or pub_signals in request body")]
    MissingProofOrSignals,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("`{field}` needs at least {expected} elements, got {actual}")]
    TooShort {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Missing claim `{0}`")]
    MissingClaim(&'static str),

    #[error("Invalid `{field}`: {source}")]
    InvalidField {
        field: String,
        #[source]
        source: FieldError,
    },

    #[error("Invalid proof point `{0}`: not a BN254 group element")]
    InvalidPoint(&'static str),

    #[error("Proof does not verify against the public signals")]
    ProofRejected,

    #[error("Proof verification error: {0}")]
    Verification(String),
}

impl RequestError {
    pub(crate) fn invalid_field(field: impl Into<String>, source: FieldError) -> Self {
        Self::InvalidField {
            field: field.into(),
            source,
        }
    }

    pub(crate) fn ensure_len(field: impl Into<String>, actual: usize, expected: usize) -> Result<(), Self> {
        if actual < expected {
            return Err(Self::TooShort {
                field: field.into(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// The step of the submission pipeline an error comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Simulate,
    Submit,
    Confirm,
}

/// Errors raised by the simulate → submit → confirm pipeline.
///
/// The display string is the underlying message, unmodified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmitError {
    /// The call reverted or the node could not be reached. Nothing was broadcast.
    #[error("{0}")]
    Simulation(String),

    /// The signed transaction was not accepted by the node.
    #[error("{0}")]
    Submission(String),

    /// The transaction was broadcast but no receipt could be obtained.
    #[error("{reason}")]
    Confirmation { tx_hash: TxHash, reason: String },

    /// The transaction was mined with a failed status.
    #[error("transaction {tx_hash} reverted in block {block_number}")]
    Reverted { tx_hash: TxHash, block_number: u64 },
}

impl SubmitError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Simulation(_) => Stage::Simulate,
            Self::Submission(_) => Stage::Submit,
            Self::Confirmation { .. } | Self::Reverted { .. } => Stage::Confirm,
        }
    }

    /// Hash of the broadcast transaction, if the failure happened after broadcast.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::Confirmation { tx_hash, .. } | Self::Reverted { tx_hash, .. } => Some(*tx_hash),
            Self::Simulation(_) | Self::Submission(_) => None,
        }
    }
}
