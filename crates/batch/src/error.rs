//! Batch error types.

use thiserror::Error;

/// Any error produced while building, encoding or exporting a batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The chain id was never set.
    #[error("missing configuration: chain id")]
    MissingChainId,
    /// The description was never set.
    #[error("missing configuration: description")]
    MissingDescription,
    /// The ETA was never set.
    #[error("missing configuration: eta")]
    MissingEta,
    /// There must be at least one transaction.
    #[error("missing configuration: batch has no transactions")]
    NoTransactions,
    /// The call data of the transaction at the given index has no selector.
    #[error("call data of transaction {0} is shorter than a function selector")]
    CallDataTooShort(usize),
    /// A transaction with validation errors was added without `force`.
    #[error("transaction {signature} failed validation: {}", errors.join("; "))]
    Rejected {
        /// Signature of the rejected call.
        signature: String,
        /// Validation errors of the rejected call.
        errors: Vec<String>,
    },
    /// The stored checksum does not match the document.
    #[error("checksum mismatch: stored {stored:?}, computed {computed:?}")]
    ChecksumMismatch {
        /// The checksum found in the document metadata.
        stored: Option<String>,
        /// The checksum computed from the document.
        computed: Option<String>,
    },
    /// Failed to serialize or parse a document.
    #[error("batch serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Failed to write a document.
    #[error("failed to write batch: {0}")]
    Io(#[from] std::io::Error),
}
