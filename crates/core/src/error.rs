//! Errors produced while building or mutating configuration nodes.

use configurator_state_read::ReadError;
use thiserror::Error;

/// A mutator targeted a collection entry that does not exist.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{collection} has no entry for {key}")]
pub struct KeyNotFound {
    /// The collection that was looked up, e.g. `quota keeper quotas`.
    pub collection: &'static str,
    /// The missing key.
    pub key: String,
}

impl KeyNotFound {
    pub(crate) fn new(collection: &'static str, key: impl ToString) -> Self {
        Self {
            collection,
            key: key.to_string(),
        }
    }
}

/// [`Core::attach`][crate::Core::attach] error.
#[derive(Debug, Error)]
pub enum AttachError<E> {
    /// Reading a field failed.
    #[error("failed to attach: {0}")]
    Read(#[from] ReadError<E>),
    /// A spawned pool attach task failed to join.
    #[error("pool attach task failed to join: {0}")]
    Join(#[from] tokio::task::JoinError),
}
