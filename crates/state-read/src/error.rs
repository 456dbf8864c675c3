//! The types of errors that might occur while reading configuration fields.

use crate::{Field, ReadValue};
use configurator_types::Address;
use thiserror::Error;

/// Shorthand for a `Result` where the error type is a `ReadError`.
pub type ReadResult<T, E> = Result<T, ReadError<E>>;

/// Reading a configuration field failed.
#[derive(Debug, Error)]
pub enum ReadError<E> {
    /// The underlying reader failed.
    #[error("read failed: {0}")]
    Read(E),
    /// The reader returned a value of an unexpected kind.
    #[error("unexpected value for `{field}` on {contract}: {source}")]
    Value {
        /// The contract that was read.
        contract: Address,
        /// The field that was read.
        field: Field,
        /// Description of the mismatch.
        source: UnexpectedValue,
    },
}

/// A read value could not be converted to the expected type.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected {expected}, found {found}")]
pub struct UnexpectedValue {
    /// The expected kind of value.
    pub expected: &'static str,
    /// The value that was found.
    pub found: String,
}

impl UnexpectedValue {
    pub(crate) fn new(expected: &'static str, found: &ReadValue) -> Self {
        Self {
            expected,
            found: format!("{} {found}", found.kind()),
        }
    }
}
