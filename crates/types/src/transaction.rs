//! # Proposed transactions
//!
//! A proposed transaction is a single already ABI-encoded on-chain call,
//! produced once per intended change and handed to the batch encoder.

use crate::{Address, Bytes, ValidationOutcome, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Length of a function selector in bytes.
pub const SELECTOR_LEN: usize = 4;

/// A single proposed on-chain call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedTransaction {
    /// The contract to call.
    pub target: Address,
    /// Native value sent with the call.
    pub value: U256,
    /// Human-readable method signature, e.g. `setLimit(address,uint96)`.
    pub signature: String,
    /// Human-readable arguments keyed by parameter name.
    pub args: BTreeMap<String, String>,
    /// ABI-encoded call data including the leading selector.
    pub call_data: Bytes,
    /// Findings produced while building this call.
    pub validation: ValidationOutcome,
}

impl ProposedTransaction {
    /// A call with no value, arguments or findings.
    pub fn new(target: Address, signature: impl Into<String>, call_data: impl Into<Bytes>) -> Self {
        Self {
            target,
            value: U256::ZERO,
            signature: signature.into(),
            args: BTreeMap::new(),
            call_data: call_data.into(),
            validation: ValidationOutcome::default(),
        }
    }

    /// Add a human-readable argument.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Attach the findings produced while building this call.
    pub fn with_validation(mut self, validation: ValidationOutcome) -> Self {
        self.validation = validation;
        self
    }

    /// The 4-byte function selector, if the call data is long enough.
    pub fn selector(&self) -> Option<[u8; SELECTOR_LEN]> {
        self.call_data.get(..SELECTOR_LEN)?.try_into().ok()
    }

    /// The call data with its selector removed.
    pub fn stripped_data(&self) -> Option<&[u8]> {
        self.call_data.get(SELECTOR_LEN..)
    }
}
