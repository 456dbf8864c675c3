//! Base types shared across the configurator crates.
//!
//! The central item is [`TrackedValue`], a value that remembers the baseline
//! it was observed with so that a human-readable diff of a proposed change can
//! be rendered. Configuration nodes are built out of tracked values, validated
//! into a [`ValidationOutcome`] and eventually turned into
//! [`ProposedTransaction`]s for batching.

#![deny(missing_docs)]
#![deny(unsafe_code)]

#[doc(inline)]
pub use alloy_primitives::{address, Address, Bytes, U256};
#[doc(inline)]
pub use fmt::{fixed_point, Render};
#[doc(inline)]
pub use tracked::TrackedValue;
#[doc(inline)]
pub use transaction::ProposedTransaction;
#[doc(inline)]
pub use validation::ValidationOutcome;

pub mod fmt;
pub mod tracked;
pub mod transaction;
pub mod validation;

/// Basis points denominator used for fees, rates and thresholds.
pub const PERCENTAGE_FACTOR: u16 = 10_000;

/// Number of decimals used to render a basis point value as a percentage.
pub const PERCENTAGE_DECIMALS: u8 = 2;

/// Sentinel address denoting a component that is not deployed yet.
pub const NOT_DEPLOYED: Address = Address::ZERO;

/// Basis points, in `0..=PERCENTAGE_FACTOR` for most parameters.
pub type Bps = u16;
