//! Configuration nodes for the protocol's on-chain components and the
//! configuration tree composing them.
//!
//! Every node is built in one of two modes:
//!
//! - `new` from a deployment configuration, for components that are not
//!   deployed yet. All fields are new and the node address is
//!   [`NOT_DEPLOYED`][crate::types::NOT_DEPLOYED].
//! - `attach` from a live contract, reading every field through a
//!   [`ChainRead`][crate::state_read::ChainRead] implementation. All fields
//!   start unmodified.
//!
//! Proposed changes are applied through node mutators which route every write
//! through [`TrackedValue::set`][crate::types::TrackedValue::set]. The
//! resulting tree can then be validated with [`ConfiguratorNode::validate`]
//! and rendered as a human-readable audit trail with `Display`.
//!
//! ## Nodes
//!
//! - [`node::AddressProvider`], [`node::Acl`], [`node::ContractsRegister`]
//!   and [`node::PriceOracle`] make up the registry.
//! - [`node::LinearModel`], [`node::PoolQuotaKeeper`], [`node::Gauge`],
//!   [`node::Pool`] and [`node::CreditManager`] make up a pool.
//! - [`PoolTree`] and [`Core`] are the composites.

#![deny(missing_docs)]
#![deny(unsafe_code)]

use configurator_types::{Address, ValidationOutcome, NOT_DEPLOYED};
use core::fmt;
use serde::{de::DeserializeOwned, Serialize};

#[doc(inline)]
pub use configurator_state_read as state_read;
#[doc(inline)]
pub use configurator_types as types;
#[doc(inline)]
pub use error::{AttachError, KeyNotFound};
#[doc(inline)]
pub use pool_tree::{PoolTree, PoolTreeDeployConfig};
#[doc(inline)]
pub use tree::{Core, CoreDeployConfig};

pub mod error;
pub mod node;
mod pool_tree;
mod render;
mod tree;

/// Behaviour common to every configuration node.
pub trait ConfiguratorNode: fmt::Display {
    /// The on-chain address, or [`NOT_DEPLOYED`] for new nodes.
    fn address(&self) -> Address;

    /// Whether any tracked field differs from its baseline or is new.
    fn is_modified(&self) -> bool;

    /// Check the node's current state.
    ///
    /// Findings are returned as data. The default has no findings.
    fn validate(&self) -> ValidationOutcome {
        ValidationOutcome::default()
    }

    /// Whether the node was attached to a deployed contract.
    fn is_deployed(&self) -> bool {
        self.address() != NOT_DEPLOYED
    }
}

/// Nodes that can be described by a deployment configuration.
///
/// The configuration produced by [`Deployable::deploy_config`] can be fed back
/// into the node's `new` constructor.
pub trait Deployable {
    /// The declarative description of the node.
    type DeployConfig: Serialize + DeserializeOwned;

    /// Project the node's current field values into a deployment configuration.
    fn deploy_config(&self) -> Self::DeployConfig;

    /// Render the deployment configuration as a YAML snippet.
    fn render_deploy_config(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.deploy_config())
    }
}
