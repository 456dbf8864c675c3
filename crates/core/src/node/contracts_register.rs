//! Register of the protocol's pools and credit managers.

use crate::{render, ConfiguratorNode};
use configurator_state_read::{read, ChainRead, Field, ReadResult};
use configurator_types::{Address, Render, ValidationOutcome, NOT_DEPLOYED};
use core::fmt;
use std::collections::BTreeSet;

/// The list of registered pools and credit managers.
///
/// Registration happens as a side effect of deploying pools and credit
/// managers, so both lists are plain values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractsRegister {
    address: Address,
    pools: Vec<Address>,
    credit_managers: Vec<Address>,
}

impl ContractsRegister {
    /// A register that is not deployed yet.
    pub fn new() -> Self {
        Self {
            address: NOT_DEPLOYED,
            ..Default::default()
        }
    }

    /// Attach to a deployed register.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub async fn attach<S: ChainRead>(address: Address, state: &S) -> ReadResult<Self, S::Error> {
        let pools = read(state, address, Field::plain("getPools")).await?;
        let credit_managers = read(state, address, Field::plain("getCreditManagers")).await?;
        Ok(Self {
            address,
            pools,
            credit_managers,
        })
    }

    /// Registered pools, in registry order.
    pub fn pools(&self) -> &[Address] {
        &self.pools
    }

    /// Registered credit managers, in registry order.
    pub fn credit_managers(&self) -> &[Address] {
        &self.credit_managers
    }
}

fn duplicates(addrs: &[Address]) -> Vec<Address> {
    let mut seen = BTreeSet::new();
    addrs.iter().filter(|a| !seen.insert(**a)).copied().collect()
}

impl ConfiguratorNode for ContractsRegister {
    fn address(&self) -> Address {
        self.address
    }

    fn is_modified(&self) -> bool {
        false
    }

    fn validate(&self) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        for pool in duplicates(&self.pools) {
            outcome.error(format!("contracts register: pool {pool} registered twice"));
        }
        for cm in duplicates(&self.credit_managers) {
            outcome.error(format!("contracts register: credit manager {cm} registered twice"));
        }
        outcome
    }
}

impl fmt::Display for ContractsRegister {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        render::header(f, "Contracts register", self.address)?;
        writeln!(f, "  pools: {}", self.pools.render(None))?;
        writeln!(f, "  credit managers: {}", self.credit_managers.render(None))
    }
}
