//! The address registry from which every other registry component is found.

use crate::{error::KeyNotFound, render, ConfiguratorNode, Deployable};
use configurator_state_read::{read, ChainRead, Field, ReadResult};
use configurator_types::{Address, TrackedValue, ValidationOutcome, NOT_DEPLOYED};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registry key of the access control list.
pub const ACL: &str = "ACL";
/// Registry key of the contracts register.
pub const CONTRACTS_REGISTER: &str = "CONTRACTS_REGISTER";
/// Registry key of the price oracle.
pub const PRICE_ORACLE: &str = "PRICE_ORACLE";
/// Registry key of the treasury.
pub const TREASURY: &str = "TREASURY";

/// Entries read when attaching. Entries are listed in registry order.
pub const KNOWN_ENTRIES: [&str; 4] = [ACL, CONTRACTS_REGISTER, PRICE_ORACLE, TREASURY];

/// Entries that must resolve to a deployed contract.
const REQUIRED_ENTRIES: [&str; 3] = [ACL, CONTRACTS_REGISTER, PRICE_ORACLE];

/// Maps well-known registry keys to contract addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressProvider {
    address: Address,
    entries: BTreeMap<String, TrackedValue<Address>>,
}

/// [`AddressProvider`] deployment configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressProviderDeployConfig {
    /// Registry entries keyed by name.
    pub entries: BTreeMap<String, Address>,
}

impl AddressProvider {
    /// A registry that is not deployed yet.
    pub fn new(config: AddressProviderDeployConfig) -> Self {
        Self {
            address: NOT_DEPLOYED,
            entries: config
                .entries
                .into_iter()
                .map(|(key, addr)| (key, TrackedValue::new(addr)))
                .collect(),
        }
    }

    /// Attach to a deployed registry, reading every known entry.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub async fn attach<S: ChainRead>(address: Address, state: &S) -> ReadResult<Self, S::Error> {
        let mut entries = BTreeMap::new();
        for key in KNOWN_ENTRIES {
            let field = Field::named("getAddressOrRevert", key);
            let addr: Address = read(state, address, field).await?;
            entries.insert(key.to_string(), TrackedValue::attached(addr));
        }
        Ok(Self { address, entries })
    }

    /// The current address registered under `key`.
    pub fn get(&self, key: &str) -> Option<Address> {
        self.entries.get(key).map(|v| *v.get())
    }

    /// All entries.
    pub fn entries(&self) -> &BTreeMap<String, TrackedValue<Address>> {
        &self.entries
    }

    /// Propose a new address for an existing entry.
    pub fn set_address(&mut self, key: &str, addr: Address) -> Result<(), KeyNotFound> {
        self.entries
            .get_mut(key)
            .ok_or_else(|| KeyNotFound::new("address provider entries", key))?
            .set(addr);
        Ok(())
    }

    /// Propose a new entry, or a new address for an existing one.
    pub fn add_address(&mut self, key: &str, addr: Address) {
        match self.entries.get_mut(key) {
            Some(entry) => entry.set(addr),
            None => {
                self.entries.insert(key.to_string(), TrackedValue::new(addr));
            }
        }
    }
}

impl ConfiguratorNode for AddressProvider {
    fn address(&self) -> Address {
        self.address
    }

    fn is_modified(&self) -> bool {
        render::any_modified(&self.entries)
    }

    fn validate(&self) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        for key in REQUIRED_ENTRIES {
            match self.get(key) {
                None => outcome.error(format!("address provider: {key} is not registered")),
                Some(addr) if addr == NOT_DEPLOYED => {
                    outcome.error(format!("address provider: {key} is the zero address"))
                }
                Some(_) => (),
            }
        }
        outcome
    }
}

impl Deployable for AddressProvider {
    type DeployConfig = AddressProviderDeployConfig;

    fn deploy_config(&self) -> Self::DeployConfig {
        AddressProviderDeployConfig {
            entries: self
                .entries
                .iter()
                .map(|(key, addr)| (key.clone(), *addr.get()))
                .collect(),
        }
    }
}

impl fmt::Display for AddressProvider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        render::header(f, "Address provider", self.address)?;
        render::entries(f, "entries", &self.entries, None)
    }
}
