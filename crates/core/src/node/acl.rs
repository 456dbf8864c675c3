//! Access control list.

use crate::{error::KeyNotFound, render, ConfiguratorNode, Deployable};
use configurator_state_read::{read, ChainRead, Field, ReadResult};
use configurator_types::{Address, TrackedValue, ValidationOutcome, NOT_DEPLOYED};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The protocol's access control list.
///
/// Admin sets are tracked as membership flags so that a removal renders as
/// `true => false` rather than disappearing from the audit trail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Acl {
    address: Address,
    owner: TrackedValue<Address>,
    pausable_admins: BTreeMap<Address, TrackedValue<bool>>,
    unpausable_admins: BTreeMap<Address, TrackedValue<bool>>,
}

/// [`Acl`] deployment configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclDeployConfig {
    /// The configurator owning the ACL.
    pub owner: Address,
    /// Accounts allowed to pause contracts.
    #[serde(default)]
    pub pausable_admins: Vec<Address>,
    /// Accounts allowed to unpause contracts.
    #[serde(default)]
    pub unpausable_admins: Vec<Address>,
}

fn members(addrs: Vec<Address>, track: fn(bool) -> TrackedValue<bool>) -> BTreeMap<Address, TrackedValue<bool>> {
    addrs.into_iter().map(|addr| (addr, track(true))).collect()
}

fn current_members(map: &BTreeMap<Address, TrackedValue<bool>>) -> Vec<Address> {
    map.iter()
        .filter(|(_, member)| *member.get())
        .map(|(addr, _)| *addr)
        .collect()
}

impl Acl {
    /// An ACL that is not deployed yet.
    pub fn new(config: AclDeployConfig) -> Self {
        Self {
            address: NOT_DEPLOYED,
            owner: TrackedValue::new(config.owner),
            pausable_admins: members(config.pausable_admins, TrackedValue::new),
            unpausable_admins: members(config.unpausable_admins, TrackedValue::new),
        }
    }

    /// Attach to a deployed ACL.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub async fn attach<S: ChainRead>(address: Address, state: &S) -> ReadResult<Self, S::Error> {
        let owner: Address = read(state, address, Field::plain("owner")).await?;
        let pausable: Vec<Address> = read(state, address, Field::plain("pausableAdmins")).await?;
        let unpausable: Vec<Address> =
            read(state, address, Field::plain("unpausableAdmins")).await?;
        Ok(Self {
            address,
            owner: TrackedValue::attached(owner),
            pausable_admins: members(pausable, TrackedValue::attached),
            unpausable_admins: members(unpausable, TrackedValue::attached),
        })
    }

    /// The current owner.
    pub fn owner(&self) -> Address {
        *self.owner.get()
    }

    /// Current pausable admins.
    pub fn pausable_admins(&self) -> Vec<Address> {
        current_members(&self.pausable_admins)
    }

    /// Current unpausable admins.
    pub fn unpausable_admins(&self) -> Vec<Address> {
        current_members(&self.unpausable_admins)
    }

    /// Propose a new owner.
    pub fn set_owner(&mut self, owner: Address) {
        self.owner.set(owner);
    }

    /// Propose adding a pausable admin.
    pub fn add_pausable_admin(&mut self, admin: Address) {
        add_member(&mut self.pausable_admins, admin);
    }

    /// Propose removing an existing pausable admin.
    pub fn remove_pausable_admin(&mut self, admin: Address) -> Result<(), KeyNotFound> {
        self.pausable_admins
            .get_mut(&admin)
            .ok_or_else(|| KeyNotFound::new("acl pausable admins", admin))?
            .set(false);
        Ok(())
    }

    /// Propose adding an unpausable admin.
    pub fn add_unpausable_admin(&mut self, admin: Address) {
        add_member(&mut self.unpausable_admins, admin);
    }

    /// Propose removing an existing unpausable admin.
    pub fn remove_unpausable_admin(&mut self, admin: Address) -> Result<(), KeyNotFound> {
        self.unpausable_admins
            .get_mut(&admin)
            .ok_or_else(|| KeyNotFound::new("acl unpausable admins", admin))?
            .set(false);
        Ok(())
    }
}

fn add_member(map: &mut BTreeMap<Address, TrackedValue<bool>>, addr: Address) {
    map.entry(addr)
        .and_modify(|member| member.set(true))
        .or_insert_with(|| TrackedValue::new(true));
}

impl ConfiguratorNode for Acl {
    fn address(&self) -> Address {
        self.address
    }

    fn is_modified(&self) -> bool {
        self.owner.is_modified()
            || render::any_modified(&self.pausable_admins)
            || render::any_modified(&self.unpausable_admins)
    }

    fn validate(&self) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        if self.owner() == NOT_DEPLOYED {
            outcome.error("acl: owner is the zero address");
        }
        if self.pausable_admins().is_empty() {
            outcome.warning("acl: no pausable admins, contracts cannot be paused");
        }
        if self.unpausable_admins().is_empty() {
            outcome.warning("acl: no unpausable admins, contracts cannot be unpaused");
        }
        outcome
    }
}

impl Deployable for Acl {
    type DeployConfig = AclDeployConfig;

    fn deploy_config(&self) -> Self::DeployConfig {
        AclDeployConfig {
            owner: self.owner(),
            pausable_admins: self.pausable_admins(),
            unpausable_admins: self.unpausable_admins(),
        }
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        render::header(f, "ACL", self.address)?;
        render::field(f, "owner", &self.owner, None)?;
        render::entries(f, "pausable admins", &self.pausable_admins, None)?;
        render::entries(f, "unpausable admins", &self.unpausable_admins, None)
    }
}
