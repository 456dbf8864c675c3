//! The protocol configuration tree.

use crate::{
    error::AttachError,
    node::{
        address_provider::{ACL, CONTRACTS_REGISTER, PRICE_ORACLE},
        Acl, AclDeployConfig, AddressProvider, AddressProviderDeployConfig, ContractsRegister,
        PriceOracle, PriceOracleDeployConfig,
    },
    pool_tree::{PoolTree, PoolTreeDeployConfig},
    ConfiguratorNode, Deployable,
};
use configurator_state_read::ChainRead;
use configurator_types::{Address, ValidationOutcome, NOT_DEPLOYED};
use core::fmt;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
#[cfg(feature = "tracing")]
use tracing::Instrument;

/// The registry components and every pool subtree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Core {
    /// The address registry.
    pub address_provider: AddressProvider,
    /// The access control list.
    pub acl: Acl,
    /// The register of pools and credit managers.
    pub contracts_register: ContractsRegister,
    /// The price oracle.
    pub price_oracle: PriceOracle,
    /// Pool subtrees, in contracts register order.
    pub pools: Vec<PoolTree>,
}

/// [`Core`] deployment configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreDeployConfig {
    /// The address registry.
    #[serde(default)]
    pub address_provider: AddressProviderDeployConfig,
    /// The access control list.
    pub acl: AclDeployConfig,
    /// The price oracle.
    #[serde(default)]
    pub price_oracle: PriceOracleDeployConfig,
    /// Pool subtrees.
    #[serde(default)]
    pub pools: Vec<PoolTreeDeployConfig>,
}

impl Core {
    /// A tree in which nothing is deployed yet.
    pub fn new(config: CoreDeployConfig) -> Self {
        Self {
            address_provider: AddressProvider::new(config.address_provider),
            acl: Acl::new(config.acl),
            contracts_register: ContractsRegister::new(),
            price_oracle: PriceOracle::new(config.price_oracle),
            pools: config.pools.into_iter().map(PoolTree::new).collect(),
        }
    }

    /// Attach to a deployed protocol through its address provider.
    ///
    /// Registry components are read first. One task is then spawned per pool
    /// registered in the contracts register, each attaching its own pool
    /// subtree. The resulting pools keep the register's order regardless of
    /// completion order.
    ///
    /// If any read fails the whole attach fails and outstanding pool tasks
    /// are aborted. No partial tree is returned.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub async fn attach<S>(address: Address, state: S) -> Result<Self, AttachError<S::Error>>
    where
        S: ChainRead + Clone + Send + Sync + 'static,
        S::Future: Send,
        S::Error: Send + 'static,
    {
        let address_provider = AddressProvider::attach(address, &state).await?;
        let entry = |key| address_provider.get(key).unwrap_or(NOT_DEPLOYED);

        let (acl, contracts_register, price_oracle) = futures::try_join!(
            Acl::attach(entry(ACL), &state),
            ContractsRegister::attach(entry(CONTRACTS_REGISTER), &state),
            PriceOracle::attach(entry(PRICE_ORACLE), &state),
        )?;

        let pools = attach_pools(contracts_register.pools(), &state).await?;

        Ok(Self {
            address_provider,
            acl,
            contracts_register,
            price_oracle,
            pools,
        })
    }

    /// The pool subtree of the pool at `address`.
    pub fn pool(&self, address: Address) -> Option<&PoolTree> {
        self.pools.iter().find(|p| p.address() == address)
    }

    /// The pool subtree of the pool at `address`, for proposing changes.
    pub fn pool_mut(&mut self, address: Address) -> Option<&mut PoolTree> {
        self.pools.iter_mut().find(|p| p.address() == address)
    }

    /// The pool subtree whose diesel token has the given symbol.
    pub fn pool_by_symbol(&self, symbol: &str) -> Option<&PoolTree> {
        self.pools.iter().find(|p| p.pool.symbol() == symbol)
    }

    /// Findings spanning the registry and pools.
    fn validate_own(&self) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        for tree in &self.pools {
            let symbol = tree.pool.symbol();
            let underlying = tree.pool.underlying();
            if !self.price_oracle.has_feed(&underlying) {
                outcome.error(format!("pool {symbol}: underlying {underlying} has no price feed"));
            }
            for token in tree.quota_keeper.quotas().keys() {
                if !self.price_oracle.has_feed(token) {
                    outcome.error(format!("pool {symbol}: quoted token {token} has no price feed"));
                }
            }
            if tree.is_deployed() && !self.contracts_register.pools().contains(&tree.address()) {
                outcome.error(format!("pool {symbol}: not registered in the contracts register"));
            }
        }
        outcome
    }
}

/// Spawn one attach task per pool and gather the results in `addrs` order.
async fn attach_pools<S>(addrs: &[Address], state: &S) -> Result<Vec<PoolTree>, AttachError<S::Error>>
where
    S: ChainRead + Clone + Send + Sync + 'static,
    S::Future: Send,
    S::Error: Send + 'static,
{
    #[cfg(feature = "tracing")]
    tracing::debug!(pools = addrs.len(), "attaching pool subtrees");

    let mut set: JoinSet<(usize, Result<PoolTree, _>)> = JoinSet::new();
    for (ix, &address) in addrs.iter().enumerate() {
        let state = state.clone();
        let future = async move {
            let state = state;
            (ix, PoolTree::attach(address, &state).await)
        };
        #[cfg(feature = "tracing")]
        set.spawn(future.instrument(tracing::info_span!("attach_pool", ix)));
        #[cfg(not(feature = "tracing"))]
        set.spawn(future);
    }

    let mut pools: Vec<Option<PoolTree>> = addrs.iter().map(|_| None).collect();
    while let Some(res) = set.join_next().await {
        let (ix, res) = res?;
        // Dropping the set on error aborts the remaining tasks.
        pools[ix] = Some(res?);
    }
    Ok(pools.into_iter().flatten().collect())
}

impl ConfiguratorNode for Core {
    fn address(&self) -> Address {
        self.address_provider.address()
    }

    fn is_modified(&self) -> bool {
        self.address_provider.is_modified()
            || self.acl.is_modified()
            || self.price_oracle.is_modified()
            || self.pools.iter().any(|p| p.is_modified())
    }

    /// Own findings first, then the address provider, ACL, contracts
    /// register, price oracle and pools in order.
    fn validate(&self) -> ValidationOutcome {
        let mut outcome = self.validate_own();
        outcome.append(self.address_provider.validate());
        outcome.append(self.acl.validate());
        outcome.append(self.contracts_register.validate());
        outcome.append(self.price_oracle.validate());
        outcome.extend(self.pools.iter().map(|p| p.validate()));
        outcome
    }
}

impl Deployable for Core {
    type DeployConfig = CoreDeployConfig;

    fn deploy_config(&self) -> Self::DeployConfig {
        CoreDeployConfig {
            address_provider: self.address_provider.deploy_config(),
            acl: self.acl.deploy_config(),
            price_oracle: self.price_oracle.deploy_config(),
            pools: self.pools.iter().map(|p| p.deploy_config()).collect(),
        }
    }
}

impl fmt::Display for Core {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.address_provider)?;
        writeln!(f)?;
        write!(f, "{}", self.acl)?;
        writeln!(f)?;
        write!(f, "{}", self.contracts_register)?;
        writeln!(f)?;
        write!(f, "{}", self.price_oracle)?;
        for pool in &self.pools {
            writeln!(f)?;
            write!(f, "{pool}")?;
        }
        Ok(())
    }
}
