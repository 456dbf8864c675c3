//! A pool together with every component configured around it.

use crate::{
    node::{
        CreditManager, CreditManagerDeployConfig, Gauge, GaugeDeployConfig, LinearModel,
        LinearModelParams, Pool, PoolDeployConfig, PoolQuotaKeeper, QuotaKeeperDeployConfig,
    },
    render, ConfiguratorNode, Deployable,
};
use configurator_state_read::{ChainRead, ReadError, ReadResult};
use configurator_types::{Address, ValidationOutcome, NOT_DEPLOYED};
use core::fmt;
use futures::future;
use serde::{Deserialize, Serialize};

/// A pool and its interest rate model, quota keeper, gauge and credit managers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolTree {
    /// The pool's own parameters.
    pub pool: Pool,
    /// The pool's interest rate model.
    pub interest_rate_model: LinearModel,
    /// The pool's quota keeper.
    pub quota_keeper: PoolQuotaKeeper,
    /// The quota keeper's gauge.
    pub gauge: Gauge,
    /// Credit managers borrowing from the pool.
    pub credit_managers: Vec<CreditManager>,
}

/// [`PoolTree`] deployment configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTreeDeployConfig {
    /// The pool's own parameters.
    pub pool: PoolDeployConfig,
    /// The pool's interest rate model.
    pub interest_rate_model: LinearModelParams,
    /// The pool's quota keeper.
    #[serde(default)]
    pub quota_keeper: QuotaKeeperDeployConfig,
    /// The quota keeper's gauge.
    #[serde(default)]
    pub gauge: GaugeDeployConfig,
    /// Credit managers borrowing from the pool.
    #[serde(default)]
    pub credit_managers: Vec<CreditManagerDeployConfig>,
}

impl PoolTree {
    /// A pool subtree in which nothing is deployed yet.
    ///
    /// Each credit manager's debt limit is connected to the pool in
    /// configuration order.
    pub fn new(config: PoolTreeDeployConfig) -> Self {
        let mut tree = Self {
            pool: Pool::new(config.pool),
            interest_rate_model: LinearModel::new(config.interest_rate_model),
            quota_keeper: PoolQuotaKeeper::new(config.quota_keeper),
            gauge: Gauge::new(config.gauge),
            credit_managers: Vec::new(),
        };
        for cm in config.credit_managers {
            tree.add_credit_manager(cm);
        }
        tree
    }

    /// Attach to a deployed pool and every component it references.
    ///
    /// Children are read concurrently once the pool itself is read. Credit
    /// managers keep the order of the pool's credit manager list.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(pool = %address)))]
    pub async fn attach<S: ChainRead>(address: Address, state: &S) -> ReadResult<Self, S::Error> {
        let pool = Pool::attach(address, state).await?;
        let decimals = pool.decimals();

        let interest_rate_model = LinearModel::attach(pool.interest_rate_model(), state);
        let quotas = async {
            let quota_keeper = PoolQuotaKeeper::attach(pool.pool_quota_keeper(), state).await?;
            let gauge = Gauge::attach(quota_keeper.gauge(), state).await?;
            Ok::<_, ReadError<S::Error>>((quota_keeper, gauge))
        };
        let credit_managers = future::try_join_all(
            pool.credit_managers()
                .map(|cm| CreditManager::attach(cm, decimals, state)),
        );

        let (interest_rate_model, (quota_keeper, gauge), credit_managers) =
            futures::try_join!(interest_rate_model, quotas, credit_managers)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            symbol = pool.symbol(),
            credit_managers = credit_managers.len(),
            "attached pool"
        );

        Ok(Self {
            pool,
            interest_rate_model,
            quota_keeper,
            gauge,
            credit_managers,
        })
    }

    /// Propose a new credit manager, connecting it to the pool with the
    /// configured debt limit.
    ///
    /// Returns its index, which is shared by [`PoolTree::credit_managers`]
    /// and the pool's debt limit list.
    pub fn add_credit_manager(&mut self, config: CreditManagerDeployConfig) -> usize {
        let debt_limit = config.debt_limit;
        let cm = CreditManager::new(config, self.pool.underlying(), self.pool.decimals());
        self.credit_managers.push(cm);
        self.pool.add_credit_manager(NOT_DEPLOYED, debt_limit)
    }

    /// The credit manager at `address`, if connected.
    pub fn credit_manager_mut(&mut self, address: Address) -> Option<&mut CreditManager> {
        self.credit_managers
            .iter_mut()
            .find(|cm| cm.address() == address)
    }

    /// Findings spanning several children.
    fn validate_own(&self) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        let symbol = self.pool.symbol();

        if self.pool.credit_manager_debt_limits_sum() > self.pool.total_debt_limit() {
            outcome.warning(format!(
                "pool {symbol}: credit manager debt limits exceed the total debt limit"
            ));
        }

        for cm in &self.credit_managers {
            if cm.underlying() != self.pool.underlying() {
                outcome.error(format!(
                    "pool {symbol}: credit manager {} has a different underlying",
                    cm.name()
                ));
            }
            if cm.is_deployed() && self.pool.is_deployed() && cm.pool() != self.pool.address() {
                outcome.error(format!(
                    "pool {symbol}: credit manager {} is connected to another pool",
                    cm.name()
                ));
            }
            for token in cm.collateral_tokens().keys() {
                if *token != self.pool.underlying() && !self.quota_keeper.quotas().contains_key(token) {
                    outcome.error(format!(
                        "pool {symbol}: collateral {token} of credit manager {} is not quoted",
                        cm.name()
                    ));
                }
            }
        }

        for token in self.quota_keeper.quotas().keys() {
            if !self.gauge.rates().contains_key(token) {
                outcome.error(format!("pool {symbol}: quoted token {token} has no gauge rates"));
            }
        }
        for token in self.gauge.rates().keys() {
            if !self.quota_keeper.quotas().contains_key(token) {
                outcome.warning(format!("pool {symbol}: gauge token {token} is not quoted"));
            }
        }

        let gauge = self.quota_keeper.gauge();
        if gauge != NOT_DEPLOYED && self.gauge.is_deployed() && gauge != self.gauge.address() {
            outcome.error(format!("pool {symbol}: quota keeper points to another gauge"));
        }

        outcome
    }
}

impl ConfiguratorNode for PoolTree {
    fn address(&self) -> Address {
        self.pool.address()
    }

    fn is_modified(&self) -> bool {
        self.pool.is_modified()
            || self.interest_rate_model.is_modified()
            || self.quota_keeper.is_modified()
            || self.gauge.is_modified()
            || self.credit_managers.iter().any(|cm| cm.is_modified())
    }

    /// Own findings first, then the pool, interest rate model, quota keeper,
    /// gauge and credit managers in order.
    fn validate(&self) -> ValidationOutcome {
        let mut outcome = self.validate_own();
        outcome.append(self.pool.validate());
        outcome.append(self.interest_rate_model.validate());
        outcome.append(self.quota_keeper.validate());
        outcome.append(self.gauge.validate());
        outcome.extend(self.credit_managers.iter().map(|cm| cm.validate()));
        outcome
    }
}

impl Deployable for PoolTree {
    type DeployConfig = PoolTreeDeployConfig;

    fn deploy_config(&self) -> Self::DeployConfig {
        PoolTreeDeployConfig {
            pool: self.pool.deploy_config(),
            interest_rate_model: self.interest_rate_model.deploy_config(),
            quota_keeper: self.quota_keeper.deploy_config(),
            gauge: self.gauge.deploy_config(),
            credit_managers: self
                .credit_managers
                .iter()
                .zip(self.pool.credit_manager_debt_limits())
                .map(|(cm, entry)| CreditManagerDeployConfig {
                    debt_limit: *entry.limit.get(),
                    ..cm.deploy_config()
                })
                .collect(),
        }
    }
}

impl fmt::Display for PoolTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pool)?;
        render::child(f, &self.interest_rate_model)?;
        render::child(f, &self.quota_keeper)?;
        render::child(f, &self.gauge)?;
        for cm in &self.credit_managers {
            render::child(f, cm)?;
        }
        Ok(())
    }
}
