//! Lending pool parameters.

use crate::{error::KeyNotFound, render, ConfiguratorNode, Deployable};
use configurator_state_read::{read, ChainRead, Field, ReadResult};
use configurator_types::{
    Address, Bps, Render, TrackedValue, ValidationOutcome, NOT_DEPLOYED, PERCENTAGE_DECIMALS,
    U256,
};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Highest withdrawal fee a pool accepts, 1%.
pub const MAX_WITHDRAW_FEE: Bps = 100;

/// A lending pool's own parameters.
///
/// Child components (interest rate model, quota keeper, credit managers) are
/// referenced by address here and owned by the [`PoolTree`][crate::PoolTree].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pool {
    address: Address,
    symbol: String,
    name: String,
    underlying: Address,
    decimals: u8,
    total_debt_limit: TrackedValue<U256>,
    withdraw_fee: TrackedValue<Bps>,
    interest_rate_model: TrackedValue<Address>,
    pool_quota_keeper: TrackedValue<Address>,
    credit_manager_debt_limits: Vec<CreditManagerDebtLimit>,
}

/// The debt limit of one credit manager connected to a pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreditManagerDebtLimit {
    /// The credit manager, or [`NOT_DEPLOYED`] for a new one.
    pub credit_manager: Address,
    /// The amount the credit manager may borrow from the pool.
    pub limit: TrackedValue<U256>,
}

/// [`Pool`] deployment configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDeployConfig {
    /// Diesel token symbol.
    pub symbol: String,
    /// Diesel token name.
    pub name: String,
    /// The pool's underlying token.
    pub underlying: Address,
    /// Decimals of the underlying token.
    pub decimals: u8,
    /// Limit on the pool's total borrowed amount.
    pub total_debt_limit: U256,
    /// Fee charged on withdrawals.
    #[serde(default)]
    pub withdraw_fee: Bps,
}

impl Pool {
    /// A pool that is not deployed yet.
    ///
    /// Its interest rate model, quota keeper and credit managers are not
    /// deployed yet either.
    pub fn new(config: PoolDeployConfig) -> Self {
        Self {
            address: NOT_DEPLOYED,
            symbol: config.symbol,
            name: config.name,
            underlying: config.underlying,
            decimals: config.decimals,
            total_debt_limit: TrackedValue::new(config.total_debt_limit),
            withdraw_fee: TrackedValue::new(config.withdraw_fee),
            interest_rate_model: TrackedValue::new(NOT_DEPLOYED),
            pool_quota_keeper: TrackedValue::new(NOT_DEPLOYED),
            credit_manager_debt_limits: Vec::new(),
        }
    }

    /// Attach to a deployed pool.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub async fn attach<S: ChainRead>(address: Address, state: &S) -> ReadResult<Self, S::Error> {
        let field = Field::plain;
        let symbol = read(state, address, field("symbol")).await?;
        let name = read(state, address, field("name")).await?;
        let underlying = read(state, address, field("underlyingToken")).await?;
        let decimals = read(state, address, field("decimals")).await?;
        let total_debt_limit: U256 = read(state, address, field("totalDebtLimit")).await?;
        let withdraw_fee: Bps = read(state, address, field("withdrawFee")).await?;
        let interest_rate_model: Address = read(state, address, field("interestRateModel")).await?;
        let pool_quota_keeper: Address = read(state, address, field("poolQuotaKeeper")).await?;
        let credit_managers: Vec<Address> = read(state, address, field("creditManagers")).await?;
        let mut credit_manager_debt_limits = Vec::with_capacity(credit_managers.len());
        for credit_manager in credit_managers {
            let limit: U256 =
                read(state, address, Field::at("creditManagerDebtLimit", credit_manager)).await?;
            credit_manager_debt_limits.push(CreditManagerDebtLimit {
                credit_manager,
                limit: TrackedValue::attached(limit),
            });
        }
        Ok(Self {
            address,
            symbol,
            name,
            underlying,
            decimals,
            total_debt_limit: TrackedValue::attached(total_debt_limit),
            withdraw_fee: TrackedValue::attached(withdraw_fee),
            interest_rate_model: TrackedValue::attached(interest_rate_model),
            pool_quota_keeper: TrackedValue::attached(pool_quota_keeper),
            credit_manager_debt_limits,
        })
    }

    /// Diesel token symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Diesel token name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying token.
    pub fn underlying(&self) -> Address {
        self.underlying
    }

    /// Decimals of the underlying token.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Current total debt limit.
    pub fn total_debt_limit(&self) -> U256 {
        *self.total_debt_limit.get()
    }

    /// Current withdrawal fee.
    pub fn withdraw_fee(&self) -> Bps {
        *self.withdraw_fee.get()
    }

    /// Current interest rate model.
    pub fn interest_rate_model(&self) -> Address {
        *self.interest_rate_model.get()
    }

    /// Current quota keeper.
    pub fn pool_quota_keeper(&self) -> Address {
        *self.pool_quota_keeper.get()
    }

    /// Connected credit managers in the pool's list order.
    pub fn credit_managers(&self) -> impl Iterator<Item = Address> + '_ {
        self.credit_manager_debt_limits
            .iter()
            .map(|entry| entry.credit_manager)
    }

    /// Debt limits of connected credit managers in the pool's list order.
    pub fn credit_manager_debt_limits(&self) -> &[CreditManagerDebtLimit] {
        &self.credit_manager_debt_limits
    }

    /// Propose a new total debt limit.
    pub fn set_total_debt_limit(&mut self, limit: U256) {
        self.total_debt_limit.set(limit);
    }

    /// Propose a new withdrawal fee.
    pub fn set_withdraw_fee(&mut self, fee: Bps) {
        self.withdraw_fee.set(fee);
    }

    /// Propose a new interest rate model.
    pub fn set_interest_rate_model(&mut self, model: Address) {
        self.interest_rate_model.set(model);
    }

    /// Propose a new debt limit for the credit manager at `ix` in the pool's
    /// list.
    pub fn set_credit_manager_debt_limit(
        &mut self,
        ix: usize,
        limit: U256,
    ) -> Result<(), KeyNotFound> {
        self.credit_manager_debt_limits
            .get_mut(ix)
            .ok_or_else(|| KeyNotFound::new("pool credit manager debt limits", ix))?
            .limit
            .set(limit);
        Ok(())
    }

    /// Propose connecting a credit manager with the given debt limit.
    ///
    /// Returns the credit manager's index in the pool's list. A deployed
    /// credit manager that is already connected keeps its index and has its
    /// limit updated. New credit managers are always appended.
    pub fn add_credit_manager(&mut self, credit_manager: Address, limit: U256) -> usize {
        let connected = self.credit_manager_debt_limits.iter().position(|entry| {
            credit_manager != NOT_DEPLOYED && entry.credit_manager == credit_manager
        });
        match connected {
            Some(ix) => {
                self.credit_manager_debt_limits[ix].limit.set(limit);
                ix
            }
            None => {
                self.credit_manager_debt_limits.push(CreditManagerDebtLimit {
                    credit_manager,
                    limit: TrackedValue::new(limit),
                });
                self.credit_manager_debt_limits.len() - 1
            }
        }
    }

    /// Sum of all credit manager debt limits, saturating.
    pub fn credit_manager_debt_limits_sum(&self) -> U256 {
        self.credit_manager_debt_limits
            .iter()
            .fold(U256::ZERO, |acc, entry| acc.saturating_add(*entry.limit.get()))
    }
}

impl ConfiguratorNode for Pool {
    fn address(&self) -> Address {
        self.address
    }

    fn is_modified(&self) -> bool {
        self.total_debt_limit.is_modified()
            || self.withdraw_fee.is_modified()
            || self.interest_rate_model.is_modified()
            || self.pool_quota_keeper.is_modified()
            || self
                .credit_manager_debt_limits
                .iter()
                .any(|entry| entry.limit.is_modified())
    }

    fn validate(&self) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        if self.withdraw_fee() > MAX_WITHDRAW_FEE {
            outcome.error(format!(
                "pool {}: withdraw fee ({}) exceeds {MAX_WITHDRAW_FEE}",
                self.symbol,
                self.withdraw_fee()
            ));
        }
        if self.underlying == NOT_DEPLOYED {
            outcome.error(format!("pool {}: underlying is the zero address", self.symbol));
        }
        outcome
    }
}

impl Deployable for Pool {
    type DeployConfig = PoolDeployConfig;

    fn deploy_config(&self) -> Self::DeployConfig {
        PoolDeployConfig {
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            underlying: self.underlying,
            decimals: self.decimals,
            total_debt_limit: self.total_debt_limit(),
            withdraw_fee: self.withdraw_fee(),
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let amount = Some(self.decimals);
        render::header(f, &format!("Pool {} ({})", self.symbol, self.name), self.address)?;
        render::field(f, "total debt limit", &self.total_debt_limit, amount)?;
        render::field(f, "withdraw fee", &self.withdraw_fee, Some(PERCENTAGE_DECIMALS))?;
        render::field(f, "interest rate model", &self.interest_rate_model, None)?;
        render::field(f, "quota keeper", &self.pool_quota_keeper, None)?;
        if self.credit_manager_debt_limits.is_empty() {
            return writeln!(f, "  credit manager debt limits: none");
        }
        writeln!(f, "  credit manager debt limits:")?;
        for (ix, entry) in self.credit_manager_debt_limits.iter().enumerate() {
            let credit_manager = if entry.credit_manager == NOT_DEPLOYED {
                format!("#{ix}")
            } else {
                entry.credit_manager.render(None)
            };
            writeln!(f, "    {credit_manager}: {}", entry.limit.render(amount))?;
        }
        Ok(())
    }
}
