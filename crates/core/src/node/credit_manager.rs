//! Credit manager parameters.

use crate::{error::KeyNotFound, render, ConfiguratorNode, Deployable};
use configurator_state_read::{read, ChainRead, Field, ReadResult};
use configurator_types::{
    Address, Bps, TrackedValue, ValidationOutcome, NOT_DEPLOYED, PERCENTAGE_DECIMALS,
    PERCENTAGE_FACTOR, U256,
};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A credit manager connected to a pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreditManager {
    address: Address,
    name: String,
    pool: Address,
    underlying: Address,
    decimals: u8,
    min_debt: TrackedValue<U256>,
    max_debt: TrackedValue<U256>,
    fee_interest: TrackedValue<Bps>,
    fee_liquidation: TrackedValue<Bps>,
    liquidation_premium: TrackedValue<Bps>,
    fee_liquidation_expired: TrackedValue<Bps>,
    liquidation_premium_expired: TrackedValue<Bps>,
    collateral_tokens: BTreeMap<Address, TrackedValue<Bps>>,
}

/// [`CreditManager`] deployment configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditManagerDeployConfig {
    /// Human-readable name.
    pub name: String,
    /// The amount the credit manager may borrow from its pool.
    ///
    /// Held by the pool, see [`Pool::credit_manager_debt_limits`][crate::node::Pool::credit_manager_debt_limits].
    #[serde(default)]
    pub debt_limit: U256,
    /// Smallest debt of a credit account.
    pub min_debt: U256,
    /// Largest debt of a credit account.
    pub max_debt: U256,
    /// Fee on interest paid to the protocol.
    pub fee_interest: Bps,
    /// Fee on liquidations paid to the protocol.
    pub fee_liquidation: Bps,
    /// Premium paid to liquidators.
    pub liquidation_premium: Bps,
    /// Fee on liquidations of expired accounts.
    pub fee_liquidation_expired: Bps,
    /// Premium paid to liquidators of expired accounts.
    pub liquidation_premium_expired: Bps,
    /// Liquidation thresholds keyed by collateral token.
    #[serde(default)]
    pub collateral_tokens: BTreeMap<Address, Bps>,
}

impl CreditManager {
    /// A credit manager that is not deployed yet, for a pool with the given
    /// underlying token.
    pub fn new(config: CreditManagerDeployConfig, underlying: Address, decimals: u8) -> Self {
        Self {
            address: NOT_DEPLOYED,
            name: config.name,
            pool: NOT_DEPLOYED,
            underlying,
            decimals,
            min_debt: TrackedValue::new(config.min_debt),
            max_debt: TrackedValue::new(config.max_debt),
            fee_interest: TrackedValue::new(config.fee_interest),
            fee_liquidation: TrackedValue::new(config.fee_liquidation),
            liquidation_premium: TrackedValue::new(config.liquidation_premium),
            fee_liquidation_expired: TrackedValue::new(config.fee_liquidation_expired),
            liquidation_premium_expired: TrackedValue::new(config.liquidation_premium_expired),
            collateral_tokens: config
                .collateral_tokens
                .into_iter()
                .map(|(token, lt)| (token, TrackedValue::new(lt)))
                .collect(),
        }
    }

    /// Attach to a deployed credit manager.
    ///
    /// `decimals` of the pool's underlying token are only used for rendering.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub async fn attach<S: ChainRead>(
        address: Address,
        decimals: u8,
        state: &S,
    ) -> ReadResult<Self, S::Error> {
        let field = Field::plain;
        let name = read(state, address, field("name")).await?;
        let pool = read(state, address, field("pool")).await?;
        let underlying = read(state, address, field("underlying")).await?;
        let min_debt: U256 = read(state, address, field("minDebt")).await?;
        let max_debt: U256 = read(state, address, field("maxDebt")).await?;
        let fee_interest: Bps = read(state, address, field("feeInterest")).await?;
        let fee_liquidation: Bps = read(state, address, field("feeLiquidation")).await?;
        let liquidation_premium: Bps = read(state, address, field("liquidationPremium")).await?;
        let fee_liquidation_expired: Bps =
            read(state, address, field("feeLiquidationExpired")).await?;
        let liquidation_premium_expired: Bps =
            read(state, address, field("liquidationPremiumExpired")).await?;
        let tokens: Vec<Address> = read(state, address, field("collateralTokens")).await?;
        let mut collateral_tokens = BTreeMap::new();
        for token in tokens {
            let lt: Bps = read(state, address, Field::at("liquidationThresholds", token)).await?;
            collateral_tokens.insert(token, TrackedValue::attached(lt));
        }
        Ok(Self {
            address,
            name,
            pool,
            underlying,
            decimals,
            min_debt: TrackedValue::attached(min_debt),
            max_debt: TrackedValue::attached(max_debt),
            fee_interest: TrackedValue::attached(fee_interest),
            fee_liquidation: TrackedValue::attached(fee_liquidation),
            liquidation_premium: TrackedValue::attached(liquidation_premium),
            fee_liquidation_expired: TrackedValue::attached(fee_liquidation_expired),
            liquidation_premium_expired: TrackedValue::attached(liquidation_premium_expired),
            collateral_tokens,
        })
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pool this credit manager borrows from.
    pub fn pool(&self) -> Address {
        self.pool
    }

    /// The underlying token.
    pub fn underlying(&self) -> Address {
        self.underlying
    }

    /// Current `(min_debt, max_debt)`.
    pub fn debt_limits(&self) -> (U256, U256) {
        (*self.min_debt.get(), *self.max_debt.get())
    }

    /// Liquidation threshold of the underlying token implied by the fees.
    pub fn underlying_liquidation_threshold(&self) -> Bps {
        PERCENTAGE_FACTOR
            .saturating_sub(*self.fee_liquidation.get())
            .saturating_sub(*self.liquidation_premium.get())
    }

    /// Liquidation thresholds keyed by collateral token.
    pub fn collateral_tokens(&self) -> &BTreeMap<Address, TrackedValue<Bps>> {
        &self.collateral_tokens
    }

    /// Propose new debt limits.
    pub fn set_debt_limits(&mut self, min_debt: U256, max_debt: U256) {
        self.min_debt.set(min_debt);
        self.max_debt.set(max_debt);
    }

    /// Propose new fees.
    pub fn set_fees(
        &mut self,
        fee_interest: Bps,
        fee_liquidation: Bps,
        liquidation_premium: Bps,
        fee_liquidation_expired: Bps,
        liquidation_premium_expired: Bps,
    ) {
        self.fee_interest.set(fee_interest);
        self.fee_liquidation.set(fee_liquidation);
        self.liquidation_premium.set(liquidation_premium);
        self.fee_liquidation_expired.set(fee_liquidation_expired);
        self.liquidation_premium_expired
            .set(liquidation_premium_expired);
    }

    /// Propose a new liquidation threshold for an existing collateral token.
    pub fn set_liquidation_threshold(&mut self, token: Address, lt: Bps) -> Result<(), KeyNotFound> {
        self.collateral_tokens
            .get_mut(&token)
            .ok_or_else(|| KeyNotFound::new("credit manager collateral tokens", token))?
            .set(lt);
        Ok(())
    }

    /// Propose a new collateral token.
    pub fn add_collateral_token(&mut self, token: Address, lt: Bps) {
        self.collateral_tokens
            .entry(token)
            .or_insert_with(|| TrackedValue::new(lt));
    }
}

impl ConfiguratorNode for CreditManager {
    fn address(&self) -> Address {
        self.address
    }

    fn is_modified(&self) -> bool {
        self.min_debt.is_modified()
            || self.max_debt.is_modified()
            || [
                &self.fee_interest,
                &self.fee_liquidation,
                &self.liquidation_premium,
                &self.fee_liquidation_expired,
                &self.liquidation_premium_expired,
            ]
            .iter()
            .any(|v| v.is_modified())
            || render::any_modified(&self.collateral_tokens)
    }

    fn validate(&self) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        let name = &self.name;
        let (min_debt, max_debt) = self.debt_limits();
        if min_debt > max_debt {
            outcome.error(format!("credit manager {name}: min debt exceeds max debt"));
        }
        if max_debt.is_zero() {
            outcome.warning(format!("credit manager {name}: max debt is zero"));
        }
        let fees = [
            (*self.fee_liquidation.get(), *self.liquidation_premium.get()),
            (
                *self.fee_liquidation_expired.get(),
                *self.liquidation_premium_expired.get(),
            ),
        ];
        for (fee, premium) in fees {
            if u32::from(fee) + u32::from(premium) > u32::from(PERCENTAGE_FACTOR) {
                outcome.error(format!(
                    "credit manager {name}: liquidation fee and premium exceed 100%"
                ));
            }
        }
        if *self.fee_interest.get() > PERCENTAGE_FACTOR {
            outcome.error(format!("credit manager {name}: interest fee exceeds 100%"));
        }
        let underlying_lt = self.underlying_liquidation_threshold();
        for (token, lt) in &self.collateral_tokens {
            if *lt.get() > underlying_lt {
                outcome.error(format!(
                    "credit manager {name}: liquidation threshold of {token} ({}) exceeds that of the underlying ({underlying_lt})",
                    lt.get()
                ));
            }
        }
        outcome
    }
}

impl Deployable for CreditManager {
    type DeployConfig = CreditManagerDeployConfig;

    /// The debt limit is held by the pool and left at zero here.
    fn deploy_config(&self) -> Self::DeployConfig {
        let (min_debt, max_debt) = self.debt_limits();
        CreditManagerDeployConfig {
            name: self.name.clone(),
            debt_limit: U256::ZERO,
            min_debt,
            max_debt,
            fee_interest: *self.fee_interest.get(),
            fee_liquidation: *self.fee_liquidation.get(),
            liquidation_premium: *self.liquidation_premium.get(),
            fee_liquidation_expired: *self.fee_liquidation_expired.get(),
            liquidation_premium_expired: *self.liquidation_premium_expired.get(),
            collateral_tokens: self
                .collateral_tokens
                .iter()
                .map(|(token, lt)| (*token, *lt.get()))
                .collect(),
        }
    }
}

impl fmt::Display for CreditManager {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let amount = Some(self.decimals);
        let pct = Some(PERCENTAGE_DECIMALS);
        render::header(f, &format!("Credit manager {}", self.name), self.address)?;
        render::field(f, "min debt", &self.min_debt, amount)?;
        render::field(f, "max debt", &self.max_debt, amount)?;
        render::field(f, "fee interest", &self.fee_interest, pct)?;
        render::field(f, "fee liquidation", &self.fee_liquidation, pct)?;
        render::field(f, "liquidation premium", &self.liquidation_premium, pct)?;
        render::field(f, "fee liquidation expired", &self.fee_liquidation_expired, pct)?;
        render::field(
            f,
            "liquidation premium expired",
            &self.liquidation_premium_expired,
            pct,
        )?;
        render::entries(f, "liquidation thresholds", &self.collateral_tokens, pct)
    }
}
