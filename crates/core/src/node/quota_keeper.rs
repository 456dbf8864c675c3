//! Pool quota keeper: per-token quota limits and fees.

use crate::{error::KeyNotFound, render, ConfiguratorNode, Deployable};
use configurator_state_read::{read, ChainRead, Field, ReadResult};
use configurator_types::{
    Address, Bps, Render, TrackedValue, ValidationOutcome, NOT_DEPLOYED, PERCENTAGE_DECIMALS,
    PERCENTAGE_FACTOR, U256,
};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tracked quota parameters of a single token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenQuota {
    /// Total quota limit across all credit accounts.
    pub limit: TrackedValue<U256>,
    /// One-off fee charged on quota increase.
    pub increase_fee: TrackedValue<Bps>,
}

/// Plain quota parameters of a single token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenQuotaParams {
    /// Total quota limit across all credit accounts.
    pub limit: U256,
    /// One-off fee charged on quota increase.
    pub increase_fee: Bps,
}

/// The pool's quota keeper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolQuotaKeeper {
    address: Address,
    gauge: TrackedValue<Address>,
    quotas: BTreeMap<Address, TokenQuota>,
}

/// [`PoolQuotaKeeper`] deployment configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaKeeperDeployConfig {
    /// Quota parameters keyed by token.
    pub quotas: BTreeMap<Address, TokenQuotaParams>,
}

impl TokenQuota {
    fn new(params: TokenQuotaParams) -> Self {
        Self {
            limit: TrackedValue::new(params.limit),
            increase_fee: TrackedValue::new(params.increase_fee),
        }
    }

    /// The current parameters.
    pub fn params(&self) -> TokenQuotaParams {
        TokenQuotaParams {
            limit: *self.limit.get(),
            increase_fee: *self.increase_fee.get(),
        }
    }

    fn is_modified(&self) -> bool {
        self.limit.is_modified() || self.increase_fee.is_modified()
    }
}

impl PoolQuotaKeeper {
    /// A quota keeper that is not deployed yet.
    ///
    /// The gauge is not deployed yet either.
    pub fn new(config: QuotaKeeperDeployConfig) -> Self {
        Self {
            address: NOT_DEPLOYED,
            gauge: TrackedValue::new(NOT_DEPLOYED),
            quotas: config
                .quotas
                .into_iter()
                .map(|(token, params)| (token, TokenQuota::new(params)))
                .collect(),
        }
    }

    /// Attach to a deployed quota keeper.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub async fn attach<S: ChainRead>(address: Address, state: &S) -> ReadResult<Self, S::Error> {
        let gauge: Address = read(state, address, Field::plain("gauge")).await?;
        let tokens: Vec<Address> = read(state, address, Field::plain("quotedTokens")).await?;
        let mut quotas = BTreeMap::new();
        for token in tokens {
            let limit: U256 = read(state, address, Field::at("limit", token)).await?;
            let increase_fee: Bps =
                read(state, address, Field::at("quotaIncreaseFee", token)).await?;
            let quota = TokenQuota {
                limit: TrackedValue::attached(limit),
                increase_fee: TrackedValue::attached(increase_fee),
            };
            quotas.insert(token, quota);
        }
        Ok(Self {
            address,
            gauge: TrackedValue::attached(gauge),
            quotas,
        })
    }

    /// The current gauge.
    pub fn gauge(&self) -> Address {
        *self.gauge.get()
    }

    /// All tracked quotas.
    pub fn quotas(&self) -> &BTreeMap<Address, TokenQuota> {
        &self.quotas
    }

    /// Propose a new gauge.
    pub fn set_gauge(&mut self, gauge: Address) {
        self.gauge.set(gauge);
    }

    fn quota_mut(&mut self, token: Address) -> Result<&mut TokenQuota, KeyNotFound> {
        self.quotas
            .get_mut(&token)
            .ok_or_else(|| KeyNotFound::new("quota keeper quotas", token))
    }

    /// Propose a new limit for a quoted token.
    pub fn set_token_limit(&mut self, token: Address, limit: U256) -> Result<(), KeyNotFound> {
        self.quota_mut(token)?.limit.set(limit);
        Ok(())
    }

    /// Propose a new quota increase fee for a quoted token.
    pub fn set_increase_fee(&mut self, token: Address, fee: Bps) -> Result<(), KeyNotFound> {
        self.quota_mut(token)?.increase_fee.set(fee);
        Ok(())
    }

    /// Propose quoting a new token.
    pub fn add_quota_token(&mut self, token: Address, params: TokenQuotaParams) {
        self.quotas
            .entry(token)
            .or_insert_with(|| TokenQuota::new(params));
    }
}

impl ConfiguratorNode for PoolQuotaKeeper {
    fn address(&self) -> Address {
        self.address
    }

    fn is_modified(&self) -> bool {
        self.gauge.is_modified() || self.quotas.values().any(TokenQuota::is_modified)
    }

    fn validate(&self) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        for (token, quota) in &self.quotas {
            let params = quota.params();
            if params.increase_fee > PERCENTAGE_FACTOR {
                outcome.error(format!(
                    "quota keeper: increase fee for {token} exceeds 100%"
                ));
            }
            if params.limit.is_zero() {
                outcome.warning(format!("quota keeper: limit for {token} is zero"));
            }
        }
        outcome
    }
}

impl Deployable for PoolQuotaKeeper {
    type DeployConfig = QuotaKeeperDeployConfig;

    fn deploy_config(&self) -> Self::DeployConfig {
        QuotaKeeperDeployConfig {
            quotas: self
                .quotas
                .iter()
                .map(|(token, quota)| (*token, quota.params()))
                .collect(),
        }
    }
}

impl fmt::Display for PoolQuotaKeeper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        render::header(f, "Pool quota keeper", self.address)?;
        render::field(f, "gauge", &self.gauge, None)?;
        if self.quotas.is_empty() {
            return writeln!(f, "  quotas: none");
        }
        writeln!(f, "  quotas:")?;
        for (token, quota) in &self.quotas {
            writeln!(
                f,
                "    {}: limit {}, increase fee {}",
                token.render(None),
                quota.limit.render(None),
                quota.increase_fee.render(Some(PERCENTAGE_DECIMALS)),
            )?;
        }
        Ok(())
    }
}
