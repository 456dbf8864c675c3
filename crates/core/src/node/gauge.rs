//! Gauge voting on per-token quota rates.

use crate::{error::KeyNotFound, render, ConfiguratorNode, Deployable};
use configurator_state_read::{read, ChainRead, Field, ReadResult};
use configurator_types::{
    Address, Bps, Render, TrackedValue, ValidationOutcome, NOT_DEPLOYED, PERCENTAGE_DECIMALS,
    PERCENTAGE_FACTOR,
};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bounds of a token's quota rate, in basis points per year.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRates {
    /// Lowest rate voters can push the token to.
    pub min_rate: Bps,
    /// Highest rate voters can push the token to.
    pub max_rate: Bps,
}

/// The gauge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gauge {
    address: Address,
    rates: BTreeMap<Address, TrackedValue<QuotaRates>>,
}

/// [`Gauge`] deployment configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaugeDeployConfig {
    /// Rate bounds keyed by token.
    pub rates: BTreeMap<Address, QuotaRates>,
}

impl Render for QuotaRates {
    fn render(&self, decimals: Option<u8>) -> String {
        format!(
            "{}..{}",
            self.min_rate.render(decimals),
            self.max_rate.render(decimals)
        )
    }
}

impl Gauge {
    /// A gauge that is not deployed yet.
    pub fn new(config: GaugeDeployConfig) -> Self {
        Self {
            address: NOT_DEPLOYED,
            rates: config
                .rates
                .into_iter()
                .map(|(token, rates)| (token, TrackedValue::new(rates)))
                .collect(),
        }
    }

    /// Attach to a deployed gauge.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub async fn attach<S: ChainRead>(address: Address, state: &S) -> ReadResult<Self, S::Error> {
        let tokens: Vec<Address> = read(state, address, Field::plain("quotedTokens")).await?;
        let mut rates = BTreeMap::new();
        for token in tokens {
            let min_rate = read(state, address, Field::at("minRate", token)).await?;
            let max_rate = read(state, address, Field::at("maxRate", token)).await?;
            let params = QuotaRates { min_rate, max_rate };
            rates.insert(token, TrackedValue::attached(params));
        }
        Ok(Self { address, rates })
    }

    /// Current rate bounds keyed by token.
    pub fn rates(&self) -> &BTreeMap<Address, TrackedValue<QuotaRates>> {
        &self.rates
    }

    /// Propose new rate bounds for an existing token.
    pub fn set_rates(&mut self, token: Address, rates: QuotaRates) -> Result<(), KeyNotFound> {
        self.rates
            .get_mut(&token)
            .ok_or_else(|| KeyNotFound::new("gauge rates", token))?
            .set(rates);
        Ok(())
    }

    /// Propose rate bounds for a new token.
    pub fn add_token(&mut self, token: Address, rates: QuotaRates) {
        self.rates
            .entry(token)
            .or_insert_with(|| TrackedValue::new(rates));
    }
}

impl ConfiguratorNode for Gauge {
    fn address(&self) -> Address {
        self.address
    }

    fn is_modified(&self) -> bool {
        render::any_modified(&self.rates)
    }

    fn validate(&self) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        for (token, rates) in &self.rates {
            let QuotaRates { min_rate, max_rate } = *rates.get();
            if min_rate > max_rate {
                outcome.error(format!(
                    "gauge: min rate ({min_rate}) exceeds max rate ({max_rate}) for {token}"
                ));
            }
            if max_rate > PERCENTAGE_FACTOR {
                outcome.warning(format!("gauge: max rate for {token} exceeds 100%"));
            }
        }
        outcome
    }
}

impl Deployable for Gauge {
    type DeployConfig = GaugeDeployConfig;

    fn deploy_config(&self) -> Self::DeployConfig {
        GaugeDeployConfig {
            rates: self
                .rates
                .iter()
                .map(|(token, rates)| (*token, *rates.get()))
                .collect(),
        }
    }
}

impl fmt::Display for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        render::header(f, "Gauge", self.address)?;
        render::entries(f, "rates", &self.rates, Some(PERCENTAGE_DECIMALS))
    }
}
