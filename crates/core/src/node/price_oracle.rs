//! Price oracle with one price feed per token.

use crate::{error::KeyNotFound, render, ConfiguratorNode, Deployable};
use configurator_state_read::{read, ChainRead, Field, ReadResult};
use configurator_types::{Address, Render, TrackedValue, ValidationOutcome, NOT_DEPLOYED};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The tracked price feed of a single token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceFeed {
    /// The feed contract.
    pub feed: TrackedValue<Address>,
    /// Seconds after which an answer is considered stale.
    pub staleness_period: TrackedValue<u32>,
}

/// Plain price feed parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFeedParams {
    /// The feed contract.
    pub feed: Address,
    /// Seconds after which an answer is considered stale.
    pub staleness_period: u32,
}

/// The price oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceOracle {
    address: Address,
    feeds: BTreeMap<Address, PriceFeed>,
}

/// [`PriceOracle`] deployment configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOracleDeployConfig {
    /// Price feeds keyed by token.
    pub feeds: BTreeMap<Address, PriceFeedParams>,
}

impl PriceFeed {
    fn new(params: PriceFeedParams) -> Self {
        Self {
            feed: TrackedValue::new(params.feed),
            staleness_period: TrackedValue::new(params.staleness_period),
        }
    }

    /// The current parameters.
    pub fn params(&self) -> PriceFeedParams {
        PriceFeedParams {
            feed: *self.feed.get(),
            staleness_period: *self.staleness_period.get(),
        }
    }

    fn is_modified(&self) -> bool {
        self.feed.is_modified() || self.staleness_period.is_modified()
    }
}

impl PriceOracle {
    /// A price oracle that is not deployed yet.
    pub fn new(config: PriceOracleDeployConfig) -> Self {
        Self {
            address: NOT_DEPLOYED,
            feeds: config
                .feeds
                .into_iter()
                .map(|(token, params)| (token, PriceFeed::new(params)))
                .collect(),
        }
    }

    /// Attach to a deployed price oracle, reading the feed of every token.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub async fn attach<S: ChainRead>(address: Address, state: &S) -> ReadResult<Self, S::Error> {
        let tokens: Vec<Address> = read(state, address, Field::plain("getTokens")).await?;
        let mut feeds = BTreeMap::new();
        for token in tokens {
            let feed: Address = read(state, address, Field::at("priceFeeds", token)).await?;
            let staleness_period: u32 =
                read(state, address, Field::at("stalenessPeriod", token)).await?;
            let feed = PriceFeed {
                feed: TrackedValue::attached(feed),
                staleness_period: TrackedValue::attached(staleness_period),
            };
            feeds.insert(token, feed);
        }
        Ok(Self { address, feeds })
    }

    /// All tracked feeds.
    pub fn feeds(&self) -> &BTreeMap<Address, PriceFeed> {
        &self.feeds
    }

    /// Whether a feed is configured for `token`.
    pub fn has_feed(&self, token: &Address) -> bool {
        self.feeds.contains_key(token)
    }

    /// Propose new parameters for an existing token's feed.
    pub fn set_price_feed(&mut self, token: Address, params: PriceFeedParams) -> Result<(), KeyNotFound> {
        let feed = self
            .feeds
            .get_mut(&token)
            .ok_or_else(|| KeyNotFound::new("price oracle feeds", token))?;
        feed.feed.set(params.feed);
        feed.staleness_period.set(params.staleness_period);
        Ok(())
    }

    /// Propose a feed for a token that has none.
    ///
    /// If the token already has a feed, its parameters are updated instead.
    pub fn add_price_feed(&mut self, token: Address, params: PriceFeedParams) {
        if self.set_price_feed(token, params).is_err() {
            self.feeds.insert(token, PriceFeed::new(params));
        }
    }
}

impl ConfiguratorNode for PriceOracle {
    fn address(&self) -> Address {
        self.address
    }

    fn is_modified(&self) -> bool {
        self.feeds.values().any(PriceFeed::is_modified)
    }

    fn validate(&self) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        for (token, feed) in &self.feeds {
            let params = feed.params();
            if params.feed == NOT_DEPLOYED {
                outcome.error(format!("price oracle: feed for {token} is the zero address"));
            }
            if params.staleness_period == 0 {
                outcome.warning(format!("price oracle: staleness period for {token} is zero"));
            }
        }
        outcome
    }
}

impl Deployable for PriceOracle {
    type DeployConfig = PriceOracleDeployConfig;

    fn deploy_config(&self) -> Self::DeployConfig {
        PriceOracleDeployConfig {
            feeds: self
                .feeds
                .iter()
                .map(|(token, feed)| (*token, feed.params()))
                .collect(),
        }
    }
}

impl fmt::Display for PriceOracle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        render::header(f, "Price oracle", self.address)?;
        if self.feeds.is_empty() {
            return writeln!(f, "  feeds: none");
        }
        writeln!(f, "  feeds:")?;
        for (token, feed) in &self.feeds {
            writeln!(
                f,
                "    {}: {} (staleness {})",
                token.render(None),
                feed.feed.render(None),
                feed.staleness_period.render(None),
            )?;
        }
        Ok(())
    }
}
