//! Two-kink linear interest rate model.

use crate::{render, ConfiguratorNode, Deployable};
use configurator_state_read::{read, ChainRead, Field, ReadResult};
use configurator_types::{
    Address, Bps, TrackedValue, ValidationOutcome, NOT_DEPLOYED, PERCENTAGE_DECIMALS,
    PERCENTAGE_FACTOR,
};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Interest rate model parameters, all in basis points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearModelParams {
    /// First utilisation kink.
    pub u_1: Bps,
    /// Second utilisation kink.
    pub u_2: Bps,
    /// Base rate at zero utilisation.
    pub r_base: Bps,
    /// Slope between zero utilisation and `u_1`.
    pub r_slope1: Bps,
    /// Slope between `u_1` and `u_2`.
    pub r_slope2: Bps,
    /// Slope above `u_2`.
    pub r_slope3: Bps,
    /// Whether borrowing above `u_2` is forbidden.
    pub is_borrowing_more_u2_forbidden: bool,
}

/// A linear interest rate model.
///
/// Deployed models are immutable; a change to any parameter means deploying
/// a new model and pointing the pool at it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearModel {
    address: Address,
    u_1: TrackedValue<Bps>,
    u_2: TrackedValue<Bps>,
    r_base: TrackedValue<Bps>,
    r_slope1: TrackedValue<Bps>,
    r_slope2: TrackedValue<Bps>,
    r_slope3: TrackedValue<Bps>,
    is_borrowing_more_u2_forbidden: TrackedValue<bool>,
}

impl LinearModel {
    /// A model that is not deployed yet.
    pub fn new(params: LinearModelParams) -> Self {
        Self {
            address: NOT_DEPLOYED,
            u_1: TrackedValue::new(params.u_1),
            u_2: TrackedValue::new(params.u_2),
            r_base: TrackedValue::new(params.r_base),
            r_slope1: TrackedValue::new(params.r_slope1),
            r_slope2: TrackedValue::new(params.r_slope2),
            r_slope3: TrackedValue::new(params.r_slope3),
            is_borrowing_more_u2_forbidden: TrackedValue::new(params.is_borrowing_more_u2_forbidden),
        }
    }

    /// Attach to a deployed model.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub async fn attach<S: ChainRead>(address: Address, state: &S) -> ReadResult<Self, S::Error> {
        let field = Field::plain;
        Ok(Self {
            address,
            u_1: TrackedValue::attached(read(state, address, field("U_1")).await?),
            u_2: TrackedValue::attached(read(state, address, field("U_2")).await?),
            r_base: TrackedValue::attached(read(state, address, field("R_base")).await?),
            r_slope1: TrackedValue::attached(read(state, address, field("R_slope1")).await?),
            r_slope2: TrackedValue::attached(read(state, address, field("R_slope2")).await?),
            r_slope3: TrackedValue::attached(read(state, address, field("R_slope3")).await?),
            is_borrowing_more_u2_forbidden: TrackedValue::attached(
                read(state, address, field("isBorrowingMoreU2Forbidden")).await?,
            ),
        })
    }

    /// The current parameters.
    pub fn params(&self) -> LinearModelParams {
        LinearModelParams {
            u_1: *self.u_1.get(),
            u_2: *self.u_2.get(),
            r_base: *self.r_base.get(),
            r_slope1: *self.r_slope1.get(),
            r_slope2: *self.r_slope2.get(),
            r_slope3: *self.r_slope3.get(),
            is_borrowing_more_u2_forbidden: *self.is_borrowing_more_u2_forbidden.get(),
        }
    }

    /// Propose new parameters.
    pub fn set_params(&mut self, params: LinearModelParams) {
        self.u_1.set(params.u_1);
        self.u_2.set(params.u_2);
        self.r_base.set(params.r_base);
        self.r_slope1.set(params.r_slope1);
        self.r_slope2.set(params.r_slope2);
        self.r_slope3.set(params.r_slope3);
        self.is_borrowing_more_u2_forbidden
            .set(params.is_borrowing_more_u2_forbidden);
    }
}

impl ConfiguratorNode for LinearModel {
    fn address(&self) -> Address {
        self.address
    }

    fn is_modified(&self) -> bool {
        [
            &self.u_1,
            &self.u_2,
            &self.r_base,
            &self.r_slope1,
            &self.r_slope2,
            &self.r_slope3,
        ]
        .iter()
        .any(|v| v.is_modified())
            || self.is_borrowing_more_u2_forbidden.is_modified()
    }

    fn validate(&self) -> ValidationOutcome {
        let p = self.params();
        let mut outcome = ValidationOutcome::new();
        if p.u_1 > p.u_2 {
            outcome.error(format!("linear model: U_1 ({}) exceeds U_2 ({})", p.u_1, p.u_2));
        }
        if p.u_2 > PERCENTAGE_FACTOR {
            outcome.error(format!("linear model: U_2 ({}) exceeds 100%", p.u_2));
        }
        if p.r_slope1 > p.r_slope2 || p.r_slope2 > p.r_slope3 {
            outcome.warning("linear model: slopes are not increasing");
        }
        if p.r_base == 0 && p.r_slope1 == 0 {
            outcome.warning("linear model: borrow rate is zero at low utilisation");
        }
        outcome
    }
}

impl Deployable for LinearModel {
    type DeployConfig = LinearModelParams;

    fn deploy_config(&self) -> Self::DeployConfig {
        self.params()
    }
}

impl fmt::Display for LinearModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pct = Some(PERCENTAGE_DECIMALS);
        render::header(f, "Linear interest rate model", self.address)?;
        render::field(f, "U_1", &self.u_1, pct)?;
        render::field(f, "U_2", &self.u_2, pct)?;
        render::field(f, "R_base", &self.r_base, pct)?;
        render::field(f, "R_slope1", &self.r_slope1, pct)?;
        render::field(f, "R_slope2", &self.r_slope2, pct)?;
        render::field(f, "R_slope3", &self.r_slope3, pct)?;
        render::field(
            f,
            "borrowing above U_2 forbidden",
            &self.is_borrowing_more_u2_forbidden,
            None,
        )
    }
}
