//! The configuration node family.
//!
//! Each node exclusively owns its state. Fields are [`TrackedValue`]s, plain
//! values fixed for the node's lifetime, or keyed collections of
//! [`TrackedValue`]s.
//!
//! [`TrackedValue`]: crate::types::TrackedValue

pub use acl::{Acl, AclDeployConfig};
pub use address_provider::{AddressProvider, AddressProviderDeployConfig};
pub use contracts_register::ContractsRegister;
pub use credit_manager::{CreditManager, CreditManagerDeployConfig};
pub use gauge::{Gauge, GaugeDeployConfig, QuotaRates};
pub use linear_model::{LinearModel, LinearModelParams};
pub use pool::{CreditManagerDebtLimit, Pool, PoolDeployConfig};
pub use price_oracle::{PriceFeed, PriceFeedParams, PriceOracle, PriceOracleDeployConfig};
pub use quota_keeper::{PoolQuotaKeeper, QuotaKeeperDeployConfig, TokenQuota, TokenQuotaParams};

mod acl;
pub mod address_provider;
mod contracts_register;
mod credit_manager;
mod gauge;
mod linear_model;
mod pool;
mod price_oracle;
mod quota_keeper;
