#![allow(dead_code)]

use configurator_core::{
    state_read::{ChainRead, Field, ReadValue},
    types::{Address, U256},
};
use std::{
    collections::BTreeMap,
    future::{self, Ready},
    sync::Arc,
};
use thiserror::Error;

// A test `ChainRead` implementation represented using a map.
#[derive(Clone, Debug, Default)]
pub struct State(Arc<BTreeMap<(Address, Field), ReadValue>>);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("no value for {1} on {0}")]
pub struct MissingField(pub Address, pub Field);

impl State {
    pub fn set(&mut self, contract: Address, field: Field, value: impl Into<ReadValue>) {
        Arc::make_mut(&mut self.0).insert((contract, field), value.into());
    }

    pub fn remove(&mut self, contract: Address, field: &Field) {
        Arc::make_mut(&mut self.0).remove(&(contract, field.clone()));
    }

    pub fn get(&self, contract: Address, field: Field) -> Result<ReadValue, MissingField> {
        self.0
            .get(&(contract, field.clone()))
            .cloned()
            .ok_or(MissingField(contract, field))
    }
}

impl ChainRead for State {
    type Error = MissingField;
    type Future = Ready<Result<ReadValue, Self::Error>>;
    fn read(&self, contract: Address, field: Field) -> Self::Future {
        future::ready(self.get(contract, field))
    }
}

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn uint(v: u64) -> ReadValue {
    ReadValue::Uint(U256::from(v))
}

pub const ADDRESS_PROVIDER: u8 = 0x01;
pub const ACL: u8 = 0x02;
pub const CONTRACTS_REGISTER: u8 = 0x03;
pub const PRICE_ORACLE: u8 = 0x04;
pub const TREASURY: u8 = 0x05;
pub const OWNER: u8 = 0x06;
pub const ADMIN: u8 = 0x07;

pub const USDC: u8 = 0x10;
pub const WETH: u8 = 0x11;
pub const WBTC: u8 = 0x12;

/// Addresses of one pool subtree.
#[derive(Clone, Copy, Debug)]
pub struct PoolAddrs {
    pub pool: Address,
    pub model: Address,
    pub quota_keeper: Address,
    pub gauge: Address,
    pub credit_manager: Address,
    pub underlying: Address,
}

impl PoolAddrs {
    pub fn new(base: u8, underlying: u8) -> Self {
        Self {
            pool: addr(base),
            model: addr(base + 1),
            quota_keeper: addr(base + 2),
            gauge: addr(base + 3),
            credit_manager: addr(base + 4),
            underlying: addr(underlying),
        }
    }
}

/// The USDC pool, registered first.
pub fn usdc_pool() -> PoolAddrs {
    PoolAddrs::new(0x40, USDC)
}

/// The WETH pool, registered second.
pub fn weth_pool() -> PoolAddrs {
    PoolAddrs::new(0x30, WETH)
}

/// A deployed protocol with two pools.
pub fn protocol() -> State {
    let mut s = State::default();
    let ap = addr(ADDRESS_PROVIDER);
    let key = |k: &str| Field::named("getAddressOrRevert", k);
    s.set(ap, key("ACL"), addr(ACL));
    s.set(ap, key("CONTRACTS_REGISTER"), addr(CONTRACTS_REGISTER));
    s.set(ap, key("PRICE_ORACLE"), addr(PRICE_ORACLE));
    s.set(ap, key("TREASURY"), addr(TREASURY));

    let acl = addr(ACL);
    s.set(acl, Field::plain("owner"), addr(OWNER));
    s.set(acl, Field::plain("pausableAdmins"), vec![addr(ADMIN)]);
    s.set(acl, Field::plain("unpausableAdmins"), vec![addr(OWNER)]);

    let pools = [usdc_pool(), weth_pool()];
    let cr = addr(CONTRACTS_REGISTER);
    s.set(cr, Field::plain("getPools"), pools.map(|p| p.pool).to_vec());
    s.set(
        cr,
        Field::plain("getCreditManagers"),
        pools.map(|p| p.credit_manager).to_vec(),
    );

    let po = addr(PRICE_ORACLE);
    let tokens = vec![addr(USDC), addr(WETH), addr(WBTC)];
    s.set(po, Field::plain("getTokens"), tokens.clone());
    for (ix, token) in tokens.into_iter().enumerate() {
        s.set(po, Field::at("priceFeeds", token), addr(0x20 + ix as u8));
        s.set(po, Field::at("stalenessPeriod", token), uint(86_400));
    }

    set_pool(&mut s, usdc_pool(), "dUSDC", 6, addr(WETH));
    set_pool(&mut s, weth_pool(), "dWETH", 18, addr(WBTC));
    s
}

fn set_pool(s: &mut State, p: PoolAddrs, symbol: &str, decimals: u64, quoted: Address) {
    let f = Field::plain;
    s.set(p.pool, f("symbol"), symbol);
    s.set(p.pool, f("name"), format!("Diesel {symbol}").as_str());
    s.set(p.pool, f("underlyingToken"), p.underlying);
    s.set(p.pool, f("decimals"), uint(decimals));
    s.set(p.pool, f("totalDebtLimit"), uint(1_000_000));
    s.set(p.pool, f("withdrawFee"), uint(0));
    s.set(p.pool, f("interestRateModel"), p.model);
    s.set(p.pool, f("poolQuotaKeeper"), p.quota_keeper);
    s.set(p.pool, f("creditManagers"), vec![p.credit_manager]);
    s.set(
        p.pool,
        Field::at("creditManagerDebtLimit", p.credit_manager),
        uint(500_000),
    );

    s.set(p.model, f("U_1"), uint(7_000));
    s.set(p.model, f("U_2"), uint(9_000));
    s.set(p.model, f("R_base"), uint(0));
    s.set(p.model, f("R_slope1"), uint(100));
    s.set(p.model, f("R_slope2"), uint(200));
    s.set(p.model, f("R_slope3"), uint(5_000));
    s.set(p.model, f("isBorrowingMoreU2Forbidden"), true);

    s.set(p.quota_keeper, f("gauge"), p.gauge);
    s.set(p.quota_keeper, f("quotedTokens"), vec![quoted]);
    s.set(p.quota_keeper, Field::at("limit", quoted), uint(100_000));
    s.set(p.quota_keeper, Field::at("quotaIncreaseFee", quoted), uint(10));

    s.set(p.gauge, f("quotedTokens"), vec![quoted]);
    s.set(p.gauge, Field::at("minRate", quoted), uint(10));
    s.set(p.gauge, Field::at("maxRate", quoted), uint(1_500));

    let name = format!("{symbol} credit manager");
    set_credit_manager(s, p, p.credit_manager, &name, quoted);
}

/// A credit manager of pool `p` with `quoted` as its only quoted collateral.
pub fn set_credit_manager(
    s: &mut State,
    p: PoolAddrs,
    cm: Address,
    name: &str,
    quoted: Address,
) {
    let f = Field::plain;
    s.set(cm, f("name"), name);
    s.set(cm, f("pool"), p.pool);
    s.set(cm, f("underlying"), p.underlying);
    s.set(cm, f("minDebt"), uint(1_000));
    s.set(cm, f("maxDebt"), uint(100_000));
    s.set(cm, f("feeInterest"), uint(2_500));
    s.set(cm, f("feeLiquidation"), uint(150));
    s.set(cm, f("liquidationPremium"), uint(400));
    s.set(cm, f("feeLiquidationExpired"), uint(100));
    s.set(cm, f("liquidationPremiumExpired"), uint(200));
    s.set(cm, f("collateralTokens"), vec![p.underlying, quoted]);
    s.set(cm, Field::at("liquidationThresholds", p.underlying), uint(9_450));
    s.set(cm, Field::at("liquidationThresholds", quoted), uint(8_500));
}
