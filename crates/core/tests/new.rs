use configurator_core::{
    node::{CreditManager, LinearModel, LinearModelParams, QuotaRates},
    types::{Address, NOT_DEPLOYED, U256},
    ConfiguratorNode, Core, CoreDeployConfig, Deployable, PoolTree, PoolTreeDeployConfig,
};

fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

fn deploy_yaml() -> String {
    let usdc = addr(0x10);
    let weth = addr(0x11);
    format!(
        r#"
address_provider:
  entries:
    ACL: "{acl}"
    CONTRACTS_REGISTER: "{cr}"
    PRICE_ORACLE: "{po}"
acl:
  owner: "{owner}"
  pausable_admins: ["{owner}"]
  unpausable_admins: ["{owner}"]
price_oracle:
  feeds:
    "{usdc}": {{ feed: "{feed1}", staleness_period: 86400 }}
    "{weth}": {{ feed: "{feed2}", staleness_period: 3600 }}
pools:
  - pool:
      symbol: dUSDC
      name: Diesel USDC
      underlying: "{usdc}"
      decimals: 6
      total_debt_limit: "0xf4240"
    interest_rate_model:
      u_1: 7000
      u_2: 9000
      r_base: 0
      r_slope1: 100
      r_slope2: 200
      r_slope3: 5000
      is_borrowing_more_u2_forbidden: true
    quota_keeper:
      quotas:
        "{weth}": {{ limit: "0x186a0", increase_fee: 10 }}
    gauge:
      rates:
        "{weth}": {{ min_rate: 10, max_rate: 1500 }}
    credit_managers:
      - name: USDC trade
        debt_limit: "0x7a120"
        min_debt: "0x3e8"
        max_debt: "0x186a0"
        fee_interest: 2500
        fee_liquidation: 150
        liquidation_premium: 400
        fee_liquidation_expired: 100
        liquidation_premium_expired: 200
        collateral_tokens:
          "{usdc}": 9450
          "{weth}": 8500
"#,
        acl = addr(0x02),
        cr = addr(0x03),
        po = addr(0x04),
        owner = addr(0x06),
        feed1 = addr(0x20),
        feed2 = addr(0x21),
    )
}

fn config() -> CoreDeployConfig {
    serde_yaml::from_str(&deploy_yaml()).unwrap()
}

#[test]
fn new_tree_is_undeployed_and_modified() {
    let core = Core::new(config());
    assert!(!core.is_deployed());
    assert!(core.is_modified());
    let tree = &core.pools[0];
    assert_eq!(tree.address(), NOT_DEPLOYED);
    assert_eq!(tree.credit_managers[0].underlying(), addr(0x10));
    assert_eq!(tree.pool.total_debt_limit(), U256::from(1_000_000u64));
}

#[test]
fn new_tree_is_valid() {
    let outcome = Core::new(config()).validate();
    assert!(outcome.is_ok(), "{outcome:?}");
}

#[test]
fn new_tree_renders_new_values() {
    let rendered = Core::new(config()).to_string();
    assert!(rendered.contains("Pool dUSDC (Diesel USDC) [new]"), "{rendered}");
    assert!(rendered.contains("  total debt limit: 1 [new]"), "{rendered}");
    assert!(rendered.contains("    U_2: 90 [new]"), "{rendered}");
    assert!(rendered.contains("Credit manager USDC trade [new]"), "{rendered}");
    assert!(rendered.contains("    #0: 0.5 [new]"), "{rendered}");
}

#[test]
fn new_credit_managers_have_debt_limits() {
    let mut config = config().pools.remove(0);
    let mut second = config.credit_managers[0].clone();
    second.name = "USDC farm".to_string();
    second.debt_limit = U256::from(300_000u64);
    config.credit_managers.push(second);

    let mut tree = PoolTree::new(config.clone());
    let limits: Vec<_> = tree
        .pool
        .credit_manager_debt_limits()
        .iter()
        .map(|entry| (entry.credit_manager, *entry.limit.get()))
        .collect();
    assert_eq!(
        limits,
        [
            (NOT_DEPLOYED, U256::from(500_000u64)),
            (NOT_DEPLOYED, U256::from(300_000u64))
        ]
    );
    assert_eq!(tree.pool.credit_manager_debt_limits_sum(), U256::from(800_000u64));
    assert!(tree.validate().is_ok());

    let mut third = config.credit_managers[0].clone();
    third.name = "USDC leverage".to_string();
    third.debt_limit = U256::from(400_000u64);
    assert_eq!(tree.add_credit_manager(third), 2);
    assert_eq!(tree.credit_managers.len(), 3);
    let outcome = tree.validate();
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w.contains("credit manager debt limits exceed the total debt limit")));

    tree.pool.set_credit_manager_debt_limit(2, U256::from(100_000u64)).unwrap();
    assert!(tree.pool.set_credit_manager_debt_limit(3, U256::ZERO).is_err());
    assert!(!tree
        .validate()
        .warnings
        .iter()
        .any(|w| w.contains("exceed the total debt limit")));

    let rendered = tree.render_deploy_config().unwrap();
    let parsed: PoolTreeDeployConfig = serde_yaml::from_str(&rendered).unwrap();
    let limits: Vec<_> = parsed.credit_managers.iter().map(|cm| cm.debt_limit).collect();
    assert_eq!(limits, [500_000u64, 300_000, 100_000].map(U256::from));
}

#[test]
fn pool_appends_every_undeployed_credit_manager() {
    let mut pool = PoolTree::new(config().pools.remove(0)).pool;
    assert_eq!(pool.add_credit_manager(NOT_DEPLOYED, U256::from(1u64)), 1);
    assert_eq!(pool.add_credit_manager(NOT_DEPLOYED, U256::from(2u64)), 2);
    assert_eq!(pool.add_credit_manager(addr(0x50), U256::from(3u64)), 3);
    // A deployed credit manager is updated in place.
    assert_eq!(pool.add_credit_manager(addr(0x50), U256::from(4u64)), 3);
    assert_eq!(pool.credit_manager_debt_limits().len(), 4);
    assert_eq!(*pool.credit_manager_debt_limits()[3].limit.get(), U256::from(4u64));
}

#[test]
fn deploy_config_round_trip() {
    let core = Core::new(config());
    let yaml = core.render_deploy_config().unwrap();
    let parsed: CoreDeployConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, config());
    assert_eq!(Core::new(parsed), core);
}

#[test]
fn deploy_config_reflects_mutations() {
    let mut tree = PoolTree::new(config().pools.remove(0));
    tree.interest_rate_model.set_params(LinearModelParams {
        u_1: 8_000,
        ..tree.interest_rate_model.params()
    });
    let rendered = tree.render_deploy_config().unwrap();
    let parsed: PoolTreeDeployConfig = serde_yaml::from_str(&rendered).unwrap();
    assert_eq!(parsed.interest_rate_model.u_1, 8_000);
}

#[test]
fn linear_model_rules() {
    let model = LinearModel::new(LinearModelParams {
        u_1: 9_500,
        u_2: 9_000,
        r_base: 0,
        r_slope1: 300,
        r_slope2: 200,
        r_slope3: 100,
        is_borrowing_more_u2_forbidden: false,
    });
    let outcome = model.validate();
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.warnings.len(), 1);
}

#[test]
fn pool_tree_cross_child_rules() {
    let mut tree = PoolTree::new(config().pools.remove(0));
    let wbtc = addr(0x12);
    tree.quota_keeper.add_quota_token(wbtc, Default::default());
    tree.gauge
        .set_rates(addr(0x11), QuotaRates { min_rate: 2_000, max_rate: 1_000 })
        .unwrap();
    let outcome = tree.validate();
    // Own findings come first: the new quoted token has no gauge rates.
    assert!(outcome.errors[0].contains("has no gauge rates"), "{outcome:?}");
    assert!(outcome.errors[1].starts_with("gauge:"), "{outcome:?}");
    // The zero quota limit is a quota keeper warning.
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w.starts_with("quota keeper:")));
}

#[test]
fn credit_manager_lt_above_underlying() {
    let mut config = config().pools.remove(0).credit_managers.remove(0);
    config.collateral_tokens.insert(addr(0x11), 9_600);
    let cm = CreditManager::new(config, addr(0x10), 6);
    let outcome = cm.validate();
    assert_eq!(outcome.errors.len(), 1, "{outcome:?}");
    assert!(outcome.errors[0].contains("exceeds that of the underlying"));
}
