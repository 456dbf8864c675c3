use configurator_core::{
    error::AttachError,
    node::PriceFeedParams,
    state_read::{Field, ReadError},
    types::U256,
    ConfiguratorNode, Core, KeyNotFound,
};
use util::{
    addr, protocol, set_credit_manager, uint, usdc_pool, weth_pool, MissingField, State,
    ADDRESS_PROVIDER, WBTC, WETH,
};

pub mod util;

async fn attach(state: State) -> Core {
    Core::attach(addr(ADDRESS_PROVIDER), state).await.unwrap()
}

#[tokio::test]
async fn attach_preserves_register_order() {
    let core = attach(protocol()).await;
    let pools: Vec<_> = core.pools.iter().map(|p| p.address()).collect();
    assert_eq!(pools, vec![usdc_pool().pool, weth_pool().pool]);
    assert_eq!(core.pools[0].pool.symbol(), "dUSDC");
    assert_eq!(core.pools[1].pool.symbol(), "dWETH");
}

#[tokio::test]
async fn credit_managers_keep_pool_list_order() {
    let p = usdc_pool();
    // Listed after the first credit manager, but lower in address order.
    let second = addr(0x3f);
    let mut state = protocol();
    set_credit_manager(&mut state, p, second, "dUSDC second", addr(WETH));
    state.set(p.pool, Field::plain("creditManagers"), vec![p.credit_manager, second]);
    state.set(p.pool, Field::at("creditManagerDebtLimit", second), uint(100_000));

    let core = attach(state).await;
    let tree = core.pool(p.pool).unwrap();
    let cms: Vec<_> = tree.credit_managers.iter().map(|cm| cm.address()).collect();
    assert_eq!(cms, vec![p.credit_manager, second]);
    let listed: Vec<_> = tree.pool.credit_managers().collect();
    assert_eq!(listed, cms);
    assert_eq!(tree.pool.credit_manager_debt_limits_sum(), U256::from(600_000u64));

    let rendered = tree.to_string();
    let first = rendered.find("Credit manager dUSDC credit manager").unwrap();
    let second = rendered.find("Credit manager dUSDC second").unwrap();
    assert!(first < second, "{rendered}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn attach_on_multi_thread_runtime() {
    let _ = tracing_subscriber::fmt::try_init();
    let core = attach(protocol()).await;
    assert_eq!(core.pools.len(), 2);
    assert_eq!(core.pools[1].credit_managers.len(), 1);
}

#[tokio::test]
async fn attached_tree_is_unmodified_and_valid() {
    let core = attach(protocol()).await;
    assert!(!core.is_modified());
    assert!(core.is_deployed());
    let outcome = core.validate();
    assert!(outcome.is_empty(), "{outcome:?}");
}

#[tokio::test]
async fn attached_children_are_read_from_pool_references() {
    let core = attach(protocol()).await;
    let tree = core.pool(usdc_pool().pool).unwrap();
    assert_eq!(tree.interest_rate_model.address(), usdc_pool().model);
    assert_eq!(tree.quota_keeper.address(), usdc_pool().quota_keeper);
    assert_eq!(tree.gauge.address(), usdc_pool().gauge);
    assert_eq!(tree.credit_managers[0].address(), usdc_pool().credit_manager);
    assert_eq!(tree.interest_rate_model.params().u_2, 9_000);
}

#[tokio::test]
async fn any_failed_read_fails_the_whole_tree() {
    let mut state = protocol();
    let field = Field::plain("maxDebt");
    state.remove(weth_pool().credit_manager, &field);
    let err = Core::attach(addr(ADDRESS_PROVIDER), state).await.unwrap_err();
    match err {
        AttachError::Read(ReadError::Read(MissingField(contract, f))) => {
            assert_eq!(contract, weth_pool().credit_manager);
            assert_eq!(f, field);
        }
        err => panic!("unexpected error: {err}"),
    }
}

#[tokio::test]
async fn registry_read_failure_propagates() {
    let mut state = protocol();
    state.remove(
        addr(ADDRESS_PROVIDER),
        &Field::named("getAddressOrRevert", "PRICE_ORACLE"),
    );
    let err = Core::attach(addr(ADDRESS_PROVIDER), state).await.unwrap_err();
    assert!(matches!(err, AttachError::Read(ReadError::Read(_))));
}

#[tokio::test]
async fn mutations_render_as_diff() {
    let mut core = attach(protocol()).await;
    let tree = core.pool_mut(usdc_pool().pool).unwrap();
    tree.pool.set_total_debt_limit(U256::from(2_500_000u64));
    tree.quota_keeper
        .set_token_limit(addr(WETH), U256::from(200_000u64))
        .unwrap();
    assert!(core.is_modified());

    let rendered = core.to_string();
    // USDC has 6 decimals.
    assert!(rendered.contains("total debt limit: 1 => 2.5"), "{rendered}");
    assert!(rendered.contains("limit 100000 => 200000"), "{rendered}");
    // The WETH pool is untouched.
    assert!(!core.pools[1].is_modified());
}

#[tokio::test]
async fn restoring_a_value_keeps_it_modified() {
    let mut core = attach(protocol()).await;
    let pool = &mut core.pools[0].pool;
    pool.set_withdraw_fee(50);
    pool.set_withdraw_fee(0);
    assert!(pool.is_modified());
    assert!(core.to_string().contains("withdraw fee: 0 => 0"));
}

#[tokio::test]
async fn mutating_a_missing_key_fails() {
    let mut core = attach(protocol()).await;
    let tree = core.pool_mut(usdc_pool().pool).unwrap();
    let err = tree
        .quota_keeper
        .set_token_limit(addr(WBTC), U256::from(1u64))
        .unwrap_err();
    assert_eq!(err.collection, "quota keeper quotas");
    let err = core
        .price_oracle
        .set_price_feed(addr(0xee), PriceFeedParams::default())
        .unwrap_err();
    assert!(matches!(err, KeyNotFound { .. }));
    // Nothing else was touched.
    assert!(!core.is_modified());
}

#[tokio::test]
async fn validation_aggregates_in_declared_order() {
    let mut core = attach(protocol()).await;
    // A pool finding and a credit manager finding in the first pool, and an
    // ACL finding at the registry level.
    core.pools[0].pool.set_withdraw_fee(500);
    let (min_debt, _) = core.pools[0].credit_managers[0].debt_limits();
    core.pools[0].credit_managers[0].set_debt_limits(min_debt, U256::from(1u64));
    core.acl.set_owner(configurator_core::types::NOT_DEPLOYED);

    let outcome = core.validate();
    assert_eq!(outcome.errors.len(), 3, "{outcome:?}");
    assert!(outcome.errors[0].starts_with("acl:"));
    assert!(outcome.errors[1].starts_with("pool dUSDC:"));
    assert!(outcome.errors[2].starts_with("credit manager dUSDC credit manager:"));
}
