use configurator_types::{Address, TrackedValue, U256};
use prop::test_runner::FileFailurePersistence;
use proptest::{prelude::*, test_runner::Config};

proptest! {
    #![proptest_config(Config::with_failure_persistence(FileFailurePersistence::WithSource("regressions")))]

    #[test]
    fn original_is_fixed_by_first_change(v1 in any::<u64>(), v2 in any::<u64>()) {
        prop_assume!(v1 != v2);
        let mut tracked = TrackedValue::attached(v1);
        tracked.set(v2);
        prop_assert!(tracked.is_modified());
        prop_assert_eq!(tracked.original(), Some(&v1));
        prop_assert_eq!(*tracked.get(), v2);

        // Restoring the baseline keeps the value marked as modified.
        tracked.set(v1);
        prop_assert!(tracked.is_modified());
        prop_assert_eq!(tracked.original(), Some(&v1));
        prop_assert_eq!(*tracked.get(), v1);
    }

    #[test]
    fn new_values_render_as_new(v in any::<u64>()) {
        let rendered = TrackedValue::new(v).render(None);
        prop_assert!(rendered.ends_with(" [new]"));
    }

    #[test]
    fn attached_values_render_plain(v in any::<u128>()) {
        prop_assert_eq!(TrackedValue::attached(v).render(None), v.to_string());
    }
}

#[test]
fn render_diff_with_decimals() {
    let mut fee = TrackedValue::attached(150u16);
    fee.set(225);
    assert_eq!(fee.render(Some(2)), "1.5 => 2.25");
    assert_eq!(fee.to_string(), "150 => 225");
}

#[test]
fn render_big_integers() {
    let mut limit = TrackedValue::from(U256::from(1_000_000_000_000u64));
    assert_eq!(limit.render(Some(6)), "1000000");
    limit.set(U256::from(2_500_000_000_000u64));
    assert_eq!(limit.render(Some(6)), "1000000 => 2500000");
}

#[test]
fn render_strings_and_bools() {
    let mut flag = TrackedValue::attached(false);
    flag.set(true);
    assert_eq!(flag.render(None), "false => true");

    let symbol = TrackedValue::new("dUSDC".to_string());
    assert_eq!(symbol.render(None), "dUSDC [new]");
}

#[test]
fn render_addresses_checksummed() {
    let addr = Address::repeat_byte(0xab);
    let tracked = TrackedValue::attached(addr);
    assert_eq!(tracked.render(None), addr.to_checksum(None));
}
