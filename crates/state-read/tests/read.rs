use configurator_state_read::{read, ChainRead, Field, ReadError, ReadValue};
use configurator_types::{Address, U256};
use std::{
    collections::BTreeMap,
    future::{self, Ready},
};
use thiserror::Error;

// A test `ChainRead` implementation represented using a map.
#[derive(Clone, Debug, Default)]
struct State(BTreeMap<(Address, Field), ReadValue>);

#[derive(Debug, Error)]
#[error("no value for {1} on {0}")]
struct MissingField(Address, Field);

impl ChainRead for State {
    type Error = MissingField;
    type Future = Ready<Result<ReadValue, Self::Error>>;
    fn read(&self, contract: Address, field: Field) -> Self::Future {
        let res = self
            .0
            .get(&(contract, field.clone()))
            .cloned()
            .ok_or(MissingField(contract, field));
        future::ready(res)
    }
}

fn contract() -> Address {
    Address::repeat_byte(1)
}

#[test]
fn read_typed_value() {
    let mut state = State::default();
    let token = Address::repeat_byte(2);
    state.0.insert(
        (contract(), Field::at("quotaLimit", token)),
        ReadValue::Uint(U256::from(500u64)),
    );
    let limit: U256 =
        futures::executor::block_on(read(&state, contract(), Field::at("quotaLimit", token)))
            .unwrap();
    assert_eq!(limit, U256::from(500u64));
}

#[test]
fn reader_failures_propagate_unchanged() {
    let state = State::default();
    let res: Result<bool, _> =
        futures::executor::block_on(read(&state, contract(), Field::plain("paused")));
    match res.unwrap_err() {
        ReadError::Read(MissingField(addr, field)) => {
            assert_eq!(addr, contract());
            assert_eq!(field, Field::plain("paused"));
        }
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn mismatched_kind_is_a_value_error() {
    let mut state = State::default();
    state
        .0
        .insert((contract(), Field::plain("symbol")), ReadValue::Bool(true));
    let res: Result<String, _> =
        futures::executor::block_on(read(&state, contract(), Field::plain("symbol")));
    assert!(matches!(res.unwrap_err(), ReadError::Value { .. }));
}

#[test]
fn field_display() {
    assert_eq!(Field::plain("owner").to_string(), "owner()");
    assert_eq!(
        Field::named("getAddressOrRevert", "ACL").to_string(),
        "getAddressOrRevert(\"ACL\")"
    );
}
