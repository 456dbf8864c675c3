//! Read-only access to on-chain configuration fields.
//!
//! Configuration nodes are attached to live contracts by reading their fields
//! through a [`ChainRead`] implementation. This crate does not talk to any
//! network itself. Implementations decide how reads are performed and what
//! their failures look like; failures are surfaced to callers unchanged.

#![deny(missing_docs, unsafe_code)]

use configurator_types::{Address, U256};
use core::{fmt, future::Future};
#[doc(inline)]
pub use error::{ReadError, ReadResult, UnexpectedValue};

pub mod error;
pub mod field;

#[doc(inline)]
pub use field::{Field, FieldKey};

/// Access to contract state required to attach configuration nodes.
pub trait ChainRead {
    /// An error type describing any cases that might occur during reading.
    type Error: fmt::Debug + fmt::Display;
    /// The future type returned from the [`ChainRead::read`] method.
    ///
    /// In-memory implementations may use `std::future::Ready`. Implementations
    /// calling `async` functions with anonymised return types will likely need
    /// to box the future in order to name it.
    type Future: Future<Output = Result<ReadValue, Self::Error>>;

    /// Read the current value of `field` on the contract at `contract`.
    fn read(&self, contract: Address, field: Field) -> Self::Future;
}

/// A raw field value as returned by a [`ChainRead`] implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadValue {
    /// A single address.
    Address(Address),
    /// A list of addresses.
    Addresses(Vec<Address>),
    /// An unsigned integer of up to 256 bits.
    Uint(U256),
    /// A boolean.
    Bool(bool),
    /// A string.
    String(String),
}

impl ReadValue {
    /// A short name for the kind of value, used in errors.
    pub fn kind(&self) -> &'static str {
        match self {
            ReadValue::Address(_) => "address",
            ReadValue::Addresses(_) => "address[]",
            ReadValue::Uint(_) => "uint",
            ReadValue::Bool(_) => "bool",
            ReadValue::String(_) => "string",
        }
    }
}

/// Read `field` on `contract` and convert the result into `T`.
///
/// Failures of the underlying reader are returned as [`ReadError::Read`]
/// without interpretation.
pub async fn read<S, T>(state: &S, contract: Address, field: Field) -> ReadResult<T, S::Error>
where
    S: ChainRead,
    T: TryFrom<ReadValue, Error = UnexpectedValue>,
{
    let value = state
        .read(contract, field.clone())
        .await
        .map_err(ReadError::Read)?;
    T::try_from(value).map_err(|source| ReadError::Value {
        contract,
        field,
        source,
    })
}

impl TryFrom<ReadValue> for Address {
    type Error = UnexpectedValue;
    fn try_from(value: ReadValue) -> Result<Self, Self::Error> {
        match value {
            ReadValue::Address(addr) => Ok(addr),
            other => Err(UnexpectedValue::new("address", &other)),
        }
    }
}

impl TryFrom<ReadValue> for Vec<Address> {
    type Error = UnexpectedValue;
    fn try_from(value: ReadValue) -> Result<Self, Self::Error> {
        match value {
            ReadValue::Addresses(addrs) => Ok(addrs),
            other => Err(UnexpectedValue::new("address[]", &other)),
        }
    }
}

impl TryFrom<ReadValue> for bool {
    type Error = UnexpectedValue;
    fn try_from(value: ReadValue) -> Result<Self, Self::Error> {
        match value {
            ReadValue::Bool(b) => Ok(b),
            other => Err(UnexpectedValue::new("bool", &other)),
        }
    }
}

impl TryFrom<ReadValue> for String {
    type Error = UnexpectedValue;
    fn try_from(value: ReadValue) -> Result<Self, Self::Error> {
        match value {
            ReadValue::String(s) => Ok(s),
            other => Err(UnexpectedValue::new("string", &other)),
        }
    }
}

impl TryFrom<ReadValue> for U256 {
    type Error = UnexpectedValue;
    fn try_from(value: ReadValue) -> Result<Self, Self::Error> {
        match value {
            ReadValue::Uint(u) => Ok(u),
            other => Err(UnexpectedValue::new("uint", &other)),
        }
    }
}

macro_rules! impl_try_from_uint {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<ReadValue> for $ty {
                type Error = UnexpectedValue;
                fn try_from(value: ReadValue) -> Result<Self, Self::Error> {
                    let uint = U256::try_from(value)?;
                    <$ty>::try_from(uint).map_err(|_| UnexpectedValue {
                        expected: stringify!($ty),
                        found: uint.to_string(),
                    })
                }
            }
        )*
    };
}

impl_try_from_uint!(u8, u16, u32, u64, u128);

impl From<Address> for ReadValue {
    fn from(addr: Address) -> Self {
        ReadValue::Address(addr)
    }
}

impl From<Vec<Address>> for ReadValue {
    fn from(addrs: Vec<Address>) -> Self {
        ReadValue::Addresses(addrs)
    }
}

impl From<U256> for ReadValue {
    fn from(u: U256) -> Self {
        ReadValue::Uint(u)
    }
}

impl From<u64> for ReadValue {
    fn from(u: u64) -> Self {
        ReadValue::Uint(U256::from(u))
    }
}

impl From<bool> for ReadValue {
    fn from(b: bool) -> Self {
        ReadValue::Bool(b)
    }
}

impl From<&str> for ReadValue {
    fn from(s: &str) -> Self {
        ReadValue::String(s.to_string())
    }
}

impl fmt::Display for ReadValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReadValue::Address(addr) => write!(f, "{addr}"),
            ReadValue::Addresses(addrs) => {
                let addrs: Vec<_> = addrs.iter().map(|a| a.to_string()).collect();
                write!(f, "[{}]", addrs.join(", "))
            }
            ReadValue::Uint(u) => write!(f, "{u}"),
            ReadValue::Bool(b) => write!(f, "{b}"),
            ReadValue::String(s) => f.write_str(s),
        }
    }
}
