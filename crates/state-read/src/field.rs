//! Identifiers for readable contract fields.

use configurator_types::Address;
use core::fmt;

/// A readable field on a contract, optionally keyed.
///
/// Keyed fields model mappings and parameterised getters such as a token's
/// quota parameters or a named entry in an address registry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Field {
    /// The getter name, e.g. `totalDebtLimit`.
    pub name: &'static str,
    /// The getter argument, if any.
    pub key: Option<FieldKey>,
}

/// The argument of a keyed [`Field`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    /// Keyed by address, e.g. a token or credit manager.
    Address(Address),
    /// Keyed by name, e.g. an address registry entry.
    Name(String),
}

impl Field {
    /// A field without a key.
    pub const fn plain(name: &'static str) -> Self {
        Self { name, key: None }
    }

    /// A field keyed by address.
    pub fn at(name: &'static str, key: Address) -> Self {
        Self {
            name,
            key: Some(FieldKey::Address(key)),
        }
    }

    /// A field keyed by name.
    pub fn named(name: &'static str, key: impl Into<String>) -> Self {
        Self {
            name,
            key: Some(FieldKey::Name(key.into())),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.key {
            None => write!(f, "{}()", self.name),
            Some(FieldKey::Address(addr)) => write!(f, "{}({addr})", self.name),
            Some(FieldKey::Name(name)) => write!(f, "{}(\"{name}\")", self.name),
        }
    }
}
