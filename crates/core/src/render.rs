//! Helpers for the audit trail renderings of nodes.

use configurator_types::{Render, TrackedValue};
use core::fmt;
use std::collections::BTreeMap;

const INDENT: &str = "  ";

/// Write a labeled tracked value on its own line.
pub(crate) fn field<T: Render>(
    f: &mut fmt::Formatter,
    label: &str,
    value: &TrackedValue<T>,
    decimals: Option<u8>,
) -> fmt::Result {
    writeln!(f, "{INDENT}{label}: {}", value.render(decimals))
}

/// Write a labeled collection of tracked values, one entry per line.
pub(crate) fn entries<K: Render, T: Render>(
    f: &mut fmt::Formatter,
    label: &str,
    map: &BTreeMap<K, TrackedValue<T>>,
    decimals: Option<u8>,
) -> fmt::Result {
    if map.is_empty() {
        return writeln!(f, "{INDENT}{label}: none");
    }
    writeln!(f, "{INDENT}{label}:")?;
    for (key, value) in map {
        writeln!(f, "{INDENT}{INDENT}{}: {}", key.render(None), value.render(decimals))?;
    }
    Ok(())
}

/// Write a child node's rendering indented one level.
pub(crate) fn child(f: &mut fmt::Formatter, child: &impl fmt::Display) -> fmt::Result {
    for line in child.to_string().lines() {
        writeln!(f, "{INDENT}{line}")?;
    }
    Ok(())
}

/// Whether any value in a collection is modified.
pub(crate) fn any_modified<K, T>(map: &BTreeMap<K, TrackedValue<T>>) -> bool {
    map.values().any(TrackedValue::is_modified)
}

/// Write a node's header line.
pub(crate) fn header(
    f: &mut fmt::Formatter,
    label: &str,
    address: configurator_types::Address,
) -> fmt::Result {
    if address == configurator_types::NOT_DEPLOYED {
        writeln!(f, "{label} [new]")
    } else {
        writeln!(f, "{label} {}", address.to_checksum(None))
    }
}
