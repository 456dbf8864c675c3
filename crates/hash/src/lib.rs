//! A minimal crate containing the batch [`checksum`] function and the
//! associated pre-hash canonical serialization [`serialize`].
//!
//! The canonical form is shared with external multisig tooling. Any other
//! serialization of the same data will almost certainly produce a different
//! checksum.

#![deny(missing_docs)]
#![deny(unsafe_code)]

use alloy_primitives::{b256, keccak256, B256};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

/// The Keccak-256 digest of empty input.
///
/// A digest equal to this is treated as "no output".
pub const KECCAK256_EMPTY: B256 =
    b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

/// Canonically serialize a JSON value.
///
/// - Arrays: `[` + comma-joined canonical elements + `]`.
/// - Objects: `{` + the JSON array of sorted keys, followed by
///   `canonical(value) + ","` for each key in sorted order, + `}`.
/// - Everything else: standard JSON text.
///
/// Keys are sorted by UTF-16 code units so that output matches JavaScript's
/// default `Array.prototype.sort`.
pub fn serialize(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(&mut out, value);
    out
}

/// Convert `t` to a JSON value, then canonically [`serialize`] it.
///
/// Fields skipped during serialization are absent from the result. `None`
/// fields that are not skipped appear as `null`.
pub fn serialize_value<T: Serialize>(t: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(t)?;
    Ok(serialize(&value))
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Array(elems) => {
            out.push('[');
            for (ix, elem) in elems.iter().enumerate() {
                if ix > 0 {
                    out.push(',');
                }
                write_canonical(out, elem);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));
            let key_list = Value::Array(keys.iter().map(|k| Value::String((*k).clone())).collect());
            out.push('{');
            // Writing into a `String` cannot fail.
            let _ = write!(out, "{key_list}");
            for key in keys {
                write_canonical(out, &map[key.as_str()]);
                out.push(',');
            }
            out.push('}');
        }
        scalar => {
            let _ = write!(out, "{scalar}");
        }
    }
}

/// Hash a canonical string using Keccak-256.
pub fn hash(canonical: &str) -> B256 {
    keccak256(canonical.as_bytes())
}

/// Produce the `0x`-prefixed Keccak-256 checksum of a canonical string.
///
/// Returns `None` if hashing yields no output, i.e. the digest of empty input.
pub fn checksum(canonical: &str) -> Option<String> {
    let digest = hash(canonical);
    if digest == KECCAK256_EMPTY {
        return None;
    }
    Some(format!("0x{}", hex::encode(digest)))
}

/// Shorthand for canonically serializing `t` then producing its [`checksum`].
pub fn checksum_value<T: Serialize>(t: &T) -> Result<Option<String>, serde_json::Error> {
    let canonical = serialize_value(t)?;
    Ok(checksum(&canonical))
}
