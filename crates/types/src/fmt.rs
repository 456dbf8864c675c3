//! Stringification of tracked values for human-readable diffs.

use crate::{Address, U256};
use std::collections::BTreeMap;

/// Render a value for a configuration diff.
///
/// Integers may be scaled by `decimals` into a fixed-point representation.
/// Non-numeric values ignore `decimals`.
pub trait Render {
    /// Render the value, optionally scaled by `decimals`.
    fn render(&self, decimals: Option<u8>) -> String;
}

/// Insert a decimal point `decimals` digits from the right of the given
/// decimal digit string, trimming trailing fractional zeros.
///
/// ```
/// use configurator_types::fixed_point;
/// assert_eq!(fixed_point("1500000", 6), "1.5");
/// assert_eq!(fixed_point("5", 2), "0.05");
/// assert_eq!(fixed_point("100", 2), "1");
/// ```
pub fn fixed_point(digits: &str, decimals: u8) -> String {
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits.to_string();
    }
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (int, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        int.to_string()
    } else {
        format!("{int}.{frac}")
    }
}

macro_rules! impl_render_integer {
    ($($ty:ty),*) => {
        $(
            impl Render for $ty {
                fn render(&self, decimals: Option<u8>) -> String {
                    let digits = self.to_string();
                    match decimals {
                        Some(d) => match digits.strip_prefix('-') {
                            Some(abs) => format!("-{}", fixed_point(abs, d)),
                            None => fixed_point(&digits, d),
                        },
                        None => digits,
                    }
                }
            }
        )*
    };
}

impl_render_integer!(u8, u16, u32, u64, u128, U256);
impl_render_integer!(i8, i16, i32, i64, i128);

impl Render for bool {
    fn render(&self, _decimals: Option<u8>) -> String {
        self.to_string()
    }
}

impl Render for String {
    fn render(&self, _decimals: Option<u8>) -> String {
        self.clone()
    }
}

impl Render for Address {
    fn render(&self, _decimals: Option<u8>) -> String {
        self.to_checksum(None)
    }
}

impl<T: Render> Render for Option<T> {
    fn render(&self, decimals: Option<u8>) -> String {
        match self {
            Some(t) => t.render(decimals),
            None => "none".to_string(),
        }
    }
}

impl<T: Render> Render for Vec<T> {
    fn render(&self, decimals: Option<u8>) -> String {
        let items: Vec<_> = self.iter().map(|t| t.render(decimals)).collect();
        format!("[{}]", items.join(", "))
    }
}

impl<K: Render, V: Render> Render for BTreeMap<K, V> {
    fn render(&self, decimals: Option<u8>) -> String {
        let entries: Vec<_> = self
            .iter()
            .map(|(k, v)| format!("{}: {}", k.render(None), v.render(decimals)))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }
}
