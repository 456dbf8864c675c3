//! # Tracked values
//!
//! A [`TrackedValue`] is the unit of configuration state. It holds the
//! current value of a parameter along with the value it was originally
//! observed with, so that proposed changes can be rendered as an audit trail.
//!
//! External code must only change the value through [`TrackedValue::set`].

use crate::fmt::Render;
use core::fmt;

/// A value that remembers whether it has been modified from its baseline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TrackedValue<T> {
    current: T,
    original: Option<T>,
    modified: bool,
}

impl<T> TrackedValue<T> {
    /// A brand new, not yet deployed parameter.
    ///
    /// The value is considered modified and has no baseline.
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            original: None,
            modified: true,
        }
    }

    /// The current value.
    pub fn get(&self) -> &T {
        &self.current
    }

    /// The value observed before the first modification.
    ///
    /// `None` for values constructed with [`TrackedValue::new`].
    pub fn original(&self) -> Option<&T> {
        self.original.as_ref()
    }

    /// Whether a write has ever changed this value, or it is new.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Consume the tracked value, returning the current value.
    pub fn into_inner(self) -> T {
        self.current
    }
}

impl<T: Clone> TrackedValue<T> {
    /// A value read from a live source. The baseline equals the value.
    pub fn attached(value: T) -> Self {
        Self {
            original: Some(value.clone()),
            current: value,
            modified: false,
        }
    }
}

impl<T: PartialEq> TrackedValue<T> {
    /// Write a new value.
    ///
    /// Writing the current value is a no-op. The first write that changes the
    /// value fixes the baseline; later writes never move it again, even when
    /// they restore the baseline.
    pub fn set(&mut self, value: T) {
        if value == self.current {
            return;
        }
        let previous = core::mem::replace(&mut self.current, value);
        if !self.modified {
            self.original = Some(previous);
            self.modified = true;
        }
    }
}

impl<T: Render> TrackedValue<T> {
    /// Render the value as a diff against its baseline.
    ///
    /// - unmodified: `"{current}"`
    /// - modified: `"{original} => {current}"`
    /// - new: `"{current} [new]"`
    pub fn render(&self, decimals: Option<u8>) -> String {
        let current = self.current.render(decimals);
        match (self.modified, &self.original) {
            (false, _) => current,
            (true, Some(original)) => format!("{} => {current}", original.render(decimals)),
            (true, None) => format!("{current} [new]"),
        }
    }
}

impl<T: Clone> From<T> for TrackedValue<T> {
    fn from(value: T) -> Self {
        Self::attached(value)
    }
}

impl<T: Render> fmt::Display for TrackedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}
