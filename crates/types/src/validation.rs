//! Validation findings returned by configuration nodes.

use serde::{Deserialize, Serialize};

/// Findings produced by validating a configuration node or tree.
///
/// Findings are data, not errors. A caller decides whether to proceed when
/// `errors` is non-empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Findings that should block the proposed change.
    pub errors: Vec<String>,
    /// Findings that deserve attention but do not block.
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    /// No findings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether there are no errors. Warnings are allowed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether there are neither errors nor warnings.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Record an error.
    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Record a warning.
    pub fn warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Append the findings of `other` after our own.
    pub fn append(&mut self, other: ValidationOutcome) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl Extend<ValidationOutcome> for ValidationOutcome {
    fn extend<I: IntoIterator<Item = ValidationOutcome>>(&mut self, iter: I) {
        for outcome in iter {
            self.append(outcome);
        }
    }
}

impl FromIterator<ValidationOutcome> for ValidationOutcome {
    fn from_iter<I: IntoIterator<Item = ValidationOutcome>>(iter: I) -> Self {
        let mut outcome = ValidationOutcome::new();
        outcome.extend(iter);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut own = ValidationOutcome::new();
        own.error("own");
        let mut child = ValidationOutcome::new();
        child.error("child");
        child.warning("careful");
        own.append(child);
        assert_eq!(own.errors, ["own", "child"]);
        assert_eq!(own.warnings, ["careful"]);
        assert!(!own.is_ok());
    }
}
