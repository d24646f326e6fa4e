//! What a lookup found, and the tagged outcome of running one.

use crate::error::LookupError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One labelled fact reported by a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Short label, e.g. `"MX"` or `"breach"`
    pub label: String,
    /// The reported value
    pub value: String,
}

impl Evidence {
    /// Create a new piece of evidence.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// Terminal state of one lookup task.
///
/// There is no separate "failed" terminal state: a failure is a completed
/// task carrying its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    /// The source reported something
    Found {
        /// Everything the source reported
        evidence: Vec<Evidence>,
    },
    /// The source answered and had nothing on the query
    NotFound,
    /// The lookup could not be completed
    Failed {
        /// Why it failed
        reason: String,
    },
}

impl LookupOutcome {
    /// Create a failed outcome.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Whether the source reported anything.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Whether the lookup failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl From<Result<Vec<Evidence>, LookupError>> for LookupOutcome {
    fn from(result: Result<Vec<Evidence>, LookupError>) -> Self {
        match result {
            Ok(evidence) if evidence.is_empty() => Self::NotFound,
            Ok(evidence) => Self::Found { evidence },
            Err(e) => Self::failed(e.to_string()),
        }
    }
}
