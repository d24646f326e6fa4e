//! The email address under investigation.
//!
//! A [`Subject`] can only be obtained through [`Subject::parse`], so every
//! value in circulation is known to contain the `@` separator.

use crate::error::{Result, SleuthError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the local part and the domain of an email address.
pub const SEPARATOR: char = '@';

/// Which form of the subject a lookup receives as its query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryInput {
    /// The full email address
    Full,
    /// Everything before the first `@`
    LocalPart,
}

impl QueryInput {
    /// Human-readable label used in reports.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Full => "email",
            Self::LocalPart => "username",
        }
    }
}

/// A validated email address with its derived local part.
///
/// Only serializable: deserializing would bypass [`Subject::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Subject {
    full: String,
    #[serde(skip)]
    separator_at: usize,
}

impl Subject {
    /// Validate a raw string and split it at the first `@`.
    ///
    /// The input is taken verbatim: no trimming, no case folding. An empty
    /// local part (`"@example.com"`) is accepted.
    ///
    /// # Errors
    /// Returns [`SleuthError::InvalidSubjectFormat`] if the input has no `@`.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let full = raw.into();
        let Some(separator_at) = full.find(SEPARATOR) else {
            return Err(SleuthError::InvalidSubjectFormat { input: full });
        };

        if separator_at == 0 {
            tracing::warn!(subject = %full, "subject has an empty local part");
        }

        Ok(Self { full, separator_at })
    }

    /// The complete address as given.
    #[must_use]
    pub fn full(&self) -> &str {
        &self.full
    }

    /// The substring strictly before the first `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        &self.full[..self.separator_at]
    }

    /// The substring after the first `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.full[self.separator_at + SEPARATOR.len_utf8()..]
    }

    /// Select the query string a lookup bound to `input` should receive.
    #[must_use]
    pub fn query(&self, input: QueryInput) -> &str {
        match input {
            QueryInput::Full => self.full(),
            QueryInput::LocalPart => self.local_part(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}
