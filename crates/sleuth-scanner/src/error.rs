//! Errors that end a run before any lookup result exists.

use sleuth_core::SleuthError;
use sleuth_lookups::LookupError;
use thiserror::Error;

/// Why an investigation could not produce a report.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The raw input was rejected before any task was built
    #[error(transparent)]
    Subject(#[from] SleuthError),

    /// A lookup client could not be constructed
    #[error("failed to set up lookup clients: {0}")]
    Setup(#[from] LookupError),
}

impl ScanError {
    /// Whether the run was refused because the input is not an email address.
    #[must_use]
    pub fn is_invalid_subject(&self) -> bool {
        matches!(
            self,
            Self::Subject(SleuthError::InvalidSubjectFormat { .. })
        )
    }
}

/// Result type alias using `ScanError`.
pub type Result<T> = std::result::Result<T, ScanError>;
