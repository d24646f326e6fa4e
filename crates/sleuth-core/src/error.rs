//! Core error types for Sleuth.
//!
//! Only one error is allowed to cross from input handling to the top level of
//! a run: [`SleuthError::InvalidSubjectFormat`]. Lookup failures never appear
//! here; they are recorded on the owning task's outcome instead.

use thiserror::Error;

/// Error raised while turning raw input into a subject.
#[derive(Error, Debug)]
pub enum SleuthError {
    /// The subject has no `@` separator, so no lookup can be bound to it
    #[error("invalid email format: '{input}' has no '@' separator")]
    InvalidSubjectFormat {
        /// The rejected raw input
        input: String,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Explicitly requested config file does not exist
    #[error("config file not found at {path}")]
    NotFound {
        /// Path where config was expected
        path: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `SleuthError`.
pub type Result<T> = std::result::Result<T, SleuthError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SleuthError::InvalidSubjectFormat {
            input: "noatsign".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid email format: 'noatsign' has no '@' separator"
        );

        let err = ConfigError::NoConfigDir;
        assert_eq!(
            err.to_string(),
            "could not determine config directory (XDG base directories not available)"
        );
    }

    #[test]
    fn test_config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let config_err: ConfigError = io_err.into();
        assert!(matches!(config_err, ConfigError::Io(_)));
        assert_eq!(config_err.to_string(), "I/O error: denied");
    }
}
