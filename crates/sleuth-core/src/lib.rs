//! Sleuth Core - Foundation crate for the Sleuth email investigation tool.
//!
//! This crate provides the validated [`Subject`] type, error handling and
//! configuration management that the other Sleuth crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`subject`] - The email address under investigation and its derived parts
//!
//! # Example
//!
//! ```rust
//! use sleuth_core::Subject;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let subject = Subject::parse("alice@example.com")?;
//! assert_eq!(subject.local_part(), "alice");
//! assert_eq!(subject.domain(), "example.com");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod subject;

// Re-export commonly used types
pub use config::{ApiKeysConfig, AppConfig, ScanningConfig};
pub use error::{ConfigError, ConfigResult, Result, SleuthError};
pub use subject::{QueryInput, Subject, SEPARATOR};
