//! Sleuth Scanner - fan-out orchestration of email lookups.
//!
//! This crate runs every lookup of a run concurrently, waits for all of them
//! to finish regardless of individual failures, and then renders their
//! outcomes in a fixed presentation order that does not depend on which
//! lookup finished first.
//!
//! # Flow
//!
//! ```text
//! raw input → Subject::parse → TaskRegistry → FanOutScheduler (one barrier)
//!                                                   ↓
//!                               Report ← ReportAggregator (fixed group order)
//! ```
//!
//! # Features
//!
//! - Bounded parallelism with a configurable worker pool width
//! - Per-lookup timeout; errors, panics and timeouts stay inside their task
//! - Results returned through per-task join handles, in submission order
//! - Text and JSON rendering of the aggregated report
//!
//! # Example
//!
//! ```rust,ignore
//! use sleuth_core::AppConfig;
//! use sleuth_scanner::Investigator;
//!
//! let investigator = Investigator::from_config(&AppConfig::default())?;
//! let report = investigator.investigate("alice@example.com").await?;
//! println!("{report}");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod context;
pub mod error;
pub mod registry;
pub mod report;
pub mod runner;
pub mod scheduler;
pub mod task;

// Re-export commonly used types
pub use context::{Collaborators, RunContext};
pub use error::{Result, ScanError};
pub use registry::TaskRegistry;
pub use report::{Report, ReportAggregator, ReportGroup, Section};
pub use runner::Investigator;
pub use scheduler::FanOutScheduler;
pub use task::{LookupTask, TaskReport, TaskSlot};
