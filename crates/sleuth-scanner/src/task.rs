//! Units of work and their completed reports.

use serde::Serialize;
use sleuth_core::{QueryInput, Subject};
use sleuth_lookups::{Lookup, LookupOutcome, Source};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Stable identity of a task: which source, fed which form of the subject.
///
/// Only used to place the task's outcome in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TaskSlot {
    /// Source the task queries
    pub source: Source,
    /// Form of the subject the task receives
    pub input: QueryInput,
}

/// One collaborator bound to one input.
///
/// The collaborator is shared with other tasks; the query is owned.
#[derive(Clone)]
pub struct LookupTask {
    slot: TaskSlot,
    lookup: Arc<dyn Lookup>,
    query: String,
}

impl LookupTask {
    /// Bind `lookup` to the `input` form of `subject`.
    #[must_use]
    pub fn new(lookup: Arc<dyn Lookup>, input: QueryInput, subject: &Subject) -> Self {
        Self {
            slot: TaskSlot {
                source: lookup.source(),
                input,
            },
            query: subject.query(input).to_string(),
            lookup,
        }
    }

    /// The task's identity.
    #[must_use]
    pub fn slot(&self) -> TaskSlot {
        self.slot
    }

    /// The exact string the collaborator will receive.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn lookup(&self) -> &dyn Lookup {
        self.lookup.as_ref()
    }
}

impl fmt::Debug for LookupTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupTask")
            .field("slot", &self.slot)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

/// A completed task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    /// Which task this is
    pub slot: TaskSlot,
    /// The string the collaborator received
    pub query: String,
    /// What happened
    pub outcome: LookupOutcome,
    /// Time spent running (not queued)
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_millis<S: serde::Serializer>(
    elapsed: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
