//! The capability every source client exposes to the scanner.

use crate::error::Result;
use crate::evidence::Evidence;
use crate::source::Source;
use async_trait::async_trait;

/// A single external inquiry.
///
/// Implementations hold no per-call mutable state, so one instance can serve
/// several concurrent lookups (e.g. a search for the full address and one for
/// its local part). An empty `Ok` means the source had nothing on the query.
#[async_trait]
pub trait Lookup: Send + Sync {
    /// Which source this client talks to.
    fn source(&self) -> Source;

    /// Query the source.
    ///
    /// # Errors
    /// Returns error if the source cannot be reached, refuses the query or
    /// answers with something unparseable.
    async fn lookup(&self, query: &str) -> Result<Vec<Evidence>>;
}
