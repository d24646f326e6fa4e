//! The fixed list of tasks for a run.

use crate::context::Collaborators;
use crate::task::LookupTask;
use sleuth_core::{QueryInput, Subject};
use sleuth_lookups::Lookup;
use std::sync::Arc;

/// Ordered, immutable list of tasks.
///
/// Declaration order is also the sub-order used when several tasks render
/// under one report group.
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    tasks: Vec<LookupTask>,
}

impl TaskRegistry {
    /// Create a registry from an explicit task list.
    #[must_use]
    pub fn new(tasks: Vec<LookupTask>) -> Self {
        Self { tasks }
    }

    /// The standard thirteen tasks.
    ///
    /// Web search is bound twice: once to the address and once to its local
    /// part. Every other source receives the full address.
    #[must_use]
    pub fn standard(subject: &Subject, collaborators: &Collaborators) -> Self {
        let bind = |lookup: &Arc<dyn Lookup>, input: QueryInput| {
            LookupTask::new(Arc::clone(lookup), input, subject)
        };
        let c = collaborators;

        let registry = Self::new(vec![
            bind(&c.dns, QueryInput::Full),
            bind(&c.google_search, QueryInput::Full),
            bind(&c.google_search, QueryInput::LocalPart),
            bind(&c.breach_directory, QueryInput::Full),
            bind(&c.haveibeenpwned, QueryInput::Full),
            bind(&c.emailrep, QueryInput::Full),
            bind(&c.hunter, QueryInput::Full),
            bind(&c.intelx, QueryInput::Full),
            bind(&c.ip_api, QueryInput::Full),
            bind(&c.psbdmp, QueryInput::Full),
            bind(&c.instagram, QueryInput::Full),
            bind(&c.spotify, QueryInput::Full),
            bind(&c.twitter, QueryInput::Full),
        ]);

        tracing::debug!(tasks = registry.len(), "built task registry");
        registry
    }

    /// The tasks, in declaration order.
    #[must_use]
    pub fn tasks(&self) -> &[LookupTask] {
        &self.tasks
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the registry has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RunContext;
    use async_trait::async_trait;
    use sleuth_lookups::{Evidence, Result, Source};

    struct Stub(Source);

    #[async_trait]
    impl Lookup for Stub {
        fn source(&self) -> Source {
            self.0
        }

        async fn lookup(&self, _query: &str) -> Result<Vec<Evidence>> {
            Ok(Vec::new())
        }
    }

    fn stub(source: Source) -> Arc<dyn Lookup> {
        Arc::new(Stub(source))
    }

    fn collaborators() -> Collaborators {
        Collaborators {
            dns: stub(Source::Dns),
            google_search: stub(Source::GoogleSearch),
            breach_directory: stub(Source::BreachDirectory),
            haveibeenpwned: stub(Source::HaveIBeenPwned),
            emailrep: stub(Source::EmailRep),
            hunter: stub(Source::Hunter),
            intelx: stub(Source::Intelx),
            ip_api: stub(Source::IpApi),
            psbdmp: stub(Source::Psbdmp),
            instagram: stub(Source::Instagram),
            spotify: stub(Source::Spotify),
            twitter: stub(Source::Twitter),
        }
    }

    #[test]
    fn test_standard_order() {
        let subject = Subject::parse("alice@example.com").expect("valid subject");
        let registry = TaskRegistry::standard(&subject, &collaborators());

        let sources: Vec<_> = registry.tasks().iter().map(|t| t.slot().source).collect();
        assert_eq!(
            sources,
            vec![
                Source::Dns,
                Source::GoogleSearch,
                Source::GoogleSearch,
                Source::BreachDirectory,
                Source::HaveIBeenPwned,
                Source::EmailRep,
                Source::Hunter,
                Source::Intelx,
                Source::IpApi,
                Source::Psbdmp,
                Source::Instagram,
                Source::Spotify,
                Source::Twitter,
            ]
        );
        assert_eq!(registry.len(), 13);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_search_bound_twice() {
        let subject = Subject::parse("alice@example.com").expect("valid subject");
        let registry = TaskRegistry::standard(&subject, &collaborators());

        let search: Vec<_> = registry
            .tasks()
            .iter()
            .filter(|t| t.slot().source == Source::GoogleSearch)
            .map(|t| (t.slot().input, t.query()))
            .collect();
        assert_eq!(
            search,
            vec![
                (QueryInput::Full, "alice@example.com"),
                (QueryInput::LocalPart, "alice"),
            ]
        );

        assert!(registry
            .tasks()
            .iter()
            .filter(|t| t.slot().source != Source::GoogleSearch)
            .all(|t| t.query() == "alice@example.com"));
    }

    #[test]
    fn test_fresh_context_per_run() {
        let collaborators = collaborators();
        let first = RunContext::new(
            Subject::parse("alice@example.com").expect("valid subject"),
            &collaborators,
        );
        let second = RunContext::new(
            Subject::parse("bob@example.com").expect("valid subject"),
            &collaborators,
        );

        assert_ne!(first.run_id(), second.run_id());
        assert_eq!(first.registry().tasks()[2].query(), "alice");
        assert_eq!(second.registry().tasks()[2].query(), "bob");
    }
}
