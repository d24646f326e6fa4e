//! One full investigation: validate, fan out, aggregate.

use crate::context::{Collaborators, RunContext};
use crate::error::Result;
use crate::report::{Report, ReportAggregator};
use crate::scheduler::FanOutScheduler;
use sleuth_core::{AppConfig, Subject};
use tracing::Instrument;

/// Runs investigations against a fixed set of collaborators.
///
/// The investigator itself holds no per-run state and can be reused for
/// any number of subjects.
#[derive(Clone)]
pub struct Investigator {
    collaborators: Collaborators,
    scheduler: FanOutScheduler,
    aggregator: ReportAggregator,
}

impl Investigator {
    /// Create an investigator with the standard presentation order.
    #[must_use]
    pub fn new(collaborators: Collaborators, scheduler: FanOutScheduler) -> Self {
        Self {
            collaborators,
            scheduler,
            aggregator: ReportAggregator::standard(),
        }
    }

    /// Build every collaborator and the scheduler from configuration.
    ///
    /// # Errors
    /// Returns error if the lookup clients cannot be set up.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            Collaborators::from_config(config)?,
            FanOutScheduler::from_config(&config.scanning),
        ))
    }

    /// Investigate one raw input.
    ///
    /// Input without an `@` is rejected before any lookup exists. Otherwise
    /// every lookup runs to completion and the report is returned, even when
    /// every lookup failed.
    ///
    /// # Errors
    /// Returns [`crate::ScanError::Subject`] if the input is not an address.
    pub async fn investigate(&self, raw: &str) -> Result<Report> {
        let subject = Subject::parse(raw)?;
        let context = RunContext::new(subject, &self.collaborators);
        self.run(context).await
    }

    /// Run an already prepared context.
    pub async fn run(&self, context: RunContext) -> Result<Report> {
        let span = tracing::info_span!("run", run_id = %context.run_id());

        async {
            tracing::info!(
                subject = %context.subject(),
                tasks = context.registry().len(),
                width = self.scheduler.width(),
                "starting investigation"
            );

            let reports = self.scheduler.run(context.registry()).await;
            let report = self
                .aggregator
                .aggregate(context.run_id(), context.subject(), reports);

            tracing::info!(sections = report.sections.len(), "investigation complete");
            Ok(report)
        }
        .instrument(span)
        .await
    }
}
