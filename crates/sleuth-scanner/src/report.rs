//! Grouping completed tasks into a report with a fixed presentation order.
//!
//! Presentation order is declared here and is unrelated to the order in which
//! tasks were registered or finished. Within a group, tasks keep their
//! registry order.

use crate::task::TaskReport;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sleuth_core::Subject;
use sleuth_lookups::{LookupOutcome, Source};
use std::fmt;
use uuid::Uuid;

/// Title of the section holding reports whose source no group declares.
pub const OTHER_SOURCES_TITLE: &str = "Other sources";

/// One titled group of sources in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportGroup {
    /// Section header
    pub title: String,
    /// Sources rendered under this header
    pub sources: Vec<Source>,
}

impl ReportGroup {
    /// Create a group.
    #[must_use]
    pub fn new(title: impl Into<String>, sources: impl Into<Vec<Source>>) -> Self {
        Self {
            title: title.into(),
            sources: sources.into(),
        }
    }
}

/// Orders task reports into sections.
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    groups: Vec<ReportGroup>,
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self::standard()
    }
}

impl ReportAggregator {
    /// Create an aggregator with explicit groups.
    #[must_use]
    pub fn new(groups: Vec<ReportGroup>) -> Self {
        Self { groups }
    }

    /// The standard presentation order.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            ReportGroup::new("EmailRep", [Source::EmailRep]),
            ReportGroup::new("Hunter", [Source::Hunter]),
            ReportGroup::new("Google Search", [Source::GoogleSearch]),
            ReportGroup::new(
                "Social Media",
                [Source::Instagram, Source::Spotify, Source::Twitter],
            ),
            ReportGroup::new("Pastebin dumps", [Source::Psbdmp]),
            ReportGroup::new("Intelligence X", [Source::Intelx]),
            ReportGroup::new("BreachDirectory", [Source::BreachDirectory]),
            ReportGroup::new("Have I Been Pwned", [Source::HaveIBeenPwned]),
            ReportGroup::new("IP geolocation", [Source::IpApi]),
            ReportGroup::new("DNS records", [Source::Dns]),
        ])
    }

    /// Build the report.
    ///
    /// `reports` must be in registry order. Every declared group yields
    /// exactly one section, even if no report belongs to it.
    #[must_use]
    pub fn aggregate(&self, run_id: Uuid, subject: &Subject, reports: Vec<TaskReport>) -> Report {
        let mut remaining: Vec<Option<TaskReport>> = reports.into_iter().map(Some).collect();

        let mut sections: Vec<Section> = self
            .groups
            .iter()
            .map(|group| Section {
                title: group.title.clone(),
                entries: take_matching(&mut remaining, |report| {
                    group.sources.contains(&report.slot.source)
                }),
            })
            .collect();

        let leftovers = take_matching(&mut remaining, |_| true);
        if !leftovers.is_empty() {
            tracing::debug!(count = leftovers.len(), "reports outside any declared group");
            sections.push(Section {
                title: OTHER_SOURCES_TITLE.to_string(),
                entries: leftovers,
            });
        }

        Report {
            run_id,
            subject: subject.clone(),
            generated_at: Utc::now(),
            sections,
        }
    }
}

/// Removes matching reports while keeping registry order.
fn take_matching(
    remaining: &mut [Option<TaskReport>],
    matches: impl Fn(&TaskReport) -> bool,
) -> Vec<TaskReport> {
    remaining
        .iter_mut()
        .filter(|slot| slot.as_ref().is_some_and(&matches))
        .filter_map(Option::take)
        .collect()
}

/// One group of the rendered report.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    /// Group title
    pub title: String,
    /// Reports in this group, in registry order
    pub entries: Vec<TaskReport>,
}

/// The aggregated result of one run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Run identifier
    pub run_id: Uuid,
    /// The investigated subject
    pub subject: Subject,
    /// When the report was aggregated
    pub generated_at: DateTime<Utc>,
    /// Sections in presentation order
    pub sections: Vec<Section>,
}

impl Report {
    /// Look up a section by title.
    #[must_use]
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Total number of task reports across all sections.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }
}

// Text rendering leaves out the run id and timings so that two runs with the
// same outcomes print identically.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Report for {}", self.subject)?;
        for section in &self.sections {
            writeln!(f)?;
            write!(f, "{section}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;

        if self.entries.is_empty() {
            return writeln!(f, "  no lookups ran");
        }

        let labelled = self.entries.len() > 1;
        for entry in &self.entries {
            let indent = if labelled {
                writeln!(
                    f,
                    "  -- {} ({}: {}) --",
                    entry.slot.source,
                    entry.slot.input.label(),
                    entry.query
                )?;
                "    "
            } else {
                "  "
            };
            write_outcome(f, &entry.outcome, indent)?;
        }
        Ok(())
    }
}

fn write_outcome(f: &mut fmt::Formatter<'_>, outcome: &LookupOutcome, indent: &str) -> fmt::Result {
    match outcome {
        LookupOutcome::Found { evidence } => {
            for item in evidence {
                writeln!(f, "{indent}{item}")?;
            }
            Ok(())
        }
        LookupOutcome::NotFound => writeln!(f, "{indent}nothing found"),
        LookupOutcome::Failed { reason } => writeln!(f, "{indent}lookup failed: {reason}"),
    }
}
