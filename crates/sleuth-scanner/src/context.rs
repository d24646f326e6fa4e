//! Per-run state and the collaborators it draws on.

use crate::error::Result;
use crate::registry::TaskRegistry;
use sleuth_core::{AppConfig, Subject};
use sleuth_lookups::http::{build_client, HttpSettings};
use sleuth_lookups::{
    BreachDirectoryLookup, DnsLookup, EmailRepLookup, GoogleSearchLookup, HaveIBeenPwnedLookup,
    HunterLookup, InstagramLookup, IntelxLookup, IpApiLookup, Lookup, PsbdmpLookup, SpotifyLookup,
    TwitterLookup,
};
use std::sync::Arc;
use uuid::Uuid;

/// One shared client per source.
///
/// Clients are read-only and may serve several tasks at once.
#[derive(Clone)]
pub struct Collaborators {
    /// DNS records of the subject's domain
    pub dns: Arc<dyn Lookup>,
    /// Web search, bound twice (address and local part)
    pub google_search: Arc<dyn Lookup>,
    /// `BreachDirectory` breach sources
    pub breach_directory: Arc<dyn Lookup>,
    /// Have I Been Pwned breaches
    pub haveibeenpwned: Arc<dyn Lookup>,
    /// `EmailRep` reputation
    pub emailrep: Arc<dyn Lookup>,
    /// Hunter domain search
    pub hunter: Arc<dyn Lookup>,
    /// Intelligence X records
    pub intelx: Arc<dyn Lookup>,
    /// IP-API geolocation
    pub ip_api: Arc<dyn Lookup>,
    /// Psbdmp paste dumps
    pub psbdmp: Arc<dyn Lookup>,
    /// Instagram presence
    pub instagram: Arc<dyn Lookup>,
    /// Spotify presence
    pub spotify: Arc<dyn Lookup>,
    /// Twitter presence
    pub twitter: Arc<dyn Lookup>,
}

impl Collaborators {
    /// Build every client from configuration, sharing one HTTP client.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = build_client(&HttpSettings::from(&config.scanning))?;
        let keys = &config.api_keys;

        Ok(Self {
            dns: Arc::new(DnsLookup::new()),
            google_search: Arc::new(GoogleSearchLookup::new(
                client.clone(),
                config.scanning.max_search_results,
            )),
            breach_directory: Arc::new(BreachDirectoryLookup::new(
                client.clone(),
                keys.breachdirectory.clone(),
            )),
            haveibeenpwned: Arc::new(HaveIBeenPwnedLookup::new(
                client.clone(),
                keys.haveibeenpwned.clone(),
            )),
            emailrep: Arc::new(EmailRepLookup::new(client.clone(), keys.emailrep.clone())),
            hunter: Arc::new(HunterLookup::new(client.clone(), keys.hunter.clone())),
            intelx: Arc::new(IntelxLookup::new(client.clone(), keys.intelx.clone())),
            ip_api: Arc::new(IpApiLookup::new(client.clone())),
            psbdmp: Arc::new(PsbdmpLookup::new(client.clone())),
            instagram: Arc::new(InstagramLookup::new(client.clone())),
            spotify: Arc::new(SpotifyLookup::new(client.clone())),
            twitter: Arc::new(TwitterLookup::new(client)),
        })
    }
}

/// Everything one investigation needs, from validation to report.
///
/// Built fresh for each subject; nothing carries over between runs.
#[derive(Debug)]
pub struct RunContext {
    run_id: Uuid,
    subject: Subject,
    registry: TaskRegistry,
}

impl RunContext {
    /// Bind the standard task list to a validated subject.
    #[must_use]
    pub fn new(subject: Subject, collaborators: &Collaborators) -> Self {
        let registry = TaskRegistry::standard(&subject, collaborators);
        Self::with_registry(subject, registry)
    }

    /// Use an explicit task list.
    #[must_use]
    pub fn with_registry(subject: Subject, registry: TaskRegistry) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            subject,
            registry,
        }
    }

    /// Identifier attached to logs and the JSON report.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The validated subject.
    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// The tasks of this run.
    #[must_use]
    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }
}
