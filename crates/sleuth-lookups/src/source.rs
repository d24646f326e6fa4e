//! Identifiers for the external sources a subject is checked against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One external lookup service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// DNS records of the subject's domain
    Dns,
    /// Google web search
    GoogleSearch,
    /// `BreachDirectory` via `RapidAPI`
    BreachDirectory,
    /// Have I Been Pwned v3
    HaveIBeenPwned,
    /// emailrep.io reputation
    EmailRep,
    /// hunter.io domain search
    Hunter,
    /// Intelligence X
    Intelx,
    /// ip-api.com geolocation
    IpApi,
    /// psbdmp.ws paste dumps
    Psbdmp,
    /// Instagram account presence
    Instagram,
    /// Spotify account presence
    Spotify,
    /// Twitter account presence
    Twitter,
}

impl Source {
    /// Get a human-readable name for this source.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Dns => "DNS",
            Self::GoogleSearch => "Google Search",
            Self::BreachDirectory => "BreachDirectory",
            Self::HaveIBeenPwned => "Have I Been Pwned",
            Self::EmailRep => "EmailRep",
            Self::Hunter => "Hunter",
            Self::Intelx => "Intelligence X",
            Self::IpApi => "IP-API",
            Self::Psbdmp => "Psbdmp",
            Self::Instagram => "Instagram",
            Self::Spotify => "Spotify",
            Self::Twitter => "Twitter",
        }
    }

    /// Stable machine identifier, used as the `source` field of lookup spans.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Dns => "dns",
            Self::GoogleSearch => "google_search",
            Self::BreachDirectory => "breach_directory",
            Self::HaveIBeenPwned => "have_i_been_pwned",
            Self::EmailRep => "email_rep",
            Self::Hunter => "hunter",
            Self::Intelx => "intelx",
            Self::IpApi => "ip_api",
            Self::Psbdmp => "psbdmp",
            Self::Instagram => "instagram",
            Self::Spotify => "spotify",
            Self::Twitter => "twitter",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
