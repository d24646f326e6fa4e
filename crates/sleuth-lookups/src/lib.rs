//! Sleuth Lookups - clients for the sources an email address is checked against.
//!
//! Every source implements the [`Lookup`] trait: it receives one query string
//! and returns the [`Evidence`] it found. Clients are stateless per call and
//! are shared read-only across concurrently running lookups.
//!
//! # Sources
//!
//! - DNS records of the address's domain (`hickory-resolver`)
//! - Google search results for the address or its local part
//! - Breach databases: `BreachDirectory`, Have I Been Pwned, Intelligence X, Psbdmp
//! - Reputation and enrichment: `EmailRep`, Hunter, IP-API
//! - Social presence: Instagram, Spotify, Twitter
//!
//! # Example
//!
//! ```rust,no_run
//! use sleuth_lookups::{http, Lookup, PsbdmpLookup};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = http::build_client(&http::HttpSettings::default())?;
//! let psbdmp = PsbdmpLookup::new(client);
//!
//! for evidence in psbdmp.lookup("alice@example.com").await? {
//!     println!("{evidence}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod evidence;
pub mod http;
pub mod lookup;
pub mod source;
pub mod sources;

// Re-export commonly used types
pub use error::{LookupError, Result};
pub use evidence::{Evidence, LookupOutcome};
pub use lookup::Lookup;
pub use source::Source;
pub use sources::{
    BreachDirectoryLookup, DnsLookup, EmailRepLookup, GoogleSearchLookup, HaveIBeenPwnedLookup,
    HunterLookup, InstagramLookup, IntelxLookup, IpApiLookup, PsbdmpLookup, SpotifyLookup,
    TwitterLookup,
};
