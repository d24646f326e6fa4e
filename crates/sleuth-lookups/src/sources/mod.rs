//! Source client implementations.

pub mod breach_directory;
pub mod dns;
pub mod emailrep;
pub mod google;
pub mod haveibeenpwned;
pub mod hunter;
pub mod intelx;
pub mod ipapi;
pub mod psbdmp;
pub mod social;

pub use breach_directory::BreachDirectoryLookup;
pub use dns::DnsLookup;
pub use emailrep::EmailRepLookup;
pub use google::GoogleSearchLookup;
pub use haveibeenpwned::HaveIBeenPwnedLookup;
pub use hunter::HunterLookup;
pub use intelx::IntelxLookup;
pub use ipapi::IpApiLookup;
pub use psbdmp::PsbdmpLookup;
pub use social::{InstagramLookup, SpotifyLookup, TwitterLookup};
