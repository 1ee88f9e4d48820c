//! sitedata - content snapshots for static sites, with a live API fallback.
//!
//! Two components share nothing but the snapshot directory:
//!
//! - [`generator`] runs once per build, fetching every collection from the
//!   remote content API into JSON snapshot files.
//! - [`StaticApi`] runs inside the site, answering reads from those
//!   snapshots through a load-once cache and delegating to the live API
//!   ([`live::ContentApi`]) when a snapshot is unavailable.

pub mod accessor;
pub mod cli;
pub mod config;
pub mod data;
pub mod generator;
pub mod live;
pub mod logger;
pub mod markdown;
pub mod snapshot;

#[cfg(test)]
mod test_support;

pub use accessor::{DataError, Outcome, StaticApi};
pub use config::{ConfigError, SiteDataConfig};
