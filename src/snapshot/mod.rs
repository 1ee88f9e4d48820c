//! Snapshot files produced at build time and read back at runtime.
//!
//! # Layout
//!
//! All snapshots live in one directory with fixed, versionless names:
//!
//! | File | Contents |
//! |------|----------|
//! | `articles.json` | Published articles, newest first |
//! | `featured-articles.json` | Published featured articles |
//! | `cs-articles.json` | Published computer-science articles |
//! | `business-articles.json` | Published business articles |
//! | `humanities-articles.json` | Published humanities articles |
//! | `team-members.json` | Active team members by display order |
//! | `researchers.json` | Active researchers |
//! | `tags.json` | All tags |
//! | `build-info.json` | A single [`BuildInfo`](crate::data::BuildInfo) record |
//!
//! A missing or unreadable file is a normal state: the accessor falls back
//! to the live API.

mod source;
mod store;

pub use source::{DirSource, HttpSource, SnapshotSource};
pub use store::{Snapshot, SnapshotCache};

use crate::data::{ArticleQuery, Category};
use std::{fmt, path::PathBuf};
use thiserror::Error;

/// One of the fixed snapshot files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SnapshotFile {
    Articles,
    FeaturedArticles,
    CsArticles,
    BusinessArticles,
    HumanitiesArticles,
    TeamMembers,
    Researchers,
    Tags,
    BuildInfo,
}

impl SnapshotFile {
    pub const ALL: [Self; 9] = [
        Self::Articles,
        Self::FeaturedArticles,
        Self::CsArticles,
        Self::BusinessArticles,
        Self::HumanitiesArticles,
        Self::TeamMembers,
        Self::Researchers,
        Self::Tags,
        Self::BuildInfo,
    ];

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Articles => "articles.json",
            Self::FeaturedArticles => "featured-articles.json",
            Self::CsArticles => "cs-articles.json",
            Self::BusinessArticles => "business-articles.json",
            Self::HumanitiesArticles => "humanities-articles.json",
            Self::TeamMembers => "team-members.json",
            Self::Researchers => "researchers.json",
            Self::Tags => "tags.json",
            Self::BuildInfo => "build-info.json",
        }
    }
}

impl fmt::Display for SnapshotFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

// ============================================================================
// Article Source Selection
// ============================================================================

/// A predicate over article options paired with the snapshot it selects.
pub type ArticleRule = (fn(&ArticleQuery) -> bool, SnapshotFile);

fn is_featured(query: &ArticleQuery) -> bool {
    query.featured
}

fn is_computer_science(query: &ArticleQuery) -> bool {
    query.category == Some(Category::ComputerScience)
}

fn is_business(query: &ArticleQuery) -> bool {
    query.category == Some(Category::Business)
}

fn is_humanities(query: &ArticleQuery) -> bool {
    query.category == Some(Category::Humanities)
}

/// Article snapshot rules in priority order. The first match wins;
/// `articles.json` is used when nothing matches.
pub const ARTICLE_SOURCES: &[ArticleRule] = &[
    (is_featured, SnapshotFile::FeaturedArticles),
    (is_computer_science, SnapshotFile::CsArticles),
    (is_business, SnapshotFile::BusinessArticles),
    (is_humanities, SnapshotFile::HumanitiesArticles),
];

/// Pick the snapshot that answers an article listing.
pub fn select_article_source(query: &ArticleQuery) -> SnapshotFile {
    ARTICLE_SOURCES
        .iter()
        .find(|(matches, _)| matches(query))
        .map_or(SnapshotFile::Articles, |&(_, file)| file)
}

// ============================================================================
// Errors
// ============================================================================

/// Why a snapshot could not be loaded.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("request for `{0}` failed")]
    Http(String, #[source] reqwest::Error),

    #[error("request for `{url}` returned status {status}")]
    Status { url: String, status: u16 },

    #[error("`{0}` is not valid JSON")]
    Parse(String, #[source] serde_json::Error),
}
