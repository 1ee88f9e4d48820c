//! Content records and request options.
//!
//! These types are shared by the snapshot generator, the live API client
//! and the runtime accessor. Records are read leniently: unknown fields are
//! preserved and missing ones fall back to defaults, since snapshot files
//! carry no schema version.

mod query;
mod types;

pub use query::{ArticleQuery, Category, ResearcherQuery, ResearcherStatus};
pub use types::{
    Application, Article, BuildInfo, NewsletterSubscription, Researcher, Tag, TeamMember,
};
