//! Runtime data accessor: snapshot first, live API second.
//!
//! # Resolution
//!
//! ```text
//! resolve_*(options)
//!     │
//!     ├── pick snapshot file (rule table for articles)
//!     │
//!     ├── SnapshotCache::load ── miss ──► SnapshotSource (once per file)
//!     │
//!     ├── Unavailable ──► ContentApi (all options forwarded) ──► Delegated
//!     │
//!     └── Available ──► decode + filter + limit ──► Snapshot / Defaulted
//! ```
//!
//! Every read updates two pieces of shared state that a presentation layer
//! can observe: a `loading` flag, cleared on every exit path, and a single
//! latest-error slot.

use std::{
    future::Future,
    sync::atomic::{AtomicBool, Ordering},
};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::{
    config::SiteDataConfig,
    data::{
        Application, Article, ArticleQuery, BuildInfo, NewsletterSubscription, Researcher,
        ResearcherQuery, Tag, TeamMember,
    },
    live::{ContentApi, LiveError, OfflineApi, RemoteApi},
    log,
    snapshot::{
        DirSource, HttpSource, Snapshot, SnapshotCache, SnapshotFile, SnapshotSource,
        select_article_source,
    },
};

/// Why a read operation produced no data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to fetch {what}: {source}")]
    Live {
        what: &'static str,
        #[source]
        source: LiveError,
    },

    #[error("snapshot `{file}` is malformed: {source}")]
    Malformed {
        file: SnapshotFile,
        #[source]
        source: serde_json::Error,
    },
}

/// How a read operation was answered.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Served from a snapshot file
    Snapshot(T),
    /// Snapshot loaded but empty, or a fixed default was used
    Defaulted(T),
    /// Answered by the live API
    Delegated(T),
    Failed(DataError),
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Snapshot(value) => Outcome::Snapshot(f(value)),
            Self::Defaulted(value) => Outcome::Defaulted(f(value)),
            Self::Delegated(value) => Outcome::Delegated(f(value)),
            Self::Failed(err) => Outcome::Failed(err),
        }
    }

    pub fn into_result(self) -> Result<T, DataError> {
        match self {
            Self::Snapshot(value) | Self::Defaulted(value) | Self::Delegated(value) => Ok(value),
            Self::Failed(err) => Err(err),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Snapshot(value) | Self::Defaulted(value) | Self::Delegated(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    pub const fn is_delegated(&self) -> bool {
        matches!(self, Self::Delegated(_))
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Short label of the answering source, for logs.
    pub const fn source(&self) -> &'static str {
        match self {
            Self::Snapshot(_) => "snapshot",
            Self::Defaulted(_) => "default",
            Self::Delegated(_) => "live",
            Self::Failed(_) => "failed",
        }
    }
}

impl<T: Default> Outcome<T> {
    /// The data, or an empty value on failure.
    pub fn unwrap_or_default(self) -> T {
        self.into_result().unwrap_or_default()
    }
}

/// Decode a snapshot holding a list of records. `null` decodes to an empty list.
fn decode_list<T: DeserializeOwned>(file: SnapshotFile, value: &Value) -> Outcome<Vec<T>> {
    if value.is_null() {
        return Outcome::Defaulted(Vec::new());
    }
    match serde_json::from_value(value.clone()) {
        Ok(list) => Outcome::Snapshot(list),
        Err(source) => Outcome::Failed(DataError::Malformed { file, source }),
    }
}

fn truncate<T>(mut list: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        list.truncate(limit);
    }
    list
}

/// Researcher filtering: status, then program, then limit.
fn filter_researchers(list: Vec<Researcher>, query: &ResearcherQuery) -> Vec<Researcher> {
    let status = query.status.map(|s| s.as_str());
    let program = query.program();
    let filtered = list
        .into_iter()
        .filter(|r| status.is_none_or(|s| r.status() == Some(s)))
        .filter(|r| program.is_none_or(|p| r.program() == Some(p)))
        .collect();
    truncate(filtered, query.limit())
}

/// Sets the loading flag for its lifetime.
struct Loading<'a>(&'a AtomicBool);

impl<'a> Loading<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Content accessor backed by build-time snapshots with a live API fallback.
///
/// Each instance owns its snapshot cache, so a fresh instance starts with
/// nothing loaded.
pub struct StaticApi {
    source: Box<dyn SnapshotSource>,
    live: Box<dyn ContentApi>,
    cache: SnapshotCache,
    loading: AtomicBool,
    error: RwLock<Option<String>>,
}

impl StaticApi {
    pub fn new(source: Box<dyn SnapshotSource>, live: Box<dyn ContentApi>) -> Self {
        Self {
            source,
            live,
            cache: SnapshotCache::new(),
            loading: AtomicBool::new(false),
            error: RwLock::new(None),
        }
    }

    /// Build an accessor from configuration.
    ///
    /// Snapshots come from `[snapshot].base_url` when set, otherwise from the
    /// snapshot directory. Without an API base URL the accessor still serves
    /// snapshots; reads that need the live API fail with
    /// [`LiveError::NotConfigured`].
    pub fn from_config(config: &SiteDataConfig) -> Self {
        let client = reqwest::Client::new();

        let live: Box<dyn ContentApi> = match config.api_url() {
            Ok(url) => Box::new(RemoteApi::new(client.clone(), url)),
            Err(_) => {
                log!("warn"; "no API base URL configured, serving snapshots only");
                Box::new(OfflineApi)
            }
        };
        let source: Box<dyn SnapshotSource> = match &config.snapshot.base_url {
            Some(url) => Box::new(HttpSource::new(client, url.as_str())),
            None => Box::new(DirSource::new(config.snapshot_dir())),
        };
        Self::new(source, live)
    }

    // ========================================================================
    // Shared State
    // ========================================================================

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Message of the latest failed operation.
    pub fn error(&self) -> Option<String> {
        self.error.read().clone()
    }

    pub fn clear_error(&self) {
        *self.error.write() = None;
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    fn begin(&self) -> Loading<'_> {
        self.clear_error();
        Loading::start(&self.loading)
    }

    /// Record the error of a failed outcome and pass it through.
    fn observe<T>(&self, outcome: Outcome<T>) -> Outcome<T> {
        if let Outcome::Failed(err) = &outcome {
            log!("error"; "{err}");
            *self.error.write() = Some(err.to_string());
        }
        outcome
    }

    async fn snapshot(&self, file: SnapshotFile) -> Snapshot {
        self.cache.load(file, self.source.as_ref()).await
    }

    async fn delegate<T>(
        what: &'static str,
        request: impl Future<Output = Result<T, LiveError>>,
    ) -> Outcome<T> {
        match request.await {
            Ok(value) => Outcome::Delegated(value),
            Err(source) => Outcome::Failed(DataError::Live { what, source }),
        }
    }

    // ========================================================================
    // Read Operations
    // ========================================================================

    pub async fn resolve_articles(&self, query: &ArticleQuery) -> Outcome<Vec<Article>> {
        let _loading = self.begin();
        let file = select_article_source(query);

        let outcome = match self.snapshot(file).await {
            Snapshot::Unavailable => Self::delegate("articles", self.live.get_articles(query)).await,
            Snapshot::Available(value) => {
                decode_list(file, &value).map(|list| truncate(list, query.limit()))
            }
        };
        self.observe(outcome)
    }

    /// Articles for `query`; empty on failure.
    pub async fn get_articles(&self, query: &ArticleQuery) -> Vec<Article> {
        self.resolve_articles(query).await.unwrap_or_default()
    }

    pub async fn resolve_article_by_slug(&self, slug: &str) -> Outcome<Article> {
        let _loading = self.begin();
        let file = SnapshotFile::Articles;

        let found = match self.snapshot(file).await {
            Snapshot::Available(value) => value
                .as_array()
                .and_then(|list| {
                    list.iter()
                        .find(|item| item.get("slug").and_then(Value::as_str) == Some(slug))
                })
                .cloned(),
            Snapshot::Unavailable => None,
        };

        let outcome = match found {
            Some(item) => match serde_json::from_value(item) {
                Ok(article) => Outcome::Snapshot(article),
                Err(source) => Outcome::Failed(DataError::Malformed { file, source }),
            },
            None => Self::delegate("article", self.live.get_article_by_slug(slug)).await,
        };
        self.observe(outcome)
    }

    /// The article with exactly this slug. Errors are recorded and returned.
    pub async fn get_article_by_slug(&self, slug: &str) -> Result<Article, DataError> {
        self.resolve_article_by_slug(slug).await.into_result()
    }

    pub async fn resolve_team_members(&self) -> Outcome<Vec<TeamMember>> {
        let _loading = self.begin();
        let file = SnapshotFile::TeamMembers;

        let outcome = match self.snapshot(file).await {
            Snapshot::Unavailable => {
                Self::delegate("team members", self.live.get_team_members()).await
            }
            Snapshot::Available(value) => decode_list(file, &value),
        };
        self.observe(outcome)
    }

    pub async fn get_team_members(&self) -> Vec<TeamMember> {
        self.resolve_team_members().await.unwrap_or_default()
    }

    pub async fn resolve_researchers(&self, query: &ResearcherQuery) -> Outcome<Vec<Researcher>> {
        let _loading = self.begin();
        let file = SnapshotFile::Researchers;

        let outcome = match self.snapshot(file).await {
            Snapshot::Unavailable => {
                Self::delegate("researchers", self.live.get_researchers(query)).await
            }
            Snapshot::Available(value) => {
                decode_list(file, &value).map(|list| filter_researchers(list, query))
            }
        };
        self.observe(outcome)
    }

    pub async fn get_researchers(&self, query: &ResearcherQuery) -> Vec<Researcher> {
        self.resolve_researchers(query).await.unwrap_or_default()
    }

    pub async fn resolve_tags(&self) -> Outcome<Vec<Tag>> {
        let _loading = self.begin();
        let file = SnapshotFile::Tags;

        let outcome = match self.snapshot(file).await {
            Snapshot::Unavailable => Self::delegate("tags", self.live.get_tags()).await,
            Snapshot::Available(value) => decode_list(file, &value),
        };
        self.observe(outcome)
    }

    pub async fn get_tags(&self) -> Vec<Tag> {
        self.resolve_tags().await.unwrap_or_default()
    }

    /// Build metadata. Never delegates: there is no live equivalent.
    pub async fn resolve_build_info(&self) -> Outcome<BuildInfo> {
        let file = SnapshotFile::BuildInfo;
        match self.snapshot(file).await {
            Snapshot::Available(value) if !value.is_null() => {
                match serde_json::from_value(Value::clone(&value)) {
                    Ok(info) => Outcome::Snapshot(info),
                    Err(err) => {
                        log!("warn"; "{file} is malformed, using defaults: {err}");
                        Outcome::Defaulted(BuildInfo::default())
                    }
                }
            }
            _ => Outcome::Defaulted(BuildInfo::default()),
        }
    }

    pub async fn get_build_info(&self) -> BuildInfo {
        self.resolve_build_info().await.unwrap_or_default()
    }

    // ========================================================================
    // Pass-through Operations
    // ========================================================================

    pub async fn subscribe_newsletter(
        &self,
        subscription: &NewsletterSubscription,
    ) -> Result<Value, LiveError> {
        self.live.subscribe_newsletter(subscription).await
    }

    pub async fn submit_application(&self, application: &Application) -> Result<Value, LiveError> {
        self.live.submit_application(application).await
    }
}

// ============================================================================
// Tests
// ============================================================================
