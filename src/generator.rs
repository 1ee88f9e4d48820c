//! Build-time snapshot generation.
//!
//! Fetches every collection the site needs from the remote API and writes
//! it to the snapshot directory, followed by `build-info.json`.
//!
//! # Architecture
//!
//! ```text
//! generate()
//!     │
//!     ├── api_url()?            (missing URL aborts before any fetch)
//!     ├── create_dir_all()?     (failure aborts the run)
//!     │
//!     ├── join_all(ENDPOINTS) ──► fetch ── list ──► write data
//!     │                                └─ err or non-list ──► warn, write []
//!     │
//!     └── write build-info.json
//! ```
//!
//! A failing endpoint never fails the run; only configuration and I/O
//! errors outside the per-endpoint fetch do.

use crate::{
    config::SiteDataConfig,
    data::BuildInfo,
    live::{RemoteApi, unwrap_envelope},
    log,
    snapshot::SnapshotFile,
};
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A remote collection query and the snapshot file it is stored in.
///
/// Every endpoint returns a list; `build-info.json` is written separately.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub path: &'static str,
    pub file: SnapshotFile,
}

const fn collection(path: &'static str, file: SnapshotFile) -> Endpoint {
    Endpoint { path, file }
}

/// Empty list written when an endpoint yields no usable data.
fn fallback() -> Value {
    Value::Array(Vec::new())
}

/// Everything snapshotted on each build.
pub const ENDPOINTS: &[Endpoint] = &[
    collection(
        "/articles?filters[status][$eq]=published&populate=*&sort[0]=publishedDate:desc",
        SnapshotFile::Articles,
    ),
    collection(
        "/articles?filters[status][$eq]=published&filters[featured][$eq]=true&populate=*",
        SnapshotFile::FeaturedArticles,
    ),
    collection(
        "/articles?filters[status][$eq]=published&filters[category][$eq]=computer-science&populate=*",
        SnapshotFile::CsArticles,
    ),
    collection(
        "/articles?filters[status][$eq]=published&filters[category][$eq]=business&populate=*",
        SnapshotFile::BusinessArticles,
    ),
    collection(
        "/articles?filters[status][$eq]=published&filters[category][$eq]=humanities&populate=*",
        SnapshotFile::HumanitiesArticles,
    ),
    collection(
        "/team-members?filters[isActive][$eq]=true&sort[0]=order:asc",
        SnapshotFile::TeamMembers,
    ),
    collection(
        "/researchers?filters[status][$eq]=active",
        SnapshotFile::Researchers,
    ),
    collection("/tags", SnapshotFile::Tags),
];

/// What ended up in a snapshot file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointStatus {
    Fetched,
    /// The fetch failed; the fallback was written. Holds the reason.
    Fallback(String),
}

/// Summary of a generation run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub dir: PathBuf,
    pub endpoints: Vec<(SnapshotFile, EndpointStatus)>,
    pub build_info: BuildInfo,
}

impl GenerateReport {
    pub fn fallback_count(&self) -> usize {
        self.endpoints
            .iter()
            .filter(|(_, status)| matches!(status, EndpointStatus::Fallback(_)))
            .count()
    }
}

/// Generate all snapshots into the configured snapshot directory.
pub async fn generate(config: &SiteDataConfig) -> Result<GenerateReport> {
    let api_url = config.api_url()?;
    let dir = config.snapshot_dir();

    log!("generate"; "API base URL: {api_url}");
    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("Failed to create snapshot directory {}", dir.display()))?;

    let api = RemoteApi::new(reqwest::Client::new(), api_url);
    let results = join_all(ENDPOINTS.iter().map(|endpoint| fetch_and_store(&api, &dir, endpoint))).await;
    let endpoints = results.into_iter().collect::<Result<Vec<_>>>()?;

    let build_info = BuildInfo {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        version: config.build.version.clone(),
        api_base_url: Some(api_url.to_owned()),
    };
    write_json(&dir.join(SnapshotFile::BuildInfo.file_name()), &build_info).await?;

    let report = GenerateReport {
        dir,
        endpoints,
        build_info,
    };
    log!(
        "done";
        "{} snapshots ({} fallback) at {}",
        report.endpoints.len(),
        report.fallback_count(),
        report.build_info.timestamp
    );
    Ok(report)
}

/// Fetch one endpoint and write its snapshot, substituting the fallback on failure.
async fn fetch_and_store(
    api: &RemoteApi,
    dir: &Path,
    endpoint: &Endpoint,
) -> Result<(SnapshotFile, EndpointStatus)> {
    log!("fetch"; "{}", endpoint.path);

    let (value, status) = match api.fetch_value(endpoint.path).await {
        Ok(value) => match unwrap_envelope(value) {
            list @ Value::Array(_) => (list, EndpointStatus::Fetched),
            other => {
                let reason = format!("expected a list, got {}", kind_of(&other));
                log!("warn"; "{}: {reason}, writing fallback", endpoint.file);
                (fallback(), EndpointStatus::Fallback(reason))
            }
        },
        Err(err) => {
            log!("warn"; "{}: {err}, writing fallback", endpoint.file);
            (fallback(), EndpointStatus::Fallback(err.to_string()))
        }
    };

    write_json(&dir.join(endpoint.file.file_name()), &value).await?;
    Ok((endpoint.file, status))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
