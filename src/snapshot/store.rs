//! Lazy, load-once snapshot cache.
//!
//! Each snapshot file is loaded at most once per cache lifetime. A failed
//! load is remembered as [`Snapshot::Unavailable`] and never retried.
//!
//! # Concurrency
//!
//! The lock is released before the load is awaited, so two requests that
//! miss on the same file at the same time both load it and the later write
//! wins. Loads of the same file are idempotent, so this only costs a
//! duplicate read.

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use serde_json::Value;

use super::{SnapshotFile, SnapshotSource};
use crate::log;

/// Resolved state of a snapshot file.
#[derive(Debug, Clone)]
pub enum Snapshot {
    /// Parsed file contents, shared between callers
    Available(Arc<Value>),
    /// The load failed; callers should go to the live API
    Unavailable,
}

impl Snapshot {
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// Mapping from snapshot file to its resolved state.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: RwLock<HashMap<SnapshotFile, Snapshot>>,
}

impl SnapshotCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached state of `file`, loading it from `source` on a miss.
    pub async fn load(&self, file: SnapshotFile, source: &dyn SnapshotSource) -> Snapshot {
        if let Some(hit) = self.get(file) {
            return hit;
        }

        let snapshot = match source.load(file).await {
            Ok(value) => Snapshot::Available(Arc::new(value)),
            Err(err) => {
                log!("warn"; "snapshot {file} not available: {err}");
                Snapshot::Unavailable
            }
        };

        self.entries.write().insert(file, snapshot.clone());
        snapshot
    }

    /// Get the cached state without loading.
    pub fn get(&self, file: SnapshotFile) -> Option<Snapshot> {
        self.entries.read().get(&file).cloned()
    }

    /// Number of files resolved so far (available or not).
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves `tags.json` only and counts every load.
    #[derive(Default)]
    struct CountingSource {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl SnapshotSource for CountingSource {
        async fn load(&self, file: SnapshotFile) -> Result<Value, SnapshotError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            match file {
                SnapshotFile::Tags => Ok(json!([{ "name": "rust" }])),
                other => Err(SnapshotError::Status {
                    url: other.file_name().into(),
                    status: 404,
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_available_snapshot_loaded_once() {
        let source = CountingSource::default();
        let cache = SnapshotCache::new();

        let first = cache.load(SnapshotFile::Tags, &source).await;
        let second = cache.load(SnapshotFile::Tags, &source).await;

        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
        match (first, second) {
            (Snapshot::Available(a), Snapshot::Available(b)) => assert!(Arc::ptr_eq(&a, &b)),
            other => panic!("expected available snapshots, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unavailable_snapshot_remembered() {
        let source = CountingSource::default();
        let cache = SnapshotCache::new();

        for _ in 0..3 {
            let snapshot = cache.load(SnapshotFile::Articles, &source).await;
            assert!(!snapshot.is_available());
        }

        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
        assert!(matches!(cache.get(SnapshotFile::Articles), Some(Snapshot::Unavailable)));
    }

    #[tokio::test]
    async fn test_files_cached_independently() {
        let source = CountingSource::default();
        let cache = SnapshotCache::new();
        assert!(cache.is_empty());

        cache.load(SnapshotFile::Tags, &source).await;
        cache.load(SnapshotFile::Researchers, &source).await;
        cache.load(SnapshotFile::Tags, &source).await;

        assert_eq!(cache.len(), 2);
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
        assert!(cache.get(SnapshotFile::BuildInfo).is_none());
    }
}
