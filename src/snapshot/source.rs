//! Where snapshot files are read from.

use super::{SnapshotError, SnapshotFile};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

/// Loads the parsed contents of a snapshot file.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn load(&self, file: SnapshotFile) -> Result<Value, SnapshotError>;
}

/// Reads snapshots from a local directory (the generator's output).
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SnapshotSource for DirSource {
    async fn load(&self, file: SnapshotFile) -> Result<Value, SnapshotError> {
        let path = self.dir.join(file.file_name());
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|err| SnapshotError::Io(path.clone(), err))?;
        serde_json::from_slice(&bytes)
            .map_err(|err| SnapshotError::Parse(path.display().to_string(), err))
    }
}

/// Fetches snapshots served as static files, at `<base_url>/<file name>`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    fn url_for(&self, file: SnapshotFile) -> String {
        format!("{}/{}", self.base_url, file.file_name())
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn load(&self, file: SnapshotFile) -> Result<Value, SnapshotError> {
        let url = self.url_for(file);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| SnapshotError::Http(url.clone(), err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SnapshotError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| SnapshotError::Http(url.clone(), err))?;
        serde_json::from_slice(&body).map_err(|err| SnapshotError::Parse(url, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_dir_source_reads_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tags.json"), r#"[{"name":"rust"}]"#).unwrap();

        let source = DirSource::new(dir.path());
        let value = source.load(SnapshotFile::Tags).await.unwrap();
        assert_eq!(value, json!([{ "name": "rust" }]));
    }

    #[tokio::test]
    async fn test_dir_source_missing_file() {
        let dir = TempDir::new().unwrap();
        let source = DirSource::new(dir.path());

        let err = source.load(SnapshotFile::Articles).await.unwrap_err();
        assert!(matches!(err, SnapshotError::Io(..)));
        assert!(err.to_string().contains("articles.json"));
    }

    #[tokio::test]
    async fn test_dir_source_invalid_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("researchers.json"), "[{").unwrap();

        let source = DirSource::new(dir.path());
        let err = source.load(SnapshotFile::Researchers).await.unwrap_err();
        assert!(matches!(err, SnapshotError::Parse(..)));
    }

    #[tokio::test]
    async fn test_http_source_fetches_by_file_name() {
        let server = spawn_server(|url| match url {
            "/data/team-members.json" => (200, r#"[{"isActive":true}]"#.into()),
            _ => (404, "not found".into()),
        });
        let source = HttpSource::new(reqwest::Client::new(), format!("{}/data/", server.url));

        let value = source.load(SnapshotFile::TeamMembers).await.unwrap();
        assert_eq!(value, json!([{ "isActive": true }]));

        let err = source.load(SnapshotFile::Tags).await.unwrap_err();
        assert!(matches!(err, SnapshotError::Status { status: 404, .. }));
    }
}
