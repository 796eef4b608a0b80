use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;
use tracing::info;

use crate::models::Entry;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure to obtain or decode the foe dataset. Fatal to the tool: callers
/// surface the message and do not retry.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Local dataset file could not be read.
    #[error("failed to read dataset {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Remote dataset could not be fetched.
    #[error("failed to fetch dataset from {url}: {source}")]
    Http {
        /// URL that failed to fetch.
        url: String,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },
    /// Payload was not valid dataset JSON.
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the foe dataset comes from.
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// A JSON file on disk.
    File(PathBuf),
    /// A JSON document served over HTTP.
    Url(String),
}

/// Loads the campaign/area/foe dataset once at startup.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    source: DatasetSource,
    timeout: Duration,
}

impl DatasetLoader {
    /// Loader for the given source with the default fetch timeout.
    pub fn new(source: DatasetSource) -> Self {
        Self {
            source,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Convenience constructor for a local file.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::new(DatasetSource::File(path.as_ref().to_path_buf()))
    }

    /// Override the HTTP fetch timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch and decode the dataset. Unknown fields are ignored and missing
    /// optional fields default to empty; structural failures are fatal.
    pub async fn load(&self) -> Result<Vec<Entry>, LoadError> {
        let raw = match &self.source {
            DatasetSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
            DatasetSource::Url(url) => self.fetch(url).await?,
        };

        let entries: Vec<Entry> = serde_json::from_str(&raw)?;
        info!(count = entries.len(), "dataset loaded");
        Ok(entries)
    }

    async fn fetch(&self, url: &str) -> Result<String, LoadError> {
        let wrap = |source: reqwest::Error| LoadError::Http {
            url: url.to_string(),
            source,
        };
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(wrap)?;
        client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(wrap)?
            .text()
            .await
            .map_err(wrap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn loads_entries_from_file() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("foe-data.json");
        fs::write(
            &path,
            r#"[
                {"campaign": "Factions", "area": "Raisu Palace", "foes": []},
                {"campaign": "Nightfall", "mission": "Jokanur Diggings",
                 "builds": {"normal": [], "hard": []}}
            ]"#,
        )?;

        let entries = DatasetLoader::from_path(&path).load().await?;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Raisu Palace");
        assert!(entries[1].has_modes());
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = DatasetLoader::from_path("/nonexistent/foe-data.json")
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("foe-data.json");
        fs::write(&path, "{not json")?;
        let err = DatasetLoader::from_path(&path).load().await.unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
        Ok(())
    }
}
