use std::{cmp::Reverse, io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use tokio::{fs::File, io::AsyncReadExt};
use tracing::{debug, warn};

#[cfg(test)]
use mockall::automock;

use crate::error::AnalyticsError;

use super::{entities::RawRecord, normalize::parse_timestamp};

/// The dashboard only ever looks at this many of the most recent pushes.
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 100;

/// Interface for whatever hands out the events to analyze.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Returns at most `limit` records, most recent first. Records without a usable timestamp go
    /// last so they are still visible to the caller.
    async fn recent(&self, limit: usize) -> Result<Vec<RawRecord>, AnalyticsError>;
}

/// Reads pushes from a file holding either a json array of records or one json record per line.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn read_all(&self) -> Result<String, std::io::Error> {
        debug!("Reading events from {:?}", self.path);
        let mut file = File::open(&self.path).await?;
        file.lock_shared()?;
        let mut content = String::new();
        let result = file.read_to_string(&mut content).await;
        file.unlock_async().await?;
        result?;
        Ok(content)
    }

    fn parse(&self, content: &str) -> Result<Vec<RawRecord>, AnalyticsError> {
        if content.trim_start().starts_with('[') {
            return serde_json::from_str(content).map_err(|source| AnalyticsError::Malformed {
                path: self.path.clone(),
                source,
            });
        }

        let mut records = vec![];
        for line in content.lines().filter(|v| !v.trim().is_empty()) {
            match serde_json::from_str::<RawRecord>(line) {
                Ok(v) => records.push(v),
                Err(e) => {
                    // A half written last line shouldn't hide the rest of the log
                    warn!(
                        "In {:?} found illegal json string {}: {e}",
                        self.path, line
                    )
                }
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl EventSource for JsonFileSource {
    async fn recent(&self, limit: usize) -> Result<Vec<RawRecord>, AnalyticsError> {
        let content = match self.read_all().await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No events file at {:?}", self.path);
                return Ok(vec![]);
            }
            Err(source) => {
                return Err(AnalyticsError::Source {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut records = self.parse(&content)?;
        records.sort_by_cached_key(|v| {
            Reverse(v.created_at.as_ref().and_then(|raw| parse_timestamp(raw).ok()))
        });
        records.truncate(limit);
        Ok(records)
    }
}
