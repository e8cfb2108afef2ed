use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the analytics engine and the event retrieval around it.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("record {id} has an invalid created_at {value}: {reason}")]
    InvalidTimestamp {
        id: String,
        value: String,
        reason: String,
    },

    #[error("can't use {0:?} as a reference timezone. Expected utc, local or an offset like +02:00")]
    InvalidZone(String),

    #[error("failed to read events from {path:?}")]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("events file {path:?} is not a valid json array")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
