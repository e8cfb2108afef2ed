use std::{fmt::Display, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::Timestamped;

/// An event the engine can work with. Only `created_at` matters to the analytics, the identifier is
/// kept for reporting.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub id: Arc<str>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(id: impl Into<Arc<str>>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
        }
    }
}

impl Timestamped for Event {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A push as it comes out of the event log, before its timestamp has been checked. Extra push
/// fields are carried along but never looked at by the analytics.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub struct RawRecord {
    pub id: RecordId,
    #[serde(default)]
    pub created_at: Option<RawTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RawRecord {
    pub fn new(id: impl Into<String>, created_at: impl Into<RawTimestamp>) -> Self {
        Self {
            id: RecordId::Text(id.into()),
            created_at: Some(created_at.into()),
            github_link: None,
            comment: None,
        }
    }
}

/// Stores hand out either uuids or serial ids.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(v) => write!(f, "{v}"),
            RecordId::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Timestamp in whatever shape the store produced it. Anything that isn't a string or whole
/// seconds is kept as is so it can be reported instead of failing the whole file.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum RawTimestamp {
    Seconds(i64),
    Text(String),
    Other(serde_json::Value),
}

impl From<&str> for RawTimestamp {
    fn from(value: &str) -> Self {
        RawTimestamp::Text(value.to_string())
    }
}

impl From<String> for RawTimestamp {
    fn from(value: String) -> Self {
        RawTimestamp::Text(value)
    }
}

impl From<i64> for RawTimestamp {
    fn from(value: i64) -> Self {
        RawTimestamp::Seconds(value)
    }
}

impl Display for RawTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawTimestamp::Seconds(v) => write!(f, "{v}"),
            RawTimestamp::Text(v) => write!(f, "{v:?}"),
            RawTimestamp::Other(v) => write!(f, "{v}"),
        }
    }
}
