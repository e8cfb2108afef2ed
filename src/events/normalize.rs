use std::fmt::Display;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AnalyticsError;

use super::entities::{Event, RawRecord, RawTimestamp};

/// What to do with a record whose `created_at` can't be turned into an instant. Such records are
/// never given a made up date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimestampPolicy {
    /// Leave the record out and report it in [Normalized::skipped].
    #[default]
    Skip,
    /// Fail the whole call on the first bad record.
    Reject,
}

impl Display for TimestampPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampPolicy::Skip => write!(f, "skip"),
            TimestampPolicy::Reject => write!(f, "reject"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub id: String,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Normalized {
    pub events: Vec<Event>,
    pub skipped: Vec<SkippedRecord>,
}

/// Turns raw records into [Event]s, applying `policy` to records with unusable timestamps.
pub fn normalize_records(
    records: impl IntoIterator<Item = RawRecord>,
    policy: TimestampPolicy,
) -> Result<Normalized, AnalyticsError> {
    let mut normalized = Normalized::default();

    for record in records {
        let parsed = match &record.created_at {
            Some(raw) => parse_timestamp(raw).map_err(|reason| (raw.to_string(), reason)),
            None => Err(("null".to_string(), "missing created_at".to_string())),
        };

        match parsed {
            Ok(created_at) => normalized
                .events
                .push(Event::new(record.id.to_string(), created_at)),
            Err((value, reason)) => {
                let id = record.id.to_string();
                if policy == TimestampPolicy::Reject {
                    return Err(AnalyticsError::InvalidTimestamp { id, value, reason });
                }
                warn!("Skipping record {id} with created_at {value}: {reason}");
                normalized.skipped.push(SkippedRecord { id, value, reason });
            }
        }
    }

    debug!(
        "Normalized {} events, skipped {}",
        normalized.events.len(),
        normalized.skipped.len()
    );
    Ok(normalized)
}

/// Timestamps must identify an instant, so text without an offset is refused rather than assumed
/// to be in some zone.
pub fn parse_timestamp(raw: &RawTimestamp) -> Result<DateTime<Utc>, String> {
    match raw {
        RawTimestamp::Seconds(seconds) => DateTime::from_timestamp(*seconds, 0)
            .ok_or_else(|| format!("{seconds} is out of the supported range")),
        RawTimestamp::Text(text) => parse_text_timestamp(text),
        RawTimestamp::Other(_) => Err("expected a string or unix seconds".to_string()),
    }
}

fn parse_text_timestamp(text: &str) -> Result<DateTime<Utc>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("empty timestamp".to_string());
    }
    if let Ok(v) = DateTime::parse_from_rfc3339(text) {
        return Ok(v.to_utc());
    }
    // Postgres renders timestamptz as `2025-03-19 10:00:00.123+00`
    DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%#z")
        .map(|v| v.to_utc())
        .map_err(|e| format!("not an RFC 3339 timestamp: {e}"))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::{
        error::AnalyticsError,
        events::entities::{RawRecord, RawTimestamp, RecordId},
        utils::logging::TEST_LOGGING,
    };

    use super::{normalize_records, parse_timestamp, TimestampPolicy};

    fn records() -> Vec<RawRecord> {
        vec![
            RawRecord::new("a", "2025-03-19T10:00:00Z"),
            RawRecord::new("b", "yesterday-ish"),
            RawRecord::new("c", 1742378400i64),
            RawRecord {
                id: RecordId::Number(4),
                created_at: None,
                github_link: None,
                comment: Some("no date".into()),
            },
        ]
    }

    #[test]
    fn parses_store_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 19, 10, 0, 0).unwrap();
        assert_eq!(
            parse_timestamp(&"2025-03-19T10:00:00Z".into()),
            Ok(expected)
        );
        assert_eq!(
            parse_timestamp(&"2025-03-19T12:00:00+02:00".into()),
            Ok(expected)
        );
        assert_eq!(
            parse_timestamp(&"2025-03-19 10:00:00.000+00".into()),
            Ok(expected)
        );
        assert_eq!(
            parse_timestamp(&"2025-03-19 07:00:00-03:00".into()),
            Ok(expected)
        );
        assert_eq!(
            parse_timestamp(&RawTimestamp::Seconds(expected.timestamp())),
            Ok(expected)
        );
    }

    #[test]
    fn refuses_timestamps_without_instant() {
        assert!(parse_timestamp(&"2025-03-19T10:00:00".into()).is_err());
        assert!(parse_timestamp(&"2025-03-19".into()).is_err());
        assert!(parse_timestamp(&"".into()).is_err());
        assert!(parse_timestamp(&RawTimestamp::Seconds(i64::MAX)).is_err());
        assert!(parse_timestamp(&RawTimestamp::Other(serde_json::json!(1.5))).is_err());
    }

    #[test]
    fn skip_policy_reports_bad_records() -> anyhow::Result<()> {
        *TEST_LOGGING;
        let normalized = normalize_records(records(), TimestampPolicy::Skip)?;

        assert_eq!(normalized.events.len(), 2);
        assert_eq!(&*normalized.events[0].id, "a");
        assert_eq!(&*normalized.events[1].id, "c");

        assert_eq!(normalized.skipped.len(), 2);
        assert_eq!(normalized.skipped[0].id, "b");
        assert_eq!(normalized.skipped[0].value, "\"yesterday-ish\"");
        assert_eq!(normalized.skipped[1].id, "4");
        assert_eq!(normalized.skipped[1].reason, "missing created_at");
        Ok(())
    }

    #[test]
    fn reject_policy_fails_on_first_bad_record() {
        let result = normalize_records(records(), TimestampPolicy::Reject);
        match result {
            Err(AnalyticsError::InvalidTimestamp { id, .. }) => assert_eq!(id, "b"),
            other => panic!("Expected invalid timestamp, got {other:?}"),
        }
    }

    #[test]
    fn reject_policy_accepts_clean_input() -> anyhow::Result<()> {
        let clean = vec![
            RawRecord::new("a", "2025-03-19T10:00:00Z"),
            RawRecord::new("b", 1742378400i64),
        ];
        let normalized = normalize_records(clean, TimestampPolicy::Reject)?;
        assert_eq!(normalized.events.len(), 2);
        assert!(normalized.skipped.is_empty());
        Ok(())
    }

    #[test]
    fn empty_input_is_not_an_error() -> anyhow::Result<()> {
        let normalized = normalize_records(vec![], TimestampPolicy::Reject)?;
        assert!(normalized.events.is_empty());
        assert!(normalized.skipped.is_empty());
        Ok(())
    }
}
