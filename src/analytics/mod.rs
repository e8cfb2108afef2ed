//! Activity analytics over a materialized list of events.
//!
//! Every operation here is a pure function of the events and an [EvaluationContext]. Nothing is
//! cached between calls and the events are only borrowed. The two time notions in use are kept
//! apart on purpose:
//!  - [streak] works with [calendar::CalendarDay]s, so midnight in the reference zone matters.
//!  - [window] works with raw instants in a sliding 168 hour window.

pub mod calendar;
pub mod streak;
pub mod weekday;
pub mod window;

use calendar::{CalendarDay, ReferenceZone};
use chrono::{DateTime, Utc};
use serde::Serialize;
use streak::current_streak;
use tracing::{debug, instrument};
use weekday::{weekday_histogram, WeekdayHistogram};
use window::trailing_window_count;

use crate::{
    events::normalize::{Normalized, SkippedRecord},
    utils::clock::Clock,
};

/// Anything that happened at a known instant.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
}

impl Timestamped for DateTime<Utc> {
    fn created_at(&self) -> DateTime<Utc> {
        *self
    }
}

impl<T: Timestamped> Timestamped for &T {
    fn created_at(&self) -> DateTime<Utc> {
        (*self).created_at()
    }
}

/// The instant the metrics are computed for and the zone that decides calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationContext {
    pub now: DateTime<Utc>,
    pub zone: ReferenceZone,
}

impl EvaluationContext {
    pub fn new(now: DateTime<Utc>, zone: ReferenceZone) -> Self {
        Self { now, zone }
    }

    pub fn from_clock(clock: &dyn Clock, zone: ReferenceZone) -> Self {
        Self::new(clock.time(), zone)
    }

    pub fn today(&self) -> CalendarDay {
        self.zone.calendar_day(self.now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub total: usize,
    pub this_week: usize,
    pub streak: usize,
    pub weekday_histogram: WeekdayHistogram,
}

pub fn total<E>(events: &[E]) -> usize {
    events.len()
}

/// Runs every operation over the same events.
#[instrument(skip(events), fields(events = events.len()))]
pub fn compute_metrics<E: Timestamped>(events: &[E], context: &EvaluationContext) -> Metrics {
    let metrics = Metrics {
        total: total(events),
        this_week: trailing_window_count(events, context.now),
        streak: current_streak(events, context),
        weekday_histogram: weekday_histogram(events, context.zone),
    };
    debug!("Computed {metrics:?}");
    metrics
}

/// [Metrics] together with what a caller needs to trust them: the records that had to be left
/// out and when the latest activity happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub metrics: Metrics,
    pub last_activity: Option<DateTime<Utc>>,
    pub skipped: Vec<SkippedRecord>,
}

pub fn build_report(normalized: Normalized, context: &EvaluationContext) -> Report {
    let metrics = compute_metrics(&normalized.events, context);
    let last_activity = normalized.events.iter().map(|v| v.created_at).max();
    Report {
        metrics,
        last_activity,
        skipped: normalized.skipped,
    }
}
