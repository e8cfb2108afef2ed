use serde::{ser::SerializeSeq, Serialize, Serializer};

use super::{calendar::ReferenceZone, Timestamped};

/// Short, locale independent labels. Translating them is up to whoever renders the histogram.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Event counts per weekday, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdayHistogram {
    counts: [usize; 7],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekdayCount {
    pub day: &'static str,
    pub count: usize,
}

impl WeekdayHistogram {
    pub fn counts(&self) -> [usize; 7] {
        self.counts
    }

    /// Count for a weekday index, 0 being Sunday.
    pub fn get(&self, index: usize) -> Option<usize> {
        self.counts.get(index).copied()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn entries(&self) -> impl Iterator<Item = WeekdayCount> + '_ {
        WEEKDAY_LABELS
            .into_iter()
            .zip(self.counts.iter())
            .map(|(day, count)| WeekdayCount { day, count: *count })
    }
}

impl Serialize for WeekdayHistogram {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(WEEKDAY_LABELS.len()))?;
        for entry in self.entries() {
            seq.serialize_element(&entry)?;
        }
        seq.end()
    }
}

/// Tallies events by the weekday of their instant in `zone`.
pub fn weekday_histogram<E: Timestamped>(events: &[E], zone: ReferenceZone) -> WeekdayHistogram {
    let mut counts = [0usize; 7];
    for event in events {
        let index = zone.weekday(event.created_at()).num_days_from_sunday() as usize;
        counts[index] += 1;
    }
    WeekdayHistogram { counts }
}
