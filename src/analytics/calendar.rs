use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, Utc, Weekday};
use serde::Serialize;

use crate::error::AnalyticsError;

/// Timezone used to decide which calendar day an instant belongs to. Everything day-based in the
/// engine goes through this, so two computations with the same zone always agree on "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceZone {
    #[default]
    Utc,
    /// Zone of the running process. Only used when asked for explicitly.
    Local,
    Fixed(FixedOffset),
}

impl ReferenceZone {
    pub fn calendar_day(&self, instant: DateTime<Utc>) -> CalendarDay {
        CalendarDay(self.local_date(instant))
    }

    pub fn weekday(&self, instant: DateTime<Utc>) -> Weekday {
        self.at(instant).weekday()
    }

    /// The same instant seen on the wall clock of this zone.
    pub fn at(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            ReferenceZone::Utc => instant.fixed_offset(),
            ReferenceZone::Local => instant.with_timezone(&Local).fixed_offset(),
            ReferenceZone::Fixed(offset) => instant.with_timezone(offset),
        }
    }

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.at(instant).date_naive()
    }
}

impl Display for ReferenceZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceZone::Utc => write!(f, "utc"),
            ReferenceZone::Local => write!(f, "local"),
            ReferenceZone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for ReferenceZone {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "utc" | "z" => return Ok(ReferenceZone::Utc),
            "local" => return Ok(ReferenceZone::Local),
            _ => {}
        }
        parse_offset(trimmed)
            .map(ReferenceZone::Fixed)
            .ok_or_else(|| AnalyticsError::InvalidZone(s.to_string()))
    }
}

/// Accepts `+HH`, `+HHMM` and `+HH:MM` (and their negative versions).
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits = rest.replace(':', "");
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// (year, month, day) identity of an instant under a [ReferenceZone]. It's always derived, never
/// stored, and deriving it never touches the instant it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn of(instant: DateTime<Utc>, zone: ReferenceZone) -> Self {
        zone.calendar_day(instant)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Whole calendar days from `earlier` to `self`. Negative when `earlier` is actually later.
    pub fn days_since(&self, earlier: CalendarDay) -> i64 {
        (self.0 - earlier.0).num_days()
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl Display for CalendarDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc, Weekday};

    use super::{CalendarDay, ReferenceZone};

    #[test]
    fn calendar_day_depends_on_zone() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 15, 23, 30, 0).unwrap();

        let utc = CalendarDay::of(instant, ReferenceZone::Utc);
        assert_eq!((utc.year(), utc.month(), utc.day()), (2025, 3, 15));

        let east = CalendarDay::of(
            instant,
            ReferenceZone::Fixed(FixedOffset::east_opt(2 * 3600).unwrap()),
        );
        assert_eq!((east.year(), east.month(), east.day()), (2025, 3, 16));

        let west = CalendarDay::of(
            Utc.with_ymd_and_hms(2025, 1, 1, 1, 0, 0).unwrap(),
            ReferenceZone::Fixed(FixedOffset::west_opt(5 * 3600).unwrap()),
        );
        assert_eq!(west.to_string(), "2024-12-31");
    }

    #[test]
    fn equal_instants_give_equal_days() {
        let a = Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2025, 3, 15, 23, 59, 59).unwrap();
        assert_eq!(CalendarDay::of(a, ReferenceZone::Utc), CalendarDay::of(a, ReferenceZone::Utc));
        assert_eq!(CalendarDay::of(a, ReferenceZone::Utc), CalendarDay::of(b, ReferenceZone::Utc));
    }

    #[test]
    fn days_since_counts_calendar_days() {
        let today = CalendarDay::from(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let before = CalendarDay::from(NaiveDate::from_ymd_opt(2025, 2, 27).unwrap());
        assert_eq!(today.days_since(before), 2);
        assert_eq!(before.days_since(today), -2);
    }

    #[test]
    fn weekday_uses_zone() {
        // Saturday late evening in UTC, already Sunday at +03:00
        let instant = Utc.with_ymd_and_hms(2025, 3, 15, 22, 0, 0).unwrap();
        assert_eq!(ReferenceZone::Utc.weekday(instant), Weekday::Sat);
        assert_eq!(
            ReferenceZone::Fixed(FixedOffset::east_opt(3 * 3600).unwrap()).weekday(instant),
            Weekday::Sun
        );
    }

    #[test]
    fn at_keeps_the_instant() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 19, 2, 0, 0).unwrap();
        let west = ReferenceZone::Fixed(FixedOffset::west_opt(5 * 3600).unwrap()).at(instant);
        assert_eq!(west.to_rfc3339(), "2025-03-18T21:00:00-05:00");
        assert_eq!(west.to_utc(), instant);
        assert_eq!(ReferenceZone::Utc.at(instant).to_rfc3339(), "2025-03-19T02:00:00+00:00");
    }

    #[test]
    fn parse_reference_zone() {
        assert_eq!("UTC".parse::<ReferenceZone>().unwrap(), ReferenceZone::Utc);
        assert_eq!("local".parse::<ReferenceZone>().unwrap(), ReferenceZone::Local);
        assert_eq!(
            "+02:00".parse::<ReferenceZone>().unwrap(),
            ReferenceZone::Fixed(FixedOffset::east_opt(7200).unwrap())
        );
        assert_eq!(
            "-0530".parse::<ReferenceZone>().unwrap(),
            ReferenceZone::Fixed(FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap())
        );
        assert_eq!(
            "+09".parse::<ReferenceZone>().unwrap(),
            ReferenceZone::Fixed(FixedOffset::east_opt(9 * 3600).unwrap())
        );
        assert!("Europe/Kyiv".parse::<ReferenceZone>().is_err());
        assert!("+2:00".parse::<ReferenceZone>().is_err());
        assert!("+02:75".parse::<ReferenceZone>().is_err());
        assert!("+25:00".parse::<ReferenceZone>().is_err());
    }
}
