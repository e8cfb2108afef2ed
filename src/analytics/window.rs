use chrono::{DateTime, Duration, Utc};

use super::Timestamped;

/// Length of the trailing window. This is a sliding 168 hour window and not "the last 7 calendar
/// days", so it doesn't care about the reference zone at all.
pub const TRAILING_WINDOW: Duration = Duration::hours(7 * 24);

/// Counts events with an instant in `[now - 168h, now]`.
pub fn trailing_window_count<E: Timestamped>(events: &[E], now: DateTime<Utc>) -> usize {
    let lower_bound = now - TRAILING_WINDOW;
    events
        .iter()
        .map(|v| v.created_at())
        .filter(|v| lower_bound <= *v && *v <= now)
        .count()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::{trailing_window_count, TRAILING_WINDOW};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 19, 15, 30, 0).unwrap()
    }

    #[test]
    fn empty_input_counts_nothing() {
        assert_eq!(trailing_window_count::<DateTime<Utc>>(&[], now()), 0);
    }

    #[test]
    fn lower_bound_is_inclusive() {
        let at_bound = now() - Duration::hours(168);
        assert_eq!(trailing_window_count(&[at_bound], now()), 1);

        let past_bound = at_bound - Duration::seconds(1);
        assert_eq!(trailing_window_count(&[past_bound], now()), 0);
    }

    #[test]
    fn window_slides_with_the_instant_not_the_day() {
        // Same calendar day as the lower bound, but a few hours earlier
        let early = now() - TRAILING_WINDOW - Duration::hours(3);
        let late = now() - TRAILING_WINDOW + Duration::hours(3);
        assert_eq!(trailing_window_count(&[early, late], now()), 1);
    }

    #[test]
    fn future_events_are_outside() {
        let events = [now(), now() + Duration::seconds(1)];
        assert_eq!(trailing_window_count(&events, now()), 1);
    }

    #[test]
    fn counts_every_event_in_range() {
        let events = (0..20)
            .map(|v| now() - Duration::hours(v * 12))
            .collect::<Vec<_>>();
        // 0h, 12h, ..., 168h are inside
        assert_eq!(trailing_window_count(&events, now()), 15);
    }
}
