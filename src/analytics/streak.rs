use std::collections::BTreeSet;

use tracing::trace;

use super::{calendar::CalendarDay, EvaluationContext, Timestamped};

/// Length of the run of consecutive active days that ends today or yesterday.
///
/// Events are first reduced to their distinct [CalendarDay]s, so any number of events on one day
/// count once. If the most recent active day is older than yesterday the streak is already broken
/// and the result is 0, whatever happened before that.
pub fn current_streak<E: Timestamped>(events: &[E], context: &EvaluationContext) -> usize {
    let days = events
        .iter()
        .map(|v| context.zone.calendar_day(v.created_at()))
        .collect::<BTreeSet<CalendarDay>>();

    let mut days = days.into_iter().rev();
    let Some(most_recent) = days.next() else {
        return 0;
    };

    let today = context.today();
    trace!("Most recent active day {most_recent}, today {today}");
    if today.days_since(most_recent) > 1 {
        return 0;
    }

    let mut streak = 1;
    let mut previous = most_recent;
    for day in days {
        if previous.days_since(day) != 1 {
            break;
        }
        streak += 1;
        previous = day;
    }
    streak
}
