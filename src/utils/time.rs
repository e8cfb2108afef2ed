use chrono::{DateTime, Utc};

use crate::analytics::calendar::ReferenceZone;

/// This is the standard way of showing a moment to the user.
pub fn format_date_time(instant: DateTime<Utc>, zone: ReferenceZone) -> String {
    zone.at(instant).format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use crate::analytics::calendar::ReferenceZone;

    use super::format_date_time;

    #[test]
    fn formats_in_reference_zone() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 19, 23, 15, 0).unwrap();
        assert_eq!(format_date_time(instant, ReferenceZone::Utc), "2025-03-19 23:15");
        let east = ReferenceZone::Fixed(FixedOffset::east_opt(3600).unwrap());
        assert_eq!(format_date_time(instant, east), "2025-03-20 00:15");
    }
}
