use chrono::{DateTime, Duration, Timelike, Utc};

/// The rotation flips at 16:00 UTC each day.
const ROLLOVER_HOUR_UTC: u32 = 16;

/// Date key of the rotation entry active at `now`, formatted `YY-MM-DD` as
/// the cycles table keys its rows. Before 16:00 UTC the previous day's entry
/// is still active.
pub fn quest_date(now: DateTime<Utc>) -> String {
    let effective = if now.hour() < ROLLOVER_HOUR_UTC {
        now - Duration::days(1)
    } else {
        now
    };
    effective.format("%y-%m-%d").to_string()
}

/// Date key of the currently active rotation entry.
pub fn todays_quest_date() -> String {
    quest_date(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn before_rollover_uses_previous_day() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 15, 59, 59).unwrap();
        assert_eq!(quest_date(now), "26-02-28");
    }

    #[test]
    fn at_rollover_uses_current_day() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 16, 0, 0).unwrap();
        assert_eq!(quest_date(now), "26-03-01");
    }

    #[test]
    fn rollover_crosses_year_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 2, 0, 0).unwrap();
        assert_eq!(quest_date(now), "25-12-31");
    }

    #[test]
    fn two_digit_fields_are_zero_padded() {
        let now = Utc.with_ymd_and_hms(2026, 8, 5, 20, 0, 0).unwrap();
        assert_eq!(quest_date(now), "26-08-05");
    }
}
