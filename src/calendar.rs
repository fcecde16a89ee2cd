use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Weekday names, Monday first.
pub const DAYS_OF_WEEK: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// The calendar date `offset` days after `reference`.
pub fn date_for_offset(reference: NaiveDate, offset: u32) -> NaiveDate {
    reference + Duration::days(i64::from(offset))
}

/// English name of the weekday `date` falls on.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => DAYS_OF_WEEK[0],
        Weekday::Tue => DAYS_OF_WEEK[1],
        Weekday::Wed => DAYS_OF_WEEK[2],
        Weekday::Thu => DAYS_OF_WEEK[3],
        Weekday::Fri => DAYS_OF_WEEK[4],
        Weekday::Sat => DAYS_OF_WEEK[5],
        Weekday::Sun => DAYS_OF_WEEK[6],
    }
}

pub fn day_id(offset: u32) -> String {
    format!("day-{offset}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn offset_crosses_month_and_year() {
        assert_eq!(date_for_offset(d(2025, 12, 31), 1), d(2026, 1, 1));
        assert_eq!(date_for_offset(d(2024, 2, 28), 1), d(2024, 2, 29));
        assert_eq!(date_for_offset(d(2025, 3, 10), 0), d(2025, 3, 10));
    }

    #[test]
    fn weekday_names_match_calendar() {
        assert_eq!(weekday_name(d(2025, 1, 6)), "Monday");
        assert_eq!(weekday_name(d(2025, 1, 11)), "Saturday");
        assert_eq!(weekday_name(d(2025, 1, 12)), "Sunday");
    }

    #[test]
    fn day_ids_use_offset() {
        assert_eq!(day_id(3), "day-3");
    }
}
