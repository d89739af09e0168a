use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Parse an ISO `YYYY-MM-DD` day key.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Format a date as an ISO `YYYY-MM-DD` day key.
pub fn format_day(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// The Sunday starting the week containing `d` (same day if `d` is Sunday).
pub fn week_start(d: NaiveDate) -> NaiveDate {
    d - Days::new(d.weekday().num_days_from_sunday() as u64)
}

/// The Saturday ending the week containing `d` (same day if `d` is Saturday).
pub fn week_end(d: NaiveDate) -> NaiveDate {
    week_start(d) + Days::new(6)
}

/// Cells from the week's Sunday through `d`, inclusive (Sun = 1 .. Sat = 7).
pub fn days_from_sunday(d: NaiveDate) -> i64 {
    d.weekday().num_days_from_sunday() as i64 + 1
}

/// Cells from `d` through the strictly next Saturday, inclusive.
/// A Saturday yields 8 (the following week's Saturday); resize growth is
/// refused on that boundary before this value matters.
pub fn days_to_saturday(d: NaiveDate) -> i64 {
    let ahead = match d.weekday() {
        Weekday::Sat => 7,
        w => 6 - w.num_days_from_sunday() as i64,
    };
    ahead + 1
}

/// First day of the month containing `d`.
pub fn month_start(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

/// Last day of the month containing `d`.
pub fn month_end(d: NaiveDate) -> NaiveDate {
    let next = if d.month() == 12 {
        NaiveDate::from_ymd_opt(d.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(d.year(), d.month() + 1, 1)
    };
    match next {
        Some(n) => n - Days::new(1),
        None => d,
    }
}

/// The Sunday-aligned weeks covering the month containing `month_day`.
/// Each week is exactly 7 days; the first may begin in the previous month
/// and the last may run into the next.
pub fn weeks_in_month(month_day: NaiveDate) -> Vec<[NaiveDate; 7]> {
    let grid_start = week_start(month_start(month_day));
    let grid_end = week_end(month_end(month_day));

    let mut weeks = Vec::new();
    let mut day = grid_start;
    while day <= grid_end {
        let mut week = [day; 7];
        for slot in week.iter_mut() {
            *slot = day;
            day = day + Days::new(1);
        }
        weeks.push(week);
    }
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn iso_round_trip() {
        let d = day("2024-06-03");
        assert_eq!(parse_day(&format_day(d)), Some(d));
        assert_eq!(parse_day("not-a-date"), None);
        assert_eq!(parse_day("2024-13-40"), None);
    }

    #[test]
    fn week_bounds() {
        // 2024-06-05 is a Wednesday
        assert_eq!(week_start(day("2024-06-05")), day("2024-06-02"));
        assert_eq!(week_end(day("2024-06-05")), day("2024-06-08"));
        // Sunday and Saturday are their own bounds
        assert_eq!(week_start(day("2024-06-02")), day("2024-06-02"));
        assert_eq!(week_end(day("2024-06-08")), day("2024-06-08"));
    }

    #[test]
    fn days_from_sunday_counts_cells() {
        assert_eq!(days_from_sunday(day("2024-06-02")), 1); // Sunday
        assert_eq!(days_from_sunday(day("2024-06-05")), 4); // Wednesday
        assert_eq!(days_from_sunday(day("2024-06-08")), 7); // Saturday
    }

    #[test]
    fn days_to_saturday_counts_cells() {
        assert_eq!(days_to_saturday(day("2024-06-05")), 4); // Wed..Sat
        assert_eq!(days_to_saturday(day("2024-06-02")), 7); // Sun..Sat
        assert_eq!(days_to_saturday(day("2024-06-08")), 8); // Sat -> next Sat
    }

    #[test]
    fn month_bounds() {
        assert_eq!(month_start(day("2024-06-15")), day("2024-06-01"));
        assert_eq!(month_end(day("2024-06-15")), day("2024-06-30"));
        assert_eq!(month_end(day("2024-02-10")), day("2024-02-29")); // leap
        assert_eq!(month_end(day("2024-12-10")), day("2024-12-31"));
    }

    #[test]
    fn weeks_cover_month_and_align_to_sundays() {
        let weeks = weeks_in_month(day("2024-06-15"));
        // June 2024: Sat the 1st through Sun the 30th -> 6 week rows
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0][0], day("2024-05-26"));
        assert_eq!(weeks[0][6], day("2024-06-01"));
        assert_eq!(weeks[5][6], day("2024-07-06"));
        for week in &weeks {
            assert_eq!(days_from_sunday(week[0]), 1);
            assert_eq!((week[6] - week[0]).num_days(), 6);
        }
    }
}
