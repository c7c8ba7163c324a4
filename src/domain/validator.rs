use crate::domain::{DaysOfWeek, weekday_index};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

/// Validation states a date-range edit can run into. None of these are
/// errors: they are ignored, clamped, or surfaced as an advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterIssue {
    /// Empty or unparseable date input; the previous value is kept.
    EmptyDateInput,
    /// Start after end, end in the future, or a span over the maximum;
    /// resolved by clamping.
    InvalidRange,
    /// No included weekday occurs in the chosen span. Blocks apply.
    NoUsableDay,
}

/// Parses an ISO `YYYY-MM-DD` input value. Blank or malformed input yields `None`.
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Distinct weekday indices occurring in the closed interval `[start, end]`.
/// Empty when `start > end`.
pub fn enumerate_weekdays_in_range(start: NaiveDate, end: NaiveDate) -> BTreeSet<usize> {
    // any seven consecutive days cover every weekday
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .take(7)
        .map(weekday_index)
        .collect()
}

pub fn has_usable_day(days: &DaysOfWeek, live_weekdays: &BTreeSet<usize>) -> bool {
    live_weekdays.iter().any(|&day| days.is_included(day))
}

/// Start date to use for a range ending at `end`.
///
/// A start after the end collapses to the end. A span longer than `max_days`
/// keeps the end and moves the start to `end - max_days + 1`.
pub fn clamp_start_for_max_range(
    end: NaiveDate,
    requested_start: NaiveDate,
    max_days: u32,
) -> NaiveDate {
    if requested_start > end {
        return end;
    }

    let max_days = i64::from(max_days.max(1));
    if (end - requested_start).num_days() + 1 > max_days {
        end - Duration::days(max_days - 1)
    } else {
        requested_start
    }
}

/// No future end dates.
pub fn clamp_end_to_today(end: NaiveDate, today: NaiveDate) -> NaiveDate {
    end.min(today)
}

/// `days` before `date`, saturating at the earliest representable date.
pub fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_sub_signed(Duration::days(days)).unwrap_or(NaiveDate::MIN)
}

/// `(start, end)` for a "last N days" preset, always anchored to today.
pub fn apply_preset(lookback_days: u32, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let back = i64::from(lookback_days.max(1)) - 1;
    (days_before(today, back), today)
}

/// First range problem found between `start` and `end`, if any.
pub fn range_issue(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    max_days: u32,
) -> Option<FilterIssue> {
    let too_long = (end - start).num_days() + 1 > i64::from(max_days.max(1));
    if start > end || end > today || too_long {
        Some(FilterIssue::InvalidRange)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WeekdayGroup;
    use crate::infrastructure::test_utils::date;

    #[test]
    fn test_parse_date_input() {
        assert_eq!(parse_date_input("2023-01-10"), Some(date(2023, 1, 10)));
        assert_eq!(parse_date_input(" 2023-01-10 "), Some(date(2023, 1, 10)));
        assert_eq!(parse_date_input(""), None);
        assert_eq!(parse_date_input("   "), None);
        assert_eq!(parse_date_input("2023-02-30"), None);
        assert_eq!(parse_date_input("01/10/2023"), None);
    }

    #[test]
    fn test_preset_past_calendar_start_saturates() {
        let today = date(2023, 5, 15);
        assert_eq!(days_before(today, 14), date(2023, 5, 1));
        assert_eq!(days_before(today, i64::from(u32::MAX)), NaiveDate::MIN);
        assert_eq!(apply_preset(200_000_000, today), (NaiveDate::MIN, today));
    }

    #[test]
    fn test_enumerate_short_range() {
        // Monday and Tuesday
        let live = enumerate_weekdays_in_range(date(2023, 3, 6), date(2023, 3, 7));
        assert_eq!(live.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_enumerate_single_day() {
        // Sunday
        let live = enumerate_weekdays_in_range(date(2023, 1, 1), date(2023, 1, 1));
        assert_eq!(live.into_iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_enumerate_week_or_longer_covers_every_day() {
        let week = enumerate_weekdays_in_range(date(2023, 1, 4), date(2023, 1, 10));
        assert_eq!(week.len(), 7);

        let quarter = enumerate_weekdays_in_range(date(2023, 1, 1), date(2023, 3, 31));
        assert_eq!(quarter.len(), 7);
    }

    #[test]
    fn test_enumerate_is_non_empty_and_bounded_for_valid_ranges() {
        let today = date(2023, 5, 15);
        for offset in 0..20 {
            let end = today - Duration::days(offset);
            for length in 0..10 {
                let start = end - Duration::days(length);
                let live = enumerate_weekdays_in_range(start, end);
                assert!(!live.is_empty());
                assert!(live.iter().all(|&day| day <= 6));
                assert_eq!(live.len(), (length as usize + 1).min(7));
            }
        }
    }

    #[test]
    fn test_enumerate_inverted_range_is_empty() {
        assert!(enumerate_weekdays_in_range(date(2023, 1, 10), date(2023, 1, 1)).is_empty());
    }

    #[test]
    fn test_has_usable_day() {
        let weekend = DaysOfWeek::only(WeekdayGroup::Weekends);
        let monday_tuesday = enumerate_weekdays_in_range(date(2023, 3, 6), date(2023, 3, 7));
        assert!(!has_usable_day(&weekend, &monday_tuesday));

        let through_saturday = enumerate_weekdays_in_range(date(2023, 3, 6), date(2023, 3, 11));
        assert!(has_usable_day(&weekend, &through_saturday));

        assert!(!has_usable_day(&DaysOfWeek::all(), &BTreeSet::new()));
    }

    #[test]
    fn test_clamp_start_after_end_collapses_to_end() {
        let end = date(2023, 1, 10);
        assert_eq!(clamp_start_for_max_range(end, date(2023, 1, 12), 7), end);
    }

    #[test]
    fn test_clamp_start_keeps_range_within_max() {
        let end = date(2023, 1, 10);
        assert_eq!(clamp_start_for_max_range(end, date(2023, 1, 1), 7), date(2023, 1, 4));
        assert_eq!(clamp_start_for_max_range(end, date(2023, 1, 4), 7), date(2023, 1, 4));
        assert_eq!(clamp_start_for_max_range(end, date(2023, 1, 8), 7), date(2023, 1, 8));
    }

    #[test]
    fn test_clamp_start_result_is_always_bounded() {
        let end = date(2023, 6, 30);
        for max_days in [1, 2, 7, 31, 90] {
            for offset in -5..120 {
                let start = end - Duration::days(offset);
                let clamped = clamp_start_for_max_range(end, start, max_days);
                assert!(clamped <= end);
                assert!((end - clamped).num_days() <= i64::from(max_days));
            }
        }
    }

    #[test]
    fn test_clamp_end_to_today() {
        let today = date(2023, 5, 15);
        assert_eq!(clamp_end_to_today(date(2023, 6, 1), today), today);
        assert_eq!(clamp_end_to_today(date(2023, 5, 1), today), date(2023, 5, 1));
    }

    #[test]
    fn test_apply_preset_anchors_to_today() {
        let today = date(2023, 5, 15);
        assert_eq!(apply_preset(7, today), (date(2023, 5, 9), today));
        assert_eq!(apply_preset(1, today), (today, today));
        assert_eq!(apply_preset(0, today), (today, today));
    }

    #[test]
    fn test_range_issue() {
        let today = date(2023, 5, 15);
        assert_eq!(range_issue(date(2023, 5, 1), date(2023, 5, 7), today, 90), None);
        assert_eq!(
            range_issue(date(2023, 5, 8), date(2023, 5, 7), today, 90),
            Some(FilterIssue::InvalidRange)
        );
        assert_eq!(
            range_issue(date(2023, 5, 1), date(2023, 5, 16), today, 90),
            Some(FilterIssue::InvalidRange)
        );
        assert_eq!(
            range_issue(date(2023, 5, 1), date(2023, 5, 8), today, 7),
            Some(FilterIssue::InvalidRange)
        );
    }
}
