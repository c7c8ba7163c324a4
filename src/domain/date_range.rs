use crate::domain::validator::{apply_preset, clamp_end_to_today, clamp_start_for_max_range};
use crate::domain::{DaysOfWeek, enumerate_weekdays_in_range, has_usable_day, weekday_index};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two concurrent date ranges a filter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeSlot {
    FirstDateRange,
    SecondDateRange,
}

impl RangeSlot {
    pub const ALL: [RangeSlot; 2] = [RangeSlot::FirstDateRange, RangeSlot::SecondDateRange];

    pub fn key(self) -> &'static str {
        match self {
            RangeSlot::FirstDateRange => "firstDateRange",
            RangeSlot::SecondDateRange => "secondDateRange",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            RangeSlot::FirstDateRange => "Date Range",
            RangeSlot::SecondDateRange => "Compare To",
        }
    }

    pub fn other(self) -> RangeSlot {
        match self {
            RangeSlot::FirstDateRange => RangeSlot::SecondDateRange,
            RangeSlot::SecondDateRange => RangeSlot::FirstDateRange,
        }
    }
}

impl fmt::Display for RangeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Inclusive date range plus the weekdays it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeFilter {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_of_the_week: DaysOfWeek,
    /// Preset shortcut that produced the dates, if any. Not authoritative
    /// once the dates are edited directly.
    pub lookback_days: Option<u32>,
}

impl DateRangeFilter {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            days_of_the_week: DaysOfWeek::all(),
            lookback_days: None,
        }
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// The last `lookback_days` days ending today.
    pub fn from_lookback(lookback_days: u32, today: NaiveDate) -> Self {
        let (start_date, end_date) = apply_preset(lookback_days, today);
        Self {
            start_date,
            end_date,
            days_of_the_week: DaysOfWeek::all(),
            lookback_days: Some(lookback_days.max(1)),
        }
    }

    pub fn with_days(mut self, days_of_the_week: DaysOfWeek) -> Self {
        self.days_of_the_week = days_of_the_week;
        self
    }

    pub fn is_single_day(&self) -> bool {
        self.start_date == self.end_date
    }

    /// Number of calendar days covered, counting both ends.
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Dates in the range that fall on an included weekday.
    pub fn selected_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |date| *date <= self.end_date)
            .filter(move |date| {
                self.days_of_the_week
                    .is_included(weekday_index(*date))
            })
    }

    /// True when at least one included weekday falls inside the range.
    pub fn has_usable_day(&self) -> bool {
        let live = enumerate_weekdays_in_range(self.start_date, self.end_date);
        has_usable_day(&self.days_of_the_week, &live)
    }

    /// Enforces the committed-filter range invariants: no future end, start
    /// not after end, span no longer than `max_days`. Weekday selection is
    /// left alone; an empty selection is flagged elsewhere, not corrected.
    pub fn normalized(mut self, today: NaiveDate, max_days: u32) -> Self {
        self.end_date = clamp_end_to_today(self.end_date, today);
        let start_date = clamp_start_for_max_range(self.end_date, self.start_date, max_days);
        if start_date != self.start_date {
            self.start_date = start_date;
            self.lookback_days = self.lookback_days.map(|_| max_days.max(1));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WeekdayGroup;
    use crate::infrastructure::test_utils::date;

    #[test]
    fn test_from_lookback() {
        let filter = DateRangeFilter::from_lookback(7, date(2023, 5, 15));

        assert_eq!(filter.start_date, date(2023, 5, 9));
        assert_eq!(filter.end_date, date(2023, 5, 15));
        assert_eq!(filter.lookback_days, Some(7));
        assert_eq!(filter.span_days(), 7);
    }

    #[test]
    fn test_selected_dates_respects_weekdays() {
        // Monday 2023-03-06 .. Sunday 2023-03-12
        let filter = DateRangeFilter::new(date(2023, 3, 6), date(2023, 3, 12))
            .with_days(DaysOfWeek::only(WeekdayGroup::Weekends));

        let selected: Vec<_> = filter.selected_dates().collect();
        assert_eq!(selected, vec![date(2023, 3, 11), date(2023, 3, 12)]);
    }

    #[test]
    fn test_has_usable_day() {
        let weekend_only = DaysOfWeek::only(WeekdayGroup::Weekends);
        let weekdays_range =
            DateRangeFilter::new(date(2023, 3, 6), date(2023, 3, 7)).with_days(weekend_only);
        assert!(!weekdays_range.has_usable_day());

        let full_week =
            DateRangeFilter::new(date(2023, 3, 6), date(2023, 3, 12)).with_days(weekend_only);
        assert!(full_week.has_usable_day());
    }

    #[test]
    fn test_normalized_clamps_future_end_and_long_span() {
        let today = date(2023, 5, 15);
        let filter = DateRangeFilter::new(date(2023, 1, 1), date(2023, 6, 1)).normalized(today, 30);

        assert_eq!(filter.end_date, today);
        assert_eq!(filter.start_date, date(2023, 4, 16));
        assert_eq!(filter.span_days(), 30);
    }

    #[test]
    fn test_normalized_lookback_follows_clamped_span() {
        let today = date(2023, 5, 15);
        let clamped = DateRangeFilter::from_lookback(30, today).normalized(today, 7);
        assert_eq!(clamped.span_days(), 7);
        assert_eq!(clamped.lookback_days, Some(7));

        let kept = DateRangeFilter::from_lookback(7, today).normalized(today, 30);
        assert_eq!(kept.lookback_days, Some(7));
    }

    #[test]
    fn test_normalized_keeps_valid_range() {
        let filter = DateRangeFilter::new(date(2023, 5, 1), date(2023, 5, 7));
        assert_eq!(filter.clone().normalized(date(2023, 5, 15), 90), filter);
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let filter = DateRangeFilter::single_day(date(2023, 1, 1));
        let json = serde_json::to_value(&filter).unwrap();

        assert_eq!(json["startDate"], "2023-01-01");
        assert_eq!(json["endDate"], "2023-01-01");
        assert!(json["daysOfTheWeek"].is_array());
        assert!(json["lookbackDays"].is_null());
    }
}
