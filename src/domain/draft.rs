use crate::domain::{DateRangeFilter, DaysOfWeek};
use chrono::NaiveDate;
use serde::Serialize;

/// Subset of filter fields to merge into a draft. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub days_of_the_week: Option<DaysOfWeek>,
    pub lookback_days: Option<Option<u32>>,
}

impl FilterPatch {
    pub fn start_date(date: NaiveDate) -> Self {
        Self {
            start_date: Some(date),
            ..Self::default()
        }
    }

    pub fn end_date(date: NaiveDate) -> Self {
        Self {
            end_date: Some(date),
            ..Self::default()
        }
    }

    pub fn days(days: DaysOfWeek) -> Self {
        Self {
            days_of_the_week: Some(days),
            ..Self::default()
        }
    }

    pub fn touches_dates(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

/// Working copy of a committed filter, owned by one open editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    filter: DateRangeFilter,
}

impl Draft {
    pub fn seed(committed: &DateRangeFilter) -> Self {
        Self {
            filter: committed.clone(),
        }
    }

    /// Merges `patch` into a new draft. Nothing is re-derived here; callers
    /// run the range clamps themselves after touching the dates.
    pub fn patch(&self, patch: FilterPatch) -> Self {
        let mut filter = self.filter.clone();
        if let Some(start_date) = patch.start_date {
            filter.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            filter.end_date = end_date;
        }
        if let Some(days) = patch.days_of_the_week {
            filter.days_of_the_week = days;
        }
        if let Some(lookback_days) = patch.lookback_days {
            filter.lookback_days = lookback_days;
        }
        Self { filter }
    }

    pub fn is_dirty(&self, committed: Option<&DateRangeFilter>) -> bool {
        committed != Some(&self.filter)
    }

    pub fn filter(&self) -> &DateRangeFilter {
        &self.filter
    }

    pub fn into_filter(self) -> DateRangeFilter {
        self.filter
    }

    pub fn labels(&self) -> DisplayLabels {
        reformat_for_display(&self.filter)
    }
}

/// Read-only summary of a filter as shown on the closed control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLabels {
    pub main_label: String,
    pub secondary_label: String,
}

/// Renders a date the way the control shows it, e.g. `1/4/2023`.
pub fn render_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

pub fn reformat_for_display(filter: &DateRangeFilter) -> DisplayLabels {
    if filter.is_single_day() {
        DisplayLabels {
            main_label: render_date(filter.end_date),
            secondary_label: String::new(),
        }
    } else {
        DisplayLabels {
            main_label: format!(
                "{} - {}",
                render_date(filter.start_date),
                render_date(filter.end_date)
            ),
            secondary_label: filter.days_of_the_week.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WeekdayGroup;
    use crate::infrastructure::test_utils::date;

    fn committed() -> DateRangeFilter {
        DateRangeFilter::new(date(2023, 1, 1), date(2023, 1, 7))
    }

    #[test]
    fn test_seed_is_clean() {
        let committed = committed();
        let draft = Draft::seed(&committed);

        assert_eq!(draft.filter(), &committed);
        assert!(!draft.is_dirty(Some(&committed)));
        assert!(draft.is_dirty(None));
    }

    #[test]
    fn test_patch_merges_only_given_fields() {
        let committed = committed();
        let draft = Draft::seed(&committed).patch(FilterPatch::end_date(date(2023, 1, 5)));

        assert_eq!(draft.filter().start_date, date(2023, 1, 1));
        assert_eq!(draft.filter().end_date, date(2023, 1, 5));
        assert_eq!(draft.filter().days_of_the_week, DaysOfWeek::all());
        assert!(draft.is_dirty(Some(&committed)));
    }

    #[test]
    fn test_patch_does_not_touch_original() {
        let committed = committed();
        let draft = Draft::seed(&committed);
        let patched = draft.patch(FilterPatch::days(DaysOfWeek::none()));

        assert_eq!(draft.filter(), &committed);
        assert_ne!(patched, draft);
    }

    #[test]
    fn test_patch_does_not_clamp() {
        let draft = Draft::seed(&committed()).patch(FilterPatch::start_date(date(2023, 2, 1)));

        assert!(draft.filter().start_date > draft.filter().end_date);
    }

    #[test]
    fn test_patch_back_to_committed_is_clean() {
        let committed = committed();
        let draft = Draft::seed(&committed)
            .patch(FilterPatch::days(DaysOfWeek::none()))
            .patch(FilterPatch::days(DaysOfWeek::all()));

        assert!(!draft.is_dirty(Some(&committed)));
    }

    #[test]
    fn test_labels_for_single_day() {
        let labels = reformat_for_display(&DateRangeFilter::single_day(date(2023, 1, 4)));

        assert_eq!(labels.main_label, "1/4/2023");
        assert_eq!(labels.secondary_label, "");
    }

    #[test]
    fn test_labels_for_range() {
        let filter = DateRangeFilter::new(date(2023, 1, 4), date(2023, 1, 10))
            .with_days(DaysOfWeek::only(WeekdayGroup::Weekdays));
        let labels = Draft::seed(&filter).labels();

        assert_eq!(labels.main_label, "1/4/2023 - 1/10/2023");
        assert_eq!(labels.secondary_label, "Weekdays");
    }

    #[test]
    fn test_single_day_label_ignores_weekdays() {
        let filter = DateRangeFilter::single_day(date(2023, 3, 6))
            .with_days(DaysOfWeek::only(WeekdayGroup::Weekends));

        assert_eq!(reformat_for_display(&filter).secondary_label, "");
    }
}
