use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Short names indexed by weekday index (0 = Sunday).
pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const WEEKDAYS: [usize; 5] = [1, 2, 3, 4, 5];
pub const WEEKENDS: [usize; 2] = [6, 0];

/// Monday-first order used when listing days in labels and checkboxes.
pub const DISPLAY_ORDER: [usize; 7] = [1, 2, 3, 4, 5, 6, 0];

pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayGroup {
    Weekdays,
    Weekends,
}

impl WeekdayGroup {
    pub fn days(self) -> &'static [usize] {
        match self {
            WeekdayGroup::Weekdays => &WEEKDAYS,
            WeekdayGroup::Weekends => &WEEKENDS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeekdayGroup::Weekdays => "Weekdays",
            WeekdayGroup::Weekends => "Weekends",
        }
    }
}

/// Display state of a group checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupState {
    Unchecked,
    Indeterminate,
    Checked,
}

/// Included/excluded flag for each weekday, indexed 0 = Sunday .. 6 = Saturday.
///
/// Every mutator returns a new value so callers can detect changes by
/// comparing the old and new sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DaysOfWeek([bool; 7]);

impl Default for DaysOfWeek {
    fn default() -> Self {
        Self::all()
    }
}

impl DaysOfWeek {
    pub fn all() -> Self {
        Self([true; 7])
    }

    pub fn none() -> Self {
        Self([false; 7])
    }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut flags = [false; 7];
        for index in indices {
            if let Some(flag) = flags.get_mut(index) {
                *flag = true;
            }
        }
        Self(flags)
    }

    pub fn only(group: WeekdayGroup) -> Self {
        Self::from_indices(group.days().iter().copied())
    }

    pub fn is_included(&self, day: usize) -> bool {
        self.0.get(day).copied().unwrap_or(false)
    }

    /// Included weekday indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..7).filter(move |&day| self.0[day])
    }

    pub fn all_false(&self, subset: &[usize]) -> bool {
        subset.iter().all(|&day| !self.is_included(day))
    }

    pub fn all_true(&self, subset: &[usize]) -> bool {
        subset.iter().all(|&day| self.is_included(day))
    }

    /// If every day in `subset` is included, excludes them all; otherwise
    /// includes them all.
    pub fn toggle_group(self, subset: &[usize]) -> Self {
        let value = !self.all_true(subset);
        subset
            .iter()
            .fold(self, |days, &day| days.set_day(day, value))
    }

    pub fn set_day(self, day: usize, value: bool) -> Self {
        let mut flags = self.0;
        if let Some(flag) = flags.get_mut(day) {
            *flag = value;
        }
        Self(flags)
    }

    pub fn toggle_day(self, day: usize) -> Self {
        self.set_day(day, !self.is_included(day))
    }

    pub fn group_state(&self, group: WeekdayGroup) -> GroupState {
        let subset = group.days();
        if self.all_true(subset) {
            GroupState::Checked
        } else if self.all_false(subset) {
            GroupState::Unchecked
        } else {
            GroupState::Indeterminate
        }
    }

    /// Short description of the included days, e.g. "Weekdays" or "Sat, Sun".
    pub fn label(&self) -> String {
        if *self == Self::all() {
            return "Every day".to_string();
        }
        if *self == Self::only(WeekdayGroup::Weekdays) {
            return "Weekdays".to_string();
        }
        if *self == Self::none() {
            return "No days".to_string();
        }

        DISPLAY_ORDER
            .iter()
            .filter(|&&day| self.is_included(day))
            .map(|&day| DAY_NAMES[day])
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_true_and_all_false_on_subsets() {
        let days = DaysOfWeek::only(WeekdayGroup::Weekends);

        assert!(days.all_true(&WEEKENDS));
        assert!(days.all_false(&WEEKDAYS));
        assert!(!days.all_true(&WEEKDAYS));
        assert!(!days.all_false(&WEEKENDS));
    }

    #[test]
    fn test_toggle_group_sets_all_when_partially_selected() {
        let days = DaysOfWeek::none().set_day(2, true);

        let toggled = days.toggle_group(&WEEKDAYS);
        assert!(toggled.all_true(&WEEKDAYS));
        assert!(toggled.all_false(&WEEKENDS));
    }

    #[test]
    fn test_toggle_group_clears_when_fully_selected() {
        let toggled = DaysOfWeek::all().toggle_group(&WEEKENDS);

        assert!(toggled.all_false(&WEEKENDS));
        assert!(toggled.all_true(&WEEKDAYS));
    }

    #[test]
    fn test_toggle_group_twice_restores_flags_from_full_group() {
        let original = DaysOfWeek::only(WeekdayGroup::Weekdays).set_day(0, true);
        let once = original.toggle_group(&WEEKDAYS);
        let twice = once.toggle_group(&WEEKDAYS);

        assert!(once.all_false(&WEEKDAYS));
        assert_eq!(twice, original);
    }

    #[test]
    fn test_toggle_group_twice_from_empty_group() {
        let original = DaysOfWeek::only(WeekdayGroup::Weekdays);
        let twice = original
            .toggle_group(&WEEKENDS)
            .toggle_group(&WEEKENDS);

        assert_eq!(twice, original);
    }

    #[test]
    fn test_set_day_returns_new_value() {
        let original = DaysOfWeek::all();
        let changed = original.set_day(3, false);

        assert!(original.is_included(3));
        assert!(!changed.is_included(3));
        assert_ne!(original, changed);
    }

    #[test]
    fn test_set_day_out_of_range_is_ignored() {
        assert_eq!(DaysOfWeek::all().set_day(7, false), DaysOfWeek::all());
        assert!(!DaysOfWeek::all().is_included(9));
    }

    #[test]
    fn test_group_state() {
        let days = DaysOfWeek::none().set_day(6, true);

        assert_eq!(days.group_state(WeekdayGroup::Weekends), GroupState::Indeterminate);
        assert_eq!(days.group_state(WeekdayGroup::Weekdays), GroupState::Unchecked);
        assert_eq!(
            DaysOfWeek::all().group_state(WeekdayGroup::Weekdays),
            GroupState::Checked
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(DaysOfWeek::all().label(), "Every day");
        assert_eq!(DaysOfWeek::only(WeekdayGroup::Weekdays).label(), "Weekdays");
        assert_eq!(DaysOfWeek::only(WeekdayGroup::Weekends).label(), "Sat, Sun");
        assert_eq!(DaysOfWeek::from_indices([1, 3]).label(), "Mon, Wed");
        assert_eq!(DaysOfWeek::none().label(), "No days");
    }

    #[test]
    fn test_weekday_index_is_sunday_based() {
        // 2023-03-05 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2023, 3, 5).unwrap();
        assert_eq!(weekday_index(sunday), 0);
        assert_eq!(weekday_index(sunday.succ_opt().unwrap()), 1);
    }
}
