//! Shared helpers for unit tests across the crate.

use crate::domain::{DateRangeFilter, GraphParams};
use crate::infrastructure::{QueryCodec, QueryStore};
use chrono::NaiveDate;

pub use crate::infrastructure::FixedClock;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Store holding `first` in the first slot, nothing in the second, and the
/// default 90 day range cap.
pub fn test_store(first: DateRangeFilter) -> QueryStore {
    QueryStore::new(QueryCodec::new(90), GraphParams::new(first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RangeSlot;
    use crate::infrastructure::{Clock, FilterStore};

    #[test]
    fn test_store_starts_clean() {
        let store = test_store(DateRangeFilter::single_day(date(2024, 3, 15)));

        assert_eq!(store.version(), 0);
        assert_eq!(store.committed(RangeSlot::SecondDateRange), None);
    }

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(date(2024, 3, 15)).today(), date(2024, 3, 15));
    }
}
