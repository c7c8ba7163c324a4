use crate::domain::{DateRangeFilter, RangeSlot};

/// Holder of the committed filters. Single writer (the commit and reset
/// transitions), any number of readers.
pub trait FilterStore {
    fn committed(&self, slot: RangeSlot) -> Option<DateRangeFilter>;

    /// Replaces the committed filter for `slot`. Returns false, and records
    /// nothing, when the filter is identical to the current one.
    fn commit(&mut self, slot: RangeSlot, filter: Option<DateRangeFilter>) -> bool;

    /// Bumped on every visible change.
    fn version(&self) -> u64;
}
