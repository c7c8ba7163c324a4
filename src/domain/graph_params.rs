use crate::domain::{DateRangeFilter, RangeSlot, TimeRange};
use serde::{Deserialize, Serialize};

/// Route, direction and stop pair the metrics are computed for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSelection {
    pub agency_id: Option<String>,
    pub route_id: Option<String>,
    pub direction_id: Option<String>,
    pub start_stop_id: Option<String>,
    pub end_stop_id: Option<String>,
}

/// The committed, shareable parameter object. Never mutated in place: every
/// change goes through [`GraphParams::reduce`] and yields a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphParams {
    pub route: RouteSelection,
    pub first_date_range: DateRangeFilter,
    pub second_date_range: Option<DateRangeFilter>,
    pub time_range: Option<TimeRange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsAction {
    SetDateRange {
        slot: RangeSlot,
        filter: Option<DateRangeFilter>,
    },
    SetTimeRange(Option<TimeRange>),
    SetRoute(RouteSelection),
}

impl GraphParams {
    pub fn new(first_date_range: DateRangeFilter) -> Self {
        Self {
            route: RouteSelection::default(),
            first_date_range,
            second_date_range: None,
            time_range: None,
        }
    }

    pub fn date_range(&self, slot: RangeSlot) -> Option<&DateRangeFilter> {
        match slot {
            RangeSlot::FirstDateRange => Some(&self.first_date_range),
            RangeSlot::SecondDateRange => self.second_date_range.as_ref(),
        }
    }

    pub fn reduce(&self, action: ParamsAction) -> GraphParams {
        let mut next = self.clone();
        match action {
            ParamsAction::SetDateRange {
                slot: RangeSlot::FirstDateRange,
                filter: Some(filter),
            } => next.first_date_range = filter,
            ParamsAction::SetDateRange {
                slot: RangeSlot::FirstDateRange,
                filter: None,
            } => {
                log::warn!("The first date range cannot be cleared; keeping current value");
            }
            ParamsAction::SetDateRange {
                slot: RangeSlot::SecondDateRange,
                filter,
            } => next.second_date_range = filter,
            ParamsAction::SetTimeRange(time_range) => next.time_range = time_range,
            ParamsAction::SetRoute(route) => next.route = route,
        }
        next
    }
}
