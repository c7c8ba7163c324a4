use crate::domain::{DateRangeFilter, GraphParams, ParamsAction, RangeSlot, RouteSelection, TimeRange};
use crate::infrastructure::{FilterStore, QueryCodec};
use anyhow::Result;
use chrono::NaiveDate;

/// Committed parameters plus a browser-like navigation history. Every
/// visible change pushes a new entry and drops any forward entries.
pub struct QueryStore {
    codec: QueryCodec,
    history: Vec<GraphParams>,
    cursor: usize,
    version: u64,
}

impl QueryStore {
    pub fn new(codec: QueryCodec, initial: GraphParams) -> Self {
        Self {
            codec,
            history: vec![initial],
            cursor: 0,
            version: 0,
        }
    }

    /// Starts from a shared query string, with `defaults` filling the gaps.
    pub fn from_query(
        codec: QueryCodec,
        query: &str,
        today: NaiveDate,
        defaults: &GraphParams,
    ) -> Result<Self> {
        let params = codec.decode(query, today, defaults)?;
        Ok(Self::new(codec, params))
    }

    pub fn params(&self) -> &GraphParams {
        &self.history[self.cursor]
    }

    pub fn current_query(&self) -> String {
        self.codec.encode(self.params())
    }

    pub fn dispatch(&mut self, action: ParamsAction) -> bool {
        let next = self.params().reduce(action);
        if &next == self.params() {
            return false;
        }

        self.history.truncate(self.cursor + 1);
        self.history.push(next);
        self.cursor += 1;
        self.version += 1;
        log::debug!("Query is now '{}'", self.current_query());
        true
    }

    pub fn set_time_range(&mut self, time_range: Option<TimeRange>) -> bool {
        self.dispatch(ParamsAction::SetTimeRange(time_range))
    }

    pub fn set_route(&mut self, route: RouteSelection) -> bool {
        self.dispatch(ParamsAction::SetRoute(route))
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }

    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.cursor -= 1;
        self.version += 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.cursor += 1;
        self.version += 1;
        true
    }
}

impl FilterStore for QueryStore {
    fn committed(&self, slot: RangeSlot) -> Option<DateRangeFilter> {
        self.params().date_range(slot).cloned()
    }

    fn commit(&mut self, slot: RangeSlot, filter: Option<DateRangeFilter>) -> bool {
        self.dispatch(ParamsAction::SetDateRange { slot, filter })
    }

    fn version(&self) -> u64 {
        self.version
    }
}
