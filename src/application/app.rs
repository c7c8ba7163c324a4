use crate::application::{Config, Preset};
use crate::domain::{
    DateRangeFilter, EditorAction, FilterCommitController, GraphParams, NamedTimeRange, Outcome,
    RangeSlot, RouteSelection, ViewModel, time_range_label,
};
use crate::infrastructure::{Clock, FilterStore, QueryCodec, QueryStore};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// Committed parameters plus one editor per range slot.
pub struct DashboardApp {
    config: Config,
    clock: Rc<dyn Clock>,
    store: QueryStore,
    first: FilterCommitController,
    second: FilterCommitController,
    decode_error: Option<String>,
}

/// Summary of one slot as printed by `describe`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDescription {
    pub slot: RangeSlot,
    pub title: String,
    pub main_label: String,
    pub secondary_label: String,
    pub is_valid: bool,
    pub selected_dates: usize,
    pub filter: Option<DateRangeFilter>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    pub today: NaiveDate,
    pub route: RouteSelection,
    pub slots: Vec<SlotDescription>,
    pub time_range: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decode_error: Option<String>,
}

/// A preset resolved against today's date.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetListing {
    pub label: String,
    pub lookback_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DashboardApp {
    /// Builds the app from a shared query. An undecodable query is logged
    /// and replaced by the configured defaults.
    pub fn new(config: Config, clock: Rc<dyn Clock>, query: Option<&str>) -> Self {
        let today = clock.today();
        let codec = QueryCodec::new(config.max_date_range);
        let defaults = config.default_params(today);

        let (store, decode_error) = match query {
            Some(query) => match QueryStore::from_query(codec, query, today, &defaults) {
                Ok(store) => (store, None),
                Err(e) => {
                    log::warn!("Could not decode query '{}': {:#}", query, e);
                    (QueryStore::new(codec, defaults), Some(format!("{:#}", e)))
                }
            },
            None => (QueryStore::new(codec, defaults), None),
        };

        let first = FilterCommitController::new(
            RangeSlot::FirstDateRange,
            config.slot_rules(RangeSlot::FirstDateRange),
            Rc::clone(&clock),
        );
        let second = FilterCommitController::new(
            RangeSlot::SecondDateRange,
            config.slot_rules(RangeSlot::SecondDateRange),
            Rc::clone(&clock),
        );

        Self {
            config,
            clock,
            store,
            first,
            second,
            decode_error,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn params(&self) -> &GraphParams {
        self.store.params()
    }

    pub fn current_query(&self) -> String {
        self.store.current_query()
    }

    pub fn decode_error(&self) -> Option<&str> {
        self.decode_error.as_deref()
    }

    pub fn controller(&self, slot: RangeSlot) -> &FilterCommitController {
        match slot {
            RangeSlot::FirstDateRange => &self.first,
            RangeSlot::SecondDateRange => &self.second,
        }
    }

    pub fn dispatch(&mut self, slot: RangeSlot, action: EditorAction) -> Outcome {
        let controller = match slot {
            RangeSlot::FirstDateRange => &mut self.first,
            RangeSlot::SecondDateRange => &mut self.second,
        };
        controller.dispatch(action, &mut self.store)
    }

    pub fn view_model(&self, slot: RangeSlot) -> ViewModel {
        self.controller(slot).view_model(&self.store)
    }

    pub fn time_ranges(&self) -> &[NamedTimeRange] {
        &self.config.time_ranges
    }

    /// Index of the committed time range among the configured ones.
    pub fn time_range_index(&self) -> Option<usize> {
        let current = self.store.params().time_range;
        self.config
            .time_ranges
            .iter()
            .position(|named| named.range == current)
    }

    /// Commits a time range immediately; no draft is involved.
    pub fn select_time_range(&mut self, index: usize) -> bool {
        let Some(named) = self.config.time_ranges.get(index) else {
            return false;
        };
        let changed = self.store.set_time_range(named.range);
        if changed {
            log::info!("Time range set to {}", named.label);
        }
        changed
    }

    pub fn cycle_time_range(&mut self) -> bool {
        let count = self.config.time_ranges.len();
        if count == 0 {
            return false;
        }
        let next = self.time_range_index().map_or(0, |index| (index + 1) % count);
        self.select_time_range(next)
    }

    pub fn set_route(&mut self, route: RouteSelection) -> bool {
        self.store.set_route(route)
    }

    pub fn can_go_back(&self) -> bool {
        self.store.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.store.can_go_forward()
    }

    pub fn back(&mut self) -> bool {
        let moved = self.store.back();
        if moved {
            self.sync_controllers();
        }
        moved
    }

    pub fn forward(&mut self) -> bool {
        let moved = self.store.forward();
        if moved {
            self.sync_controllers();
        }
        moved
    }

    fn sync_controllers(&mut self) {
        self.first.sync_with_store(&self.store);
        self.second.sync_with_store(&self.store);
    }

    pub fn describe(&self) -> Description {
        let slots = RangeSlot::ALL
            .iter()
            .map(|&slot| {
                let view = self.view_model(slot);
                let filter = self.store.committed(slot);
                SlotDescription {
                    slot,
                    title: slot.title().to_string(),
                    main_label: view.main_label,
                    secondary_label: view.secondary_label,
                    is_valid: view.is_valid,
                    selected_dates: filter
                        .as_ref()
                        .map_or(0, |filter| filter.selected_dates().count()),
                    filter,
                }
            })
            .collect();

        Description {
            today: self.today(),
            route: self.store.params().route.clone(),
            slots,
            time_range: time_range_label(self.store.params().time_range.as_ref()),
            query: self.current_query(),
            decode_error: self.decode_error.clone(),
        }
    }

    pub fn presets(&self) -> Vec<PresetListing> {
        let today = self.today();
        self.config
            .presets
            .iter()
            .map(|Preset { label, lookback_days }| {
                let filter = DateRangeFilter::from_lookback(*lookback_days, today)
                    .normalized(today, self.config.max_date_range);
                PresetListing {
                    label: label.clone(),
                    lookback_days: *lookback_days,
                    start_date: filter.start_date,
                    end_date: filter.end_date,
                }
            })
            .collect()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.decode_error {
            writeln!(f, "Query not understood, showing defaults: {}", error)?;
        }
        if let Some(route_id) = &self.route.route_id {
            writeln!(f, "Route: {}", route_id)?;
        }
        for slot in &self.slots {
            write!(f, "{}: {}", slot.title, slot.main_label)?;
            if !slot.secondary_label.is_empty() {
                write!(f, " ({})", slot.secondary_label)?;
            }
            if slot.filter.is_some() {
                write!(f, " - {} day(s)", slot.selected_dates)?;
            }
            if !slot.is_valid {
                write!(f, " [no usable day]")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "Time: {}", self.time_range)?;
        write!(f, "Query: {}", self.query)
    }
}
