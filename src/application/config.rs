use crate::domain::{
    DismissPolicy, GraphParams, NamedTimeRange, RangeSlot, SlotDefault, SlotRules, TimeOfDay,
    TimeRange,
};
use crate::infrastructure::parse_level;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MAX_DATE_RANGE: u32 = 90;

/// A lookback shortcut offered in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub label: String,
    pub lookback_days: u32,
}

impl Preset {
    pub fn new(label: &str, lookback_days: u32) -> Self {
        Self {
            label: label.to_string(),
            lookback_days,
        }
    }
}

pub struct Config {
    pub state_dir: PathBuf,
    pub log_path: PathBuf,
    pub log_level: LevelFilter,
    pub theme: String,
    pub max_date_range: u32,
    pub presets: Vec<Preset>,
    pub time_ranges: Vec<NamedTimeRange>,
    pub first_default: SlotDefault,
    pub second_default: Option<SlotDefault>,
    pub dismiss_policy: DismissPolicy,
}

/// Optional overrides read from the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConfigFile {
    max_date_range: Option<u32>,
    presets: Option<Vec<Preset>>,
    time_ranges: Option<Vec<NamedTimeRange>>,
    defaults: Option<SlotDefaults>,
    dismiss_policy: Option<DismissPolicy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlotDefaults {
    #[serde(default = "SlotDefault::today_only")]
    first_date_range: SlotDefault,
    #[serde(default)]
    second_date_range: Option<SlotDefault>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let state_dir = std::env::var("TRANSIT_FILTERS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_local_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("transit-filters")
            });

        let config_path = std::env::var("TRANSIT_FILTERS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| state_dir.join("config.json"));

        let mut config = Self::with_state_dir(state_dir).load_file(&config_path)?;

        if let Ok(value) = std::env::var("TRANSIT_FILTERS_MAX_RANGE") {
            let max_date_range: u32 = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid TRANSIT_FILTERS_MAX_RANGE '{}'", value))?;
            config.max_date_range = max_date_range.max(1);
        }

        if let Ok(value) = std::env::var("TRANSIT_FILTERS_LOG") {
            config.log_level = parse_level(&value);
        }

        if let Ok(theme) = std::env::var("TRANSIT_FILTERS_THEME") {
            config.theme = theme;
        }

        Ok(config)
    }

    /// Built-in defaults rooted at `state_dir`.
    pub fn with_state_dir(state_dir: PathBuf) -> Self {
        let log_path = state_dir.join("dashboard.log");

        Self {
            state_dir,
            log_path,
            log_level: LevelFilter::Info,
            theme: "dark".to_string(),
            max_date_range: MAX_DATE_RANGE,
            presets: default_presets(),
            time_ranges: default_time_ranges(),
            first_default: SlotDefault::today_only(),
            second_default: None,
            dismiss_policy: DismissPolicy::default(),
        }
    }

    /// Applies the overrides in `path`. A missing file changes nothing.
    pub fn load_file(mut self, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(self);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let Some(max_date_range) = file.max_date_range {
            self.max_date_range = max_date_range.max(1);
        }
        if let Some(presets) = file.presets {
            self.presets = presets;
        }
        if let Some(time_ranges) = file.time_ranges {
            self.time_ranges = time_ranges;
        }
        if let Some(defaults) = file.defaults {
            self.first_default = defaults.first_date_range;
            self.second_default = defaults.second_date_range;
        }
        if let Some(dismiss_policy) = file.dismiss_policy {
            self.dismiss_policy = dismiss_policy;
        }

        Ok(self)
    }

    pub fn slot_rules(&self, slot: RangeSlot) -> SlotRules {
        let (default, fallback) = match slot {
            RangeSlot::FirstDateRange => {
                (Some(self.first_default.clone()), self.first_default.clone())
            }
            RangeSlot::SecondDateRange => (
                self.second_default.clone(),
                self.second_default
                    .clone()
                    .unwrap_or_else(|| self.first_default.clone()),
            ),
        };

        SlotRules {
            max_date_range: self.max_date_range,
            default,
            fallback,
            dismiss_policy: self.dismiss_policy,
        }
    }

    /// Parameters used when the query is empty or cannot be decoded.
    pub fn default_params(&self, today: NaiveDate) -> GraphParams {
        let mut params = GraphParams::new(
            self.first_default
                .filter(today)
                .normalized(today, self.max_date_range),
        );
        params.second_date_range = self
            .second_default
            .as_ref()
            .map(|default| default.filter(today).normalized(today, self.max_date_range));
        params
    }
}

fn default_presets() -> Vec<Preset> {
    vec![
        Preset::new("Today", 1),
        Preset::new("Last 7 days", 7),
        Preset::new("Last 14 days", 14),
        Preset::new("Last 30 days", 30),
        Preset::new("Last 90 days", 90),
    ]
}

fn named(label: &str, start: TimeOfDay, end: TimeOfDay) -> Option<NamedTimeRange> {
    TimeRange::new(start, end)
        .ok()
        .map(|range| NamedTimeRange::new(label, range))
}

fn default_time_ranges() -> Vec<NamedTimeRange> {
    let mut ranges = vec![NamedTimeRange::all_day()];
    ranges.extend(
        [
            named("Early Morning", TimeOfDay::new(3, 0), TimeOfDay::new(7, 0)),
            named("AM Peak", TimeOfDay::new(7, 0), TimeOfDay::new(10, 0)),
            named("Midday", TimeOfDay::new(10, 0), TimeOfDay::new(16, 0)),
            named("PM Peak", TimeOfDay::new(16, 0), TimeOfDay::new(19, 0)),
            named("Late Evening", TimeOfDay::new(19, 0), TimeOfDay::next_day(3, 0)),
        ]
        .into_iter()
        .flatten(),
    );
    ranges
}
