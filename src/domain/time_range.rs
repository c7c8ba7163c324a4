use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time of day as `HH:MM`, optionally `HH:MM+1` for the early hours of the
/// following service day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    pub next_day: bool,
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self {
            next_day: false,
            hour,
            minute,
        }
    }

    pub fn next_day(hour: u8, minute: u8) -> Self {
        Self {
            next_day: true,
            hour,
            minute,
        }
    }

    /// Minutes since midnight of the service day.
    pub fn minutes(&self) -> u32 {
        let base = u32::from(self.hour) * 60 + u32::from(self.minute);
        if self.next_day { base + 24 * 60 } else { base }
    }
}

impl FromStr for TimeOfDay {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let (clock, next_day) = match value.strip_suffix("+1") {
            Some(clock) => (clock, true),
            None => (value, false),
        };

        let (hour, minute) = clock
            .split_once(':')
            .with_context(|| format!("Expected HH:MM, got '{}'", value))?;
        let hour: u8 = hour
            .parse()
            .with_context(|| format!("Invalid hour in '{}'", value))?;
        let minute: u8 = minute
            .parse()
            .with_context(|| format!("Invalid minute in '{}'", value))?;

        if hour > 23 || minute > 59 {
            bail!("Time out of range: '{}'", value);
        }

        Ok(Self {
            next_day,
            hour,
            minute,
        })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)?;
        if self.next_day {
            write!(f, "+1")?;
        }
        Ok(())
    }
}

/// Time-of-day window applied to every date in the selected ranges.
/// The absence of a window means "all day".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeRange {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl TimeRange {
    pub fn new(start_time: TimeOfDay, end_time: TimeOfDay) -> Result<Self> {
        if end_time.minutes() <= start_time.minutes() {
            bail!("End time {} must be after start time {}", end_time, start_time);
        }
        Ok(Self {
            start_time,
            end_time,
        })
    }

    pub fn from_parts(start_time: &str, end_time: &str) -> Result<Self> {
        Self::new(start_time.parse()?, end_time.parse()?)
    }
}

impl FromStr for TimeRange {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let (start, end) = value
            .split_once('-')
            .with_context(|| format!("Expected START-END, got '{}'", value))?;
        Self::from_parts(start.trim(), end.trim())
    }
}

impl TryFrom<String> for TimeRange {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeRange> for String {
    fn from(range: TimeRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_time, self.end_time)
    }
}

/// A selectable time-of-day option. `range: None` is the all-day option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedTimeRange {
    pub label: String,
    pub range: Option<TimeRange>,
}

impl NamedTimeRange {
    pub fn all_day() -> Self {
        Self {
            label: "All Day".to_string(),
            range: None,
        }
    }

    pub fn new(label: impl Into<String>, range: TimeRange) -> Self {
        Self {
            label: label.into(),
            range: Some(range),
        }
    }
}

pub fn time_range_label(range: Option<&TimeRange>) -> String {
    match range {
        Some(range) => range.to_string(),
        None => "All Day".to_string(),
    }
}
