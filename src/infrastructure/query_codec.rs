use crate::domain::{DateRangeFilter, DaysOfWeek, GraphParams, RouteSelection, TimeRange};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use url::form_urlencoded;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw query values for one date range, before validation.
#[derive(Debug, Default)]
struct RawRange {
    start_date: Option<String>,
    end_date: Option<String>,
    days_back: Option<String>,
    days_of_the_week: Option<String>,
}

impl RawRange {
    fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}

/// Encodes the committed parameters into the shareable query string and
/// back. Keys keep the dashboard's established names (`date` is the end date).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCodec {
    max_date_range: u32,
}

impl QueryCodec {
    pub fn new(max_date_range: u32) -> Self {
        Self {
            max_date_range: max_date_range.max(1),
        }
    }

    pub fn encode(&self, params: &GraphParams) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());

        let route = &params.route;
        let route_pairs = [
            ("agencyId", &route.agency_id),
            ("routeId", &route.route_id),
            ("directionId", &route.direction_id),
            ("startStopId", &route.start_stop_id),
            ("endStopId", &route.end_stop_id),
        ];
        for (key, value) in route_pairs {
            if let Some(value) = value {
                query.append_pair(key, value);
            }
        }

        append_range(&mut query, "", &params.first_date_range);
        if let Some(second) = &params.second_date_range {
            append_range(&mut query, "second", second);
        }

        if let Some(time_range) = &params.time_range {
            query.append_pair("startTime", &time_range.start_time.to_string());
            query.append_pair("endTime", &time_range.end_time.to_string());
        }

        query.finish()
    }

    /// Decodes a query string. Missing values come from `defaults`; decoded
    /// ranges are normalized so the committed invariants hold. Unknown keys
    /// are skipped, malformed values are errors.
    pub fn decode(&self, query: &str, today: NaiveDate, defaults: &GraphParams) -> Result<GraphParams> {
        let query = query.trim().trim_start_matches('?');

        let mut route = RouteSelection::default();
        let mut first = RawRange::default();
        let mut second = RawRange::default();
        let mut start_time = None;
        let mut end_time = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "agencyId" => route.agency_id = Some(value),
                "routeId" => route.route_id = Some(value),
                "directionId" => route.direction_id = Some(value),
                "startStopId" => route.start_stop_id = Some(value),
                "endStopId" => route.end_stop_id = Some(value),
                "startDate" => first.start_date = Some(value),
                "date" => first.end_date = Some(value),
                "daysBack" => first.days_back = Some(value),
                "daysOfTheWeek" => first.days_of_the_week = Some(value),
                "secondStartDate" => second.start_date = Some(value),
                "secondDate" => second.end_date = Some(value),
                "secondDaysBack" => second.days_back = Some(value),
                "secondDaysOfTheWeek" => second.days_of_the_week = Some(value),
                "startTime" => start_time = Some(value),
                "endTime" => end_time = Some(value),
                other => log::warn!("Ignoring unknown query parameter '{}'", other),
            }
        }

        let first_date_range = if first.is_empty() {
            defaults.first_date_range.clone()
        } else {
            decode_range(&first, "").context("Invalid first date range")?
        };

        let second_date_range = if second.is_empty() {
            defaults.second_date_range.clone()
        } else {
            Some(decode_range(&second, "second").context("Invalid second date range")?)
        };

        let time_range = match (start_time, end_time) {
            (Some(start), Some(end)) => Some(TimeRange::from_parts(&start, &end)?),
            (None, None) => defaults.time_range,
            _ => bail!("startTime and endTime must be given together"),
        };

        Ok(GraphParams {
            route,
            first_date_range: first_date_range.normalized(today, self.max_date_range),
            second_date_range: second_date_range
                .map(|filter| filter.normalized(today, self.max_date_range)),
            time_range,
        })
    }
}

fn prefixed(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        let mut chars = key.chars();
        let capitalized: String = chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
        format!("{}{}", prefix, capitalized)
    }
}

fn append_range(
    query: &mut form_urlencoded::Serializer<'_, String>,
    prefix: &str,
    filter: &DateRangeFilter,
) {
    query.append_pair(
        &prefixed(prefix, "startDate"),
        &filter.start_date.format(DATE_FORMAT).to_string(),
    );
    query.append_pair(
        &prefixed(prefix, "date"),
        &filter.end_date.format(DATE_FORMAT).to_string(),
    );
    if let Some(days_back) = filter.lookback_days {
        query.append_pair(&prefixed(prefix, "daysBack"), &days_back.to_string());
    }
    query.append_pair(
        &prefixed(prefix, "daysOfTheWeek"),
        &encode_days(&filter.days_of_the_week),
    );
}

/// Included weekday digits in ascending order, e.g. `12345` for weekdays.
pub fn encode_days(days: &DaysOfWeek) -> String {
    days.indices().map(|day| day.to_string()).collect()
}

pub fn decode_days(value: &str) -> Result<DaysOfWeek> {
    let mut indices = Vec::new();
    for c in value.chars() {
        match c.to_digit(10) {
            Some(day) if day <= 6 => indices.push(day as usize),
            _ => bail!("Invalid weekday '{}' in '{}'", c, value),
        }
    }
    Ok(DaysOfWeek::from_indices(indices))
}

fn parse_date(value: &str, key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .with_context(|| format!("Invalid {} '{}'", key, value))
}

fn decode_range(raw: &RawRange, prefix: &str) -> Result<DateRangeFilter> {
    let end_date = raw
        .end_date
        .as_deref()
        .map(|value| parse_date(value, &prefixed(prefix, "date")))
        .transpose()?;
    let start_date = raw
        .start_date
        .as_deref()
        .map(|value| parse_date(value, &prefixed(prefix, "startDate")))
        .transpose()?;

    let (start_date, end_date) = match (start_date, end_date) {
        (Some(start), Some(end)) => (start, end),
        (Some(start), None) => (start, start),
        (None, Some(end)) => (end, end),
        (None, None) => bail!("Missing {}", prefixed(prefix, "date")),
    };

    let days_of_the_week = raw
        .days_of_the_week
        .as_deref()
        .map(decode_days)
        .transpose()?
        .unwrap_or_default();

    let lookback_days = raw
        .days_back
        .as_deref()
        .map(|value| {
            value
                .parse::<u32>()
                .with_context(|| format!("Invalid {} '{}'", prefixed(prefix, "daysBack"), value))
        })
        .transpose()?;

    Ok(DateRangeFilter {
        start_date,
        end_date,
        days_of_the_week,
        lookback_days,
    })
}
