use std::collections::BTreeMap;
use std::ops::Bound;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use crate::errors::ForecastError;
use crate::time_window::strip_to_hour;

/// Key under which the provider stores the DWD weather code of a record
pub const CONDITION_KEY: &str = "condition";

/// Timestamp layout used by the provider for forecast record keys
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Layout used when rendering a record key back, always hour aligned
pub const HOUR_KEY_FORMAT: &str = "%Y-%m-%dT%H:00:00.000Z";

/// One timestamp's worth of raw parameter values in their native units.
///
/// Values are keyed by the provider's parameter code (e.g. "TTT", "PPPP"). A code
/// that is present but unmeasured holds `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastRecord {
    values: BTreeMap<String, Option<f64>>,
    condition: Option<String>,
}

impl ForecastRecord {
    pub fn new() -> ForecastRecord {
        ForecastRecord::default()
    }

    /// Returns the record with the given raw value set
    ///
    /// # Arguments
    ///
    /// * 'code' - parameter code
    /// * 'value' - raw value in native unit, None if unmeasured
    pub fn with_value(mut self, code: &str, value: Option<f64>) -> ForecastRecord {
        self.values.insert(code.to_string(), value);
        self
    }

    /// Returns the record with the given DWD weather code set
    ///
    /// # Arguments
    ///
    /// * 'code' - weather code as delivered by the provider, e.g. "61"
    pub fn with_condition(mut self, code: &str) -> ForecastRecord {
        self.condition = Some(code.to_string());
        self
    }

    /// Returns the raw value for a parameter code, None if absent or unmeasured
    pub fn value(&self, code: &str) -> Option<f64> {
        self.values.get(code).copied().flatten()
    }

    /// Returns the raw weather code, None if absent or reported as "-"
    pub fn condition_code(&self) -> Option<&str> {
        self.condition.as_deref().filter(|c| *c != "-")
    }

    /// Returns all parameter codes held by the record
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// Builds a record from the provider's json representation.
    ///
    /// Numbers are taken as-is, numeric strings are parsed and anything else
    /// (null, "-", free text) is treated as unmeasured.
    ///
    /// # Arguments
    ///
    /// * 'timestamp' - the record key, only used for error reporting
    /// * 'value' - the json value of the record
    pub fn from_json(timestamp: &str, value: &Value) -> Result<ForecastRecord, ForecastError> {
        let map = value.as_object().ok_or_else(|| ForecastError::MalformedRecord {
            timestamp: timestamp.to_string(),
            reason: "record is not an object".to_string(),
        })?;

        let mut record = ForecastRecord::new();
        for (code, v) in map {
            record = if code == CONDITION_KEY {
                match v {
                    Value::String(s) => record.with_condition(s),
                    Value::Number(n) => record.with_condition(&format!("{:0>2}", n.to_string())),
                    _ => record,
                }
            } else {
                record.with_value(code, json_number(v))
            };
        }

        Ok(record)
    }
}

fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Chronologically ordered forecast records.
///
/// Keys are parsed once when the store is built, so iteration order is
/// guaranteed chronological regardless of how the provider ordered its document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastStore {
    records: BTreeMap<DateTime<Utc>, ForecastRecord>,
}

impl ForecastStore {
    pub fn new() -> ForecastStore {
        ForecastStore::default()
    }

    /// Builds a store from the provider's json object mapping timestamp to record
    ///
    /// # Arguments
    ///
    /// * 'map' - json object with ISO-8601 keys
    pub fn from_json(map: &Map<String, Value>) -> Result<ForecastStore, ForecastError> {
        let mut store = ForecastStore::new();
        for (key, value) in map {
            let timestamp = parse_timestamp(key)?;
            store.insert(timestamp, ForecastRecord::from_json(key, value)?);
        }

        Ok(store)
    }

    /// Inserts or replaces the record at the given timestamp
    pub fn insert(&mut self, timestamp: DateTime<Utc>, record: ForecastRecord) {
        self.records.insert(timestamp, record);
    }

    pub fn get(&self, timestamp: &DateTime<Utc>) -> Option<&ForecastRecord> {
        self.records.get(timestamp)
    }

    /// Returns the record covering the hour the given time falls in
    pub fn at_hour(&self, date_time: DateTime<Utc>) -> Option<&ForecastRecord> {
        self.get(&strip_to_hour(date_time))
    }

    pub fn first(&self) -> Option<(&DateTime<Utc>, &ForecastRecord)> {
        self.records.first_key_value()
    }

    pub fn last(&self) -> Option<(&DateTime<Utc>, &ForecastRecord)> {
        self.records.last_key_value()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if the hour of the given time lies between the first and the last record
    ///
    /// # Arguments
    ///
    /// * 'date_time' - time to check
    pub fn is_in_timerange(&self, date_time: DateTime<Utc>) -> bool {
        let hour = strip_to_hour(date_time);
        match (self.first(), self.last()) {
            (Some((first, _)), Some((last, _))) => *first <= hour && hour <= *last,
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateTime<Utc>, &ForecastRecord)> {
        self.records.iter()
    }

    /// Returns records with timestamps in the half-open range [start, end)
    pub fn range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> impl Iterator<Item = (&DateTime<Utc>, &ForecastRecord)> {
        self.records.range((Bound::Included(start), Bound::Excluded(end.max(start))))
    }
}

/// Parses a provider timestamp such as "2024-01-01T05:00:00.000Z"
///
/// # Arguments
///
/// * 'timestamp' - the timestamp string
pub fn parse_timestamp(timestamp: &str) -> Result<DateTime<Utc>, ForecastError> {
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
        .map(|t| t.and_utc())
        .map_err(|_| ForecastError::MalformedTimestamp(timestamp.to_string()))
}

/// Renders a timestamp the way record keys are presented
pub fn hour_key(date_time: DateTime<Utc>) -> String {
    date_time.format(HOUR_KEY_FORMAT).to_string()
}
