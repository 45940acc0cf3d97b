use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use crate::errors::ForecastError;
use crate::models::forecast_record::{ForecastRecord, ForecastStore};
use crate::models::station::Station;

/// Snapshot as dumped by the forecast provider
#[derive(Deserialize)]
pub struct RawSnapshot {
    pub station: Option<Station>,
    pub issue_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub forecast_data: Value,
    pub report_data: Option<RawReport>,
    #[serde(default)]
    pub uv_index: Vec<Option<f64>>,
}

/// Latest measurement report, date as "dd.mm.yy" and time as "HH:MM"
#[derive(Deserialize)]
pub struct RawReport {
    pub date: String,
    pub time: String,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

/// Forecast payload resolved once when a snapshot is taken in.
///
/// Tabular is the regular timestamp → record mapping. Anything else the provider
/// might hand over is kept as-is so it can at least be shown.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastPayload {
    Tabular(ForecastStore),
    Opaque(Value),
}

impl ForecastPayload {
    /// Resolves the provider's forecast document
    ///
    /// # Arguments
    ///
    /// * 'value' - the forecast_data part of the provider's snapshot
    pub fn resolve(value: Value) -> Result<ForecastPayload, ForecastError> {
        match value {
            Value::Null => Ok(ForecastPayload::Tabular(ForecastStore::new())),
            Value::Object(map) if map.values().all(|v| v.is_object()) => {
                Ok(ForecastPayload::Tabular(ForecastStore::from_json(&map)?))
            }
            other => Ok(ForecastPayload::Opaque(other)),
        }
    }

    /// Returns the store, None for opaque payloads
    pub fn store(&self) -> Option<&ForecastStore> {
        match self {
            ForecastPayload::Tabular(store) => Some(store),
            ForecastPayload::Opaque(_) => None,
        }
    }

    pub fn store_mut(&mut self) -> Option<&mut ForecastStore> {
        match self {
            ForecastPayload::Tabular(store) => Some(store),
            ForecastPayload::Opaque(_) => None,
        }
    }
}

/// Measurements reported by the station
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub issue_time: Option<String>,
    pub record: ForecastRecord,
}

impl Report {
    fn from_raw(raw: RawReport) -> Result<Report, ForecastError> {
        let issue_time = report_issue_time(&raw.date, &raw.time);
        let record = ForecastRecord::from_json(&raw.date, &Value::Object(raw.values))?;

        Ok(Report { issue_time, record })
    }
}

/// A complete, immutable view of the provider's data at one refresh
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub station: Option<Station>,
    pub issue_time: Option<DateTime<Utc>>,
    pub forecast: ForecastPayload,
    pub report: Option<Report>,
    pub uv_index: Vec<Option<f64>>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Turns the provider's raw snapshot into a snapshot ready for presentation
    ///
    /// # Arguments
    ///
    /// * 'raw' - the provider snapshot
    /// * 'fetched_at' - time of the refresh
    pub fn from_raw(raw: RawSnapshot, fetched_at: DateTime<Utc>) -> Result<Snapshot, ForecastError> {
        Ok(Snapshot {
            station: raw.station,
            issue_time: raw.issue_time,
            forecast: ForecastPayload::resolve(raw.forecast_data)?,
            report: raw.report_data.map(Report::from_raw).transpose()?,
            uv_index: raw.uv_index,
            fetched_at,
        })
    }

    /// Returns the forecast store, empty if the payload isn't tabular
    pub fn store(&self) -> Option<&ForecastStore> {
        self.forecast.store()
    }
}

#[cfg(test)]
impl Snapshot {
    /// An empty snapshot to build test snapshots from
    pub fn empty() -> Snapshot {
        Snapshot {
            station: None,
            issue_time: None,
            forecast: ForecastPayload::Tabular(ForecastStore::new()),
            report: None,
            uv_index: Vec::new(),
            fetched_at: DateTime::default(),
        }
    }
}

/// Builds the report time as "YYYY-MM-DD HH:MM" from DWD's "dd.mm.yy" and "HH:MM"
fn report_issue_time(date: &str, time: &str) -> Option<String> {
    let parts = date.split('.').collect::<Vec<&str>>();
    if parts.len() != 3 {
        return None;
    }

    Some(format!("20{}-{}-{} {}", parts[2], parts[1], parts[0], time))
}
