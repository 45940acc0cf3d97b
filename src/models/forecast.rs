use serde::Serialize;
use crate::condition::Condition;
use crate::parameter::DisplayValue;

/// A single forecast entry (daily or hourly) as handed to the weather entity.
/// Fields without data are left out when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forecast {
    pub datetime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_templow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_dew_point: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_precipitation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_probability: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_wind_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_gust_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_bearing: Option<DisplayValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_coverage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<f64>,
    #[serde(flatten)]
    pub additional: Option<AdditionalAttributes>,
}

/// Extra forecast attributes, optional since some weather templates choke on them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdditionalAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaporation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fog_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun_irradiance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity_absolute: Option<f64>,
}

/// One point of an hourly sensor series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub datetime: String,
    pub value: Option<DisplayValue>,
}

/// UV index for today and the two following days
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UvIndexDaily {
    pub today: Option<f64>,
    pub tomorrow: Option<f64>,
    pub dayaftertomorrow: Option<f64>,
}

/// Informational attributes shared by all entities of a station
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Infos {
    pub latest_update_utc: Option<String>,
    pub report_time_utc: String,
    pub forecast_time_utc: Option<String>,
    pub station_id: String,
    pub station_name: String,
}
