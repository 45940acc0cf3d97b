use std::sync::Arc;
use arc_swap::ArcSwapOption;
use chrono::{DateTime, DurationRound, TimeDelta, Timelike, Utc};
use std::collections::BTreeMap;
use log::{debug, error, info, warn};
use crate::aggregation::{aggregate, condition_mode, AggregationKind};
use crate::condition::{condition_for_code, resolve_condition, Condition};
use crate::config::{DataType, Presentation};
use crate::errors::RefreshError;
use crate::humidity::absolute_humidity;
use crate::interpolation::{elapsed_fraction, interpolate};
use crate::manager_dwd::ForecastProvider;
use crate::manager_sun::SunTimes;
use crate::models::dwd_snapshot::Snapshot;
use crate::models::forecast::{AdditionalAttributes, Forecast, Infos, SeriesPoint, UvIndexDaily};
use crate::models::forecast_record::{hour_key, ForecastRecord, ForecastStore};
use crate::models::station::Station;
use crate::parameter::{normalize, normalize_code, normalize_temperature, DisplayValue, Parameter, KELVIN_OFFSET};
use crate::time_window::{fill_current_hour_gap, strip_to_day, strip_to_hour, Interval, TimeWindow};

/// Number of days covered by the hourly and daily forecast lists
const FORECAST_DAYS: i64 = 9;

/// Windows shorter than this get the day/night condition adjustment
const NIGHT_CONDITION_MAX_HOURS: i64 = 4;

/// Refresh cadence in minutes
const UPDATE_EVERY_MINUTES: u32 = 10;

/// Number of days the provider delivers a UV index for
const UV_INDEX_DAYS: i64 = 3;

/// Holds the latest provider snapshot for a station and derives everything
/// the weather and sensor entities present from it.
///
/// The snapshot is replaced as a whole on every successful refresh, readers
/// always see either the previous or the new snapshot, never a mix.
pub struct WeatherData {
    station: Station,
    presentation: Presentation,
    provider: Box<dyn ForecastProvider + Send + Sync>,
    sun: Box<dyn SunTimes + Send + Sync>,
    snapshot: ArcSwapOption<Snapshot>,
}

impl WeatherData {
    /// Returns a WeatherData without any data, call update to fill it
    ///
    /// # Arguments
    ///
    /// * 'station' - the configured station
    /// * 'presentation' - presentation settings
    /// * 'provider' - forecast provider
    /// * 'sun' - sunrise/sunset source for the station
    pub fn new(
        station: Station,
        presentation: Presentation,
        provider: Box<dyn ForecastProvider + Send + Sync>,
        sun: Box<dyn SunTimes + Send + Sync>,
    ) -> WeatherData {
        WeatherData { station, presentation, provider, sun, snapshot: ArcSwapOption::from(None) }
    }

    /// Returns the current snapshot, None before the first successful refresh
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.load_full()
    }

    /// Returns the time of the last successful refresh
    pub fn latest_update(&self) -> Option<DateTime<Utc>> {
        self.snapshot().map(|s| s.fetched_at)
    }

    /// Returns true when data should be refreshed, i.e. there is no data yet or the
    /// minute is on the ten minute grid and no refresh took place in that minute
    ///
    /// # Arguments
    ///
    /// * 'now' - current time
    pub fn is_update_time(&self, now: DateTime<Utc>) -> bool {
        match self.latest_update() {
            None => true,
            Some(latest) => {
                now.minute() % UPDATE_EVERY_MINUTES == 0 && strip_to_minute(latest) != strip_to_minute(now)
            }
        }
    }

    /// Refreshes data if it is time to do so.
    ///
    /// A failed refresh is logged and leaves the previous snapshot in place.
    /// Returns true if a new snapshot was taken in.
    ///
    /// # Arguments
    ///
    /// * 'now' - current time
    pub fn update(&self, now: DateTime<Utc>) -> bool {
        if !self.is_update_time(now) {
            return false;
        }

        match self.refresh(now) {
            Ok(()) => true,
            Err(e) => {
                error!("update of {} failed, keeping previous data: {}", self.station.name, e);
                false
            }
        }
    }

    /// Fetches a new snapshot from the provider and swaps it in
    ///
    /// # Arguments
    ///
    /// * 'now' - current time
    pub fn refresh(&self, now: DateTime<Utc>) -> Result<(), RefreshError> {
        info!("Updating {}", self.station.name);

        let carried = if self.presentation.hourly_update {
            self.snapshot()
                .and_then(|s| s.store().and_then(|store| store.at_hour(now).cloned()))
        } else {
            None
        };

        let raw = self.provider.fetch(&self.station.id)?;
        let mut snapshot = Snapshot::from_raw(raw, now)?;

        if let Some(store) = snapshot.forecast.store_mut() {
            if self.presentation.hourly_update {
                fill_current_hour_gap(store, now, carried);
            }
            if store.is_empty() {
                warn!("snapshot for {} holds no forecast records", self.station.id);
            } else {
                info!("{} forecast records", store.len());
            }
        }

        debug!("Forecast data {:?}", snapshot.forecast);
        self.snapshot.store(Some(Arc::new(snapshot)));

        Ok(())
    }

    /// Returns the informational attributes of the station
    pub fn infos(&self) -> Infos {
        let snapshot = self.snapshot();
        let report_time = if self.presentation.data_type.uses_report() {
            snapshot.as_ref().and_then(|s| s.report.as_ref()).and_then(|r| r.issue_time.clone())
        } else {
            None
        };

        Infos {
            latest_update_utc: snapshot.as_ref().map(|s| s.fetched_at.to_rfc3339()),
            report_time_utc: report_time.unwrap_or_default(),
            forecast_time_utc: snapshot.as_ref().and_then(|s| s.issue_time).map(|t| t.to_rfc3339()),
            station_id: self.station.id.clone(),
            station_name: self.station.name.clone(),
        }
    }

    /// Returns the current value of a parameter ready for presentation.
    ///
    /// Depending on the data type setting the value comes from the station report,
    /// the forecast or the report with forecast as fallback. If interpolation is
    /// enabled the value is blended towards the next hour's forecast.
    ///
    /// # Arguments
    ///
    /// * 'parameter' - the parameter to get
    /// * 'now' - current time
    pub fn weather_value(&self, parameter: Parameter, now: DateTime<Utc>) -> Option<DisplayValue> {
        self.snapshot_value(&*self.snapshot()?, parameter, now)
    }

    fn snapshot_value(&self, snapshot: &Snapshot, parameter: Parameter, now: DateTime<Utc>) -> Option<DisplayValue> {
        let code = parameter.code();
        let data_type = self.presentation.data_type;

        let mut value = None;
        if data_type.uses_report() {
            value = snapshot.report.as_ref().and_then(|r| r.record.value(code));
        }
        if data_type == DataType::Forecast || (data_type == DataType::Mixed && value.is_none()) {
            value = forecast_value(snapshot, code, now);
        }

        if self.presentation.interpolate {
            if let Some(current) = value {
                let next = forecast_value(snapshot, code, now + TimeDelta::hours(1));
                value = Some(interpolate(current, next, elapsed_fraction(now)));
            }
        }

        normalize(parameter, value, &self.presentation.normalize_options())
    }

    /// Returns the current absolute humidity in g/m³
    pub fn humidity_absolute(&self, now: DateTime<Utc>) -> Option<f64> {
        let snapshot = self.snapshot()?;
        let temperature = self.snapshot_value(&snapshot, Parameter::Temperature, now).and_then(|v| v.as_f64());
        let humidity = self.snapshot_value(&snapshot, Parameter::Humidity, now).and_then(|v| v.as_f64());

        absolute_humidity(temperature, humidity)
    }

    /// Returns the current sky condition, sunny becomes clear night outside daylight
    pub fn condition(&self, now: DateTime<Utc>) -> Option<Condition> {
        let snapshot = self.snapshot()?;
        let store = snapshot.store()?;

        condition_mode(store, &TimeWindow::containing(now, Interval::Hourly))
            .map(|c| resolve_condition(c, now, self.sun.as_ref()))
    }

    /// Returns the evaporation, which DWD reports as the sum of the last 24 hours,
    /// hence the window of the following day
    pub fn evaporation(&self, now: DateTime<Utc>) -> Option<f64> {
        let snapshot = self.snapshot()?;
        let window = TimeWindow::containing(now + TimeDelta::days(1), Interval::Daily);
        let raw = aggregate(snapshot.store()?, Parameter::Evaporation, &window, Parameter::Evaporation.descriptor().aggregation);

        self.display(Parameter::Evaporation, raw)
    }

    /// Returns the UV index for today and the next two days
    pub fn uv_index_daily(&self) -> UvIndexDaily {
        let snapshot = self.snapshot();
        let uv = |day: usize| snapshot.as_ref().and_then(|s| s.uv_index.get(day).copied().flatten());

        UvIndexDaily { today: uv(0), tomorrow: uv(1), dayaftertomorrow: uv(2) }
    }

    /// Returns the measurements of the station report in display units, codes
    /// without a known conversion are passed through as reported
    pub fn report_values(&self) -> BTreeMap<String, Option<DisplayValue>> {
        let Some(snapshot) = self.snapshot() else {
            return BTreeMap::new();
        };
        let Some(report) = snapshot.report.as_ref() else {
            return BTreeMap::new();
        };

        let options = self.presentation.normalize_options();
        report.record.codes()
            .map(|code| (code.to_string(), normalize_code(code, report.record.value(code), &options)))
            .collect()
    }

    /// Returns an hourly series of a parameter starting at the current hour, limited
    /// to the configured number of steps (0 means no limit)
    ///
    /// # Arguments
    ///
    /// * 'parameter' - the parameter to get
    /// * 'now' - current time
    pub fn hourly(&self, parameter: Parameter, now: DateTime<Utc>) -> Vec<SeriesPoint> {
        match self.snapshot() {
            Some(snapshot) => self.snapshot_hourly(&snapshot, parameter, now),
            None => Vec::new(),
        }
    }

    fn snapshot_hourly(&self, snapshot: &Snapshot, parameter: Parameter, now: DateTime<Utc>) -> Vec<SeriesPoint> {
        let Some(store) = snapshot.store() else {
            return Vec::new();
        };

        let options = self.presentation.normalize_options();
        upcoming(store, now, self.presentation.sensor_forecast_steps)
            .map(|(t, r)| SeriesPoint {
                datetime: hour_key(*t),
                value: normalize(parameter, r.value(parameter.code()), &options),
            })
            .collect()
    }

    /// Returns the hourly absolute humidity series, hours lacking input are skipped
    pub fn humidity_absolute_hourly(&self, now: DateTime<Utc>) -> Vec<SeriesPoint> {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        let temperature = self.snapshot_hourly(&snapshot, Parameter::Temperature, now);
        let humidity = self.snapshot_hourly(&snapshot, Parameter::Humidity, now);

        temperature.into_iter()
            .zip(humidity)
            .filter_map(|(t, h)| {
                let value = absolute_humidity(
                    t.value.and_then(|v| v.as_f64()),
                    h.value.and_then(|v| v.as_f64()),
                )?;
                Some(SeriesPoint { datetime: t.datetime, value: Some(DisplayValue::Number(value)) })
            })
            .collect()
    }

    /// Returns the condition of every forecast record
    pub fn condition_hourly(&self) -> Vec<SeriesPoint> {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        let Some(store) = snapshot.store() else {
            return Vec::new();
        };

        store.iter()
            .map(|(t, r)| SeriesPoint {
                datetime: hour_key(*t),
                value: r.condition_code()
                    .and_then(condition_for_code)
                    .map(|c| DisplayValue::Text(c.to_string())),
            })
            .collect()
    }

    /// Returns the hourly forecast list starting at the current hour
    pub fn forecast_hourly(&self, now: DateTime<Utc>) -> Vec<Forecast> {
        self.forecast_list(now, Interval::Hourly)
    }

    /// Returns the daily forecast list starting today
    pub fn forecast_daily(&self, now: DateTime<Utc>) -> Vec<Forecast> {
        let forecast = self.forecast_list(now, Interval::Daily);
        debug!("Daily Forecast data {:?}", forecast);
        forecast
    }

    fn forecast_list(&self, now: DateTime<Utc>, interval: Interval) -> Vec<Forecast> {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        let Some(store) = snapshot.store() else {
            return Vec::new();
        };
        if !store.is_in_timerange(now) {
            return Vec::new();
        }

        let start = match interval {
            Interval::Hourly => strip_to_hour(now),
            Interval::Daily => strip_to_day(now),
        };
        let steps = FORECAST_DAYS * 24 / interval.hours();

        let mut window = TimeWindow::new(start, interval);
        debug!("building {} forecast steps from {}", steps, window);
        let mut forecast = Vec::with_capacity(steps as usize);
        for _ in 0..steps {
            forecast.push(self.forecast_entry(&snapshot, store, &window, now));
            window = window.next();
        }

        forecast
    }

    /// Builds one forecast entry by aggregating the records of a window
    fn forecast_entry(&self, snapshot: &Snapshot, store: &ForecastStore, window: &TimeWindow, now: DateTime<Utc>) -> Forecast {
        let agg_by = |parameter: Parameter, kind: AggregationKind| aggregate(store, parameter, window, kind);
        let agg = |parameter: Parameter| agg_by(parameter, parameter.descriptor().aggregation);
        let num = |parameter: Parameter| self.display(parameter, agg(parameter));

        let condition = condition_mode(store, window).map(|c| {
            if window.interval.hours() < NIGHT_CONDITION_MAX_HOURS {
                resolve_condition(c, window.start, self.sun.as_ref())
            } else {
                c
            }
        });

        let offset = self.presentation.kelvin_offset;
        let (temperature, templow) = match window.interval {
            Interval::Hourly => (num(Parameter::Temperature), None),
            Interval::Daily => {
                let precision = if self.presentation.daily_temp_high_precision { 1 } else { 0 };
                (
                    agg(Parameter::Temperature).map(|t| normalize_temperature(t, offset, precision)),
                    agg_by(Parameter::Temperature, AggregationKind::Min).map(|t| normalize_temperature(t, offset, precision)),
                )
            }
        };

        let days_ahead = (window.start.date_naive() - now.date_naive()).num_days();
        let uv_index = if (0..UV_INDEX_DAYS).contains(&days_ahead) {
            snapshot.uv_index.get(days_ahead as usize).copied().flatten()
        } else {
            None
        };

        let additional = if self.presentation.additional_forecast_attributes {
            let (precipitation_duration, humidity_absolute) = match window.interval {
                Interval::Hourly => {
                    let temp_min = agg_by(Parameter::Temperature, AggregationKind::Min).map(|t| t - KELVIN_OFFSET);
                    (
                        num(Parameter::PrecipitationDuration),
                        absolute_humidity(temp_min, agg(Parameter::Humidity)),
                    )
                }
                // a day sums up the hourly durations
                Interval::Daily => {
                    let total = agg_by(Parameter::PrecipitationDuration, AggregationKind::Sum);
                    (self.display(Parameter::PrecipitationDuration, total), None)
                }
            };

            Some(AdditionalAttributes {
                evaporation: num(Parameter::Evaporation),
                fog_probability: num(Parameter::FogProbability),
                sun_irradiance: num(Parameter::SunIrradiance),
                visibility: num(Parameter::Visibility),
                sun_duration: num(Parameter::SunDuration),
                precipitation_duration,
                humidity: num(Parameter::Humidity),
                humidity_absolute,
            })
        } else {
            None
        };

        Forecast {
            datetime: window.start.format("%Y-%m-%dT%H:00:00Z").to_string(),
            condition,
            native_temperature: temperature,
            native_templow: templow,
            native_dew_point: num(Parameter::DewPoint),
            native_precipitation: num(Parameter::Precipitation),
            precipitation_probability: agg(Parameter::PrecipitationProbability).map(|p| p as i64),
            pressure: num(Parameter::Pressure),
            native_wind_speed: num(Parameter::WindSpeed),
            wind_gust_speed: num(Parameter::WindGusts),
            wind_bearing: normalize(Parameter::WindDirection, agg(Parameter::WindDirection), &self.presentation.normalize_options()),
            cloud_coverage: num(Parameter::CloudCoverage),
            uv_index,
            additional,
        }
    }

    /// Normalizes a raw value and returns it as a number
    fn display(&self, parameter: Parameter, raw: Option<f64>) -> Option<f64> {
        normalize(parameter, raw, &self.presentation.normalize_options()).and_then(|v| v.as_f64())
    }
}

fn strip_to_minute(date_time: DateTime<Utc>) -> DateTime<Utc> {
    date_time.duration_trunc(TimeDelta::minutes(1)).unwrap_or(date_time)
}

/// Returns the forecast value of a parameter for the hour the given time falls in
fn forecast_value(snapshot: &Snapshot, code: &str, date_time: DateTime<Utc>) -> Option<f64> {
    snapshot.store()?.at_hour(date_time)?.value(code)
}

/// Returns records from the current hour on, at most max_steps of them unless max_steps is 0
fn upcoming<'a>(
    store: &'a ForecastStore,
    now: DateTime<Utc>,
    max_steps: usize,
) -> impl Iterator<Item = (&'a DateTime<Utc>, &'a ForecastRecord)> {
    let hour = strip_to_hour(now);
    let limit = if max_steps == 0 { usize::MAX } else { max_steps };

    store.iter().filter(move |(t, _)| **t >= hour).take(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use chrono::{NaiveDate, TimeZone};
    use serde_json::{json, Map, Value};
    use crate::errors::ProviderError;
    use crate::manager_sun::Daylight;
    use crate::models::dwd_snapshot::RawSnapshot;
    use crate::models::station::StationGeography;
    use crate::parameter::WindDirectionType;

    /// Provider serving whatever document was put in last, or an error if none
    struct StaticProvider {
        document: Mutex<Option<Value>>,
    }

    impl StaticProvider {
        fn new(document: Option<Value>) -> StaticProvider {
            StaticProvider { document: Mutex::new(document) }
        }
    }

    impl ForecastProvider for Arc<StaticProvider> {
        fn fetch(&self, _station_id: &str) -> Result<RawSnapshot, ProviderError> {
            let document = self.document.lock().unwrap().clone()
                .ok_or_else(|| ProviderError("station unreachable".to_string()))?;
            Ok(serde_json::from_value(document)?)
        }
    }

    /// Daylight from 06:00 to 18:00 UTC every day
    struct FixedSun;

    impl SunTimes for FixedSun {
        fn daylight(&self, date: NaiveDate) -> Daylight {
            let midnight = date.and_time(Default::default()).and_utc();
            Daylight::Span { sunrise: midnight + TimeDelta::hours(6), sunset: midnight + TimeDelta::hours(18) }
        }
    }

    fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, h, m, 0).unwrap()
    }

    fn station() -> Station {
        Station {
            id: "10384".to_string(),
            name: "Berlin-Tempelhof".to_string(),
            geography: StationGeography { lat: 52.47, long: 13.40, elev: 48.0 },
        }
    }

    /// Two days of hourly data from 2024-05-01 00:00, sunny at night between 00 and 05
    fn document() -> Value {
        let mut forecast = Map::new();
        for h in 0..48i64 {
            let t = utc(1, 0, 0) + TimeDelta::hours(h);
            let hour = h % 24;
            let condition = if hour < 5 { "00" } else if hour == 14 { "61" } else { "02" };
            forecast.insert(hour_key(t), json!({
                "TTT": 280.0 + hour as f64,
                "Td": 275.0,
                "PPPP": 101_300.0,
                "FF": 2.0,
                "FX1": 5.0,
                "DD": 90.0,
                "RR1c": if hour == 14 { 1.2 } else { 0.0 },
                "wwP": 35.7,
                "N": 50.0,
                "humidity": 60.0,
                "VV": 20_000.0,
                "condition": condition,
            }));
        }

        json!({
            "issue_time": "2024-05-01T00:00:00Z",
            "forecast_data": forecast,
            "report_data": {"date": "01.05.24", "time": "10:00", "TTT": 290.1, "humidity": 55.0, "XX": 3.333},
            "uv_index": [3.0, 4.5, null],
        })
    }

    fn weather_data(presentation: Presentation, document: Option<Value>) -> (WeatherData, Arc<StaticProvider>) {
        let provider = Arc::new(StaticProvider::new(document));
        let data = WeatherData::new(station(), presentation, Box::new(provider.clone()), Box::new(FixedSun));
        (data, provider)
    }

    fn number(value: Option<DisplayValue>) -> f64 {
        value.and_then(|v| v.as_f64()).unwrap()
    }

    #[test]
    fn forecast_value_with_interpolation() {
        let (data, _) = weather_data(Presentation::default(), Some(document()));
        assert!(data.update(utc(1, 10, 30)));

        // 290 K at 10:00, 291 K at 11:00, half way is 290.5 K
        assert_eq!(number(data.weather_value(Parameter::Temperature, utc(1, 10, 30))), 17.4);
        assert_eq!(number(data.weather_value(Parameter::Pressure, utc(1, 10, 30))), 1013.0);
    }

    #[test]
    fn forecast_value_without_interpolation() {
        let presentation = Presentation { interpolate: false, ..Default::default() };
        let (data, _) = weather_data(presentation, Some(document()));
        data.update(utc(1, 10, 30));

        assert_eq!(number(data.weather_value(Parameter::Temperature, utc(1, 10, 30))), 16.9);
    }

    #[test]
    fn report_values_with_forecast_fallback() {
        let presentation = Presentation { data_type: DataType::Mixed, interpolate: false, ..Default::default() };
        let (data, _) = weather_data(presentation, Some(document()));
        data.update(utc(1, 10, 30));

        assert_eq!(number(data.weather_value(Parameter::Temperature, utc(1, 10, 30))), 17.0);
        assert_eq!(number(data.weather_value(Parameter::Pressure, utc(1, 10, 30))), 1013.0);
        assert_eq!(data.infos().report_time_utc, "2024-05-01 10:00");

        let presentation = Presentation { data_type: DataType::Report, interpolate: false, ..Default::default() };
        let (data, _) = weather_data(presentation, Some(document()));
        data.update(utc(1, 10, 30));
        assert_eq!(data.weather_value(Parameter::Pressure, utc(1, 10, 30)), None);
    }

    #[test]
    fn wind_direction_as_symbol() {
        let presentation = Presentation { wind_direction_type: WindDirectionType::Symbol, ..Default::default() };
        let (data, _) = weather_data(presentation, Some(document()));
        data.update(utc(1, 10, 0));

        assert_eq!(data.weather_value(Parameter::WindDirection, utc(1, 10, 0)), Some(DisplayValue::Text("O".to_string())));
    }

    #[test]
    fn failed_refresh_keeps_previous_snapshot() {
        let (data, provider) = weather_data(Presentation::default(), Some(document()));
        assert!(data.update(utc(1, 10, 0)));
        let before = data.snapshot().unwrap();

        *provider.document.lock().unwrap() = None;
        assert!(!data.update(utc(1, 10, 10)));
        assert!(Arc::ptr_eq(&before, &data.snapshot().unwrap()));

        *provider.document.lock().unwrap() = Some(json!({"forecast_data": {"garbage": {"TTT": 1.0}}}));
        assert!(data.refresh(utc(1, 10, 20)).is_err());
        assert!(Arc::ptr_eq(&before, &data.snapshot().unwrap()));
    }

    #[test]
    fn update_cadence() {
        let (data, _) = weather_data(Presentation::default(), Some(document()));
        assert!(data.is_update_time(utc(1, 10, 3)));
        data.update(utc(1, 10, 3));

        assert!(!data.is_update_time(utc(1, 10, 7)));
        assert!(data.is_update_time(utc(1, 10, 10)));
        data.update(utc(1, 10, 10));
        assert!(!data.is_update_time(utc(1, 10, 10) + TimeDelta::seconds(30)));
    }

    #[test]
    fn hourly_update_fills_current_hour() {
        let mut document = document();
        let forecast = document["forecast_data"].as_object_mut().unwrap();
        forecast.retain(|k, _| k.as_str() >= "2024-05-01T11:00:00.000Z");

        let presentation = Presentation { hourly_update: true, interpolate: false, ..Default::default() };
        let (data, _) = weather_data(presentation, Some(document));
        data.update(utc(1, 10, 30));

        // 11:00 holds 291 K and is cloned into 10:00
        assert_eq!(number(data.weather_value(Parameter::Temperature, utc(1, 10, 30))), 17.9);
    }

    #[test]
    fn current_condition_day_and_night() {
        let (data, _) = weather_data(Presentation::default(), Some(document()));
        data.update(utc(1, 2, 0));

        assert_eq!(data.condition(utc(1, 2, 0)), Some(Condition::ClearNight));
        assert_eq!(data.condition(utc(1, 14, 20)), Some(Condition::Rainy));
        assert_eq!(data.condition(utc(1, 12, 0)), Some(Condition::PartlyCloudy));
    }

    #[test]
    fn hourly_series_respects_step_limit() {
        let presentation = Presentation { sensor_forecast_steps: 3, ..Default::default() };
        let (data, _) = weather_data(presentation, Some(document()));
        data.update(utc(1, 10, 30));

        let series = data.hourly(Parameter::Temperature, utc(1, 10, 30));
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].datetime, "2024-05-01T10:00:00.000Z");
        assert_eq!(series[0].value, Some(DisplayValue::Number(16.9)));

        let humidity = data.humidity_absolute_hourly(utc(1, 10, 30));
        assert_eq!(humidity.len(), 3);
        assert_eq!(humidity[0].value, absolute_humidity(Some(16.9), Some(60.0)).map(DisplayValue::Number));
    }

    #[test]
    fn hourly_forecast_list() {
        let presentation = Presentation { additional_forecast_attributes: true, ..Default::default() };
        let (data, _) = weather_data(presentation, Some(document()));
        data.update(utc(1, 2, 15));

        let forecast = data.forecast_hourly(utc(1, 2, 15));
        assert_eq!(forecast.len(), 216);

        let night = &forecast[0];
        assert_eq!(night.datetime, "2024-05-01T02:00:00Z");
        assert_eq!(night.condition, Some(Condition::ClearNight));
        assert_eq!(night.native_temperature, Some(8.9));
        assert_eq!(night.precipitation_probability, Some(35));
        assert_eq!(night.native_wind_speed, Some(7.2));
        assert_eq!(night.wind_gust_speed, Some(18.0));
        assert_eq!(night.uv_index, Some(3.0));
        assert_eq!(night.additional.as_ref().unwrap().visibility, Some(20.0));

        let rain = &forecast[12];
        assert_eq!(rain.datetime, "2024-05-01T14:00:00Z");
        assert_eq!(rain.condition, Some(Condition::Rainy));
        assert_eq!(rain.native_precipitation, Some(1.2));

        // past the horizon every field is left out
        let beyond = forecast.last().unwrap();
        assert_eq!(beyond.condition, None);
        assert_eq!(beyond.native_temperature, None);
        assert_eq!(serde_json::to_value(beyond).unwrap(), json!({"datetime": beyond.datetime}));
    }

    #[test]
    fn daily_forecast_list() {
        let (data, _) = weather_data(Presentation::default(), Some(document()));
        data.update(utc(1, 9, 0));

        let forecast = data.forecast_daily(utc(1, 9, 0));
        assert_eq!(forecast.len(), 9);

        let today = &forecast[0];
        assert_eq!(today.datetime, "2024-05-01T00:00:00Z");
        assert_eq!(today.condition, Some(Condition::Rainy));
        assert_eq!(today.native_temperature, Some(30.0));
        assert_eq!(today.native_templow, Some(7.0));
        assert_eq!(today.native_precipitation, Some(1.2));
        assert_eq!(today.uv_index, Some(3.0));
        assert!(today.additional.is_none());

        assert_eq!(forecast[1].uv_index, Some(4.5));
        assert_eq!(forecast[2].native_temperature, None);
    }

    #[test]
    fn daily_forecast_keeps_sunny_at_night() {
        let mut document = document();
        let forecast = document["forecast_data"].as_object_mut().unwrap();
        for (key, record) in forecast.iter_mut() {
            if key.starts_with("2024-05-02") {
                let night = key.as_str() < "2024-05-02T05:00:00.000Z";
                record["condition"] = json!(if night { "00" } else { "-" });
            }
        }

        let (data, _) = weather_data(Presentation::default(), Some(document));
        data.update(utc(1, 9, 0));

        let daily = data.forecast_daily(utc(1, 9, 0));
        assert_eq!(daily[1].datetime, "2024-05-02T00:00:00Z");
        assert_eq!(daily[1].condition, Some(Condition::Sunny));

        let hourly = data.forecast_hourly(utc(1, 9, 0));
        let night = hourly.iter().find(|f| f.datetime == "2024-05-02T02:00:00Z").unwrap();
        assert_eq!(night.condition, Some(Condition::ClearNight));
    }

    #[test]
    fn report_values_in_display_units() {
        let (data, _) = weather_data(Presentation::default(), Some(document()));
        data.update(utc(1, 10, 0));

        let report = data.report_values();
        assert_eq!(report.get("TTT"), Some(&Some(DisplayValue::Number(17.0))));
        assert_eq!(report.get("humidity"), Some(&Some(DisplayValue::Number(55.0))));
        assert_eq!(report.get("XX"), Some(&Some(DisplayValue::Number(3.333))));
        assert_eq!(report.get("PPPP"), None);
    }

    #[test]
    fn current_absolute_humidity() {
        let presentation = Presentation { interpolate: false, ..Default::default() };
        let (data, _) = weather_data(presentation, Some(document()));
        data.update(utc(1, 10, 0));

        assert_eq!(data.humidity_absolute(utc(1, 10, 0)), absolute_humidity(Some(16.9), Some(60.0)));
    }

    #[test]
    fn nothing_before_first_update() {
        let (data, _) = weather_data(Presentation::default(), None);
        assert!(!data.update(utc(1, 10, 0)));

        assert_eq!(data.weather_value(Parameter::Temperature, utc(1, 10, 0)), None);
        assert!(data.forecast_daily(utc(1, 10, 0)).is_empty());
        assert!(data.hourly(Parameter::Temperature, utc(1, 10, 0)).is_empty());
        assert_eq!(data.infos().station_id, "10384");
        assert_eq!(data.infos().latest_update_utc, None);
    }
}
