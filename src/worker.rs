use std::thread;
use chrono::{DateTime, Local, Utc};
use log::{info, warn};
use serde_json::json;
use crate::config::Config;
use crate::errors::WorkerError;
use crate::initialization::Mgr;
use crate::parameter::Parameter;
use crate::station_report::station_report;
use crate::weather_data::WeatherData;

/// Runs the refresh loop, checking every ten seconds whether it is time to update
///
/// # Arguments
///
/// * 'config' - configuration
/// * 'mgr' - managers holding the weather data
pub fn run(config: &Config, mgr: &Mgr) -> Result<(), WorkerError> {
    if config.general.run_once {
        return run_once(config, mgr);
    }

    loop {
        let now = Utc::now();
        if mgr.weather.update(now) {
            print_msg(&summary(&mgr.weather, now), "Update");
        }

        thread::sleep(std::time::Duration::from_secs(10));
    }
}

/// Refreshes once and prints the station table, current values and forecasts
///
/// # Arguments
///
/// * 'config' - configuration
/// * 'mgr' - managers holding the weather data
fn run_once(config: &Config, mgr: &Mgr) -> Result<(), WorkerError> {
    let now = Utc::now();
    mgr.weather.refresh(now)?;

    if let Some(snapshot) = mgr.weather.snapshot() {
        println!("{}", station_report(&config.station, &snapshot, now));
    }

    let output = json!({
        "infos": mgr.weather.infos(),
        "current": current_values(&mgr.weather, now),
        "report": mgr.weather.report_values(),
        "hourly": hourly_values(&mgr.weather, now),
        "condition_hourly": mgr.weather.condition_hourly(),
        "humidity_absolute_hourly": mgr.weather.humidity_absolute_hourly(now),
        "condition": mgr.weather.condition(now),
        "humidity_absolute": mgr.weather.humidity_absolute(now),
        "evaporation": mgr.weather.evaporation(now),
        "uv_index": mgr.weather.uv_index_daily(),
        "forecast_hourly": mgr.weather.forecast_hourly(now),
        "forecast_daily": mgr.weather.forecast_daily(now),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Returns current values of all parameters keyed by provider code
fn current_values(weather: &WeatherData, now: DateTime<Utc>) -> serde_json::Map<String, serde_json::Value> {
    Parameter::ALL.iter()
        .map(|p| (p.code().to_string(), json!(weather.weather_value(*p, now))))
        .collect()
}

/// Returns the hourly series of all parameters keyed by provider code
fn hourly_values(weather: &WeatherData, now: DateTime<Utc>) -> serde_json::Map<String, serde_json::Value> {
    Parameter::ALL.iter()
        .map(|p| (p.code().to_string(), json!(weather.hourly(*p, now))))
        .collect()
}

/// Short text describing the state after an update
fn summary(weather: &WeatherData, now: DateTime<Utc>) -> String {
    let infos = weather.infos();
    let condition = weather.condition(now);
    if condition.is_none() {
        warn!("no forecast data covering {}", now);
    }

    let mut lines = vec![
        format!("Station: {} ({})", infos.station_name, infos.station_id),
        format!("Forecast issued: {}", infos.forecast_time_utc.unwrap_or_else(|| "-".to_string())),
        format!("Condition: {}", condition.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())),
    ];
    for p in [Parameter::Temperature, Parameter::Humidity, Parameter::Pressure, Parameter::WindSpeed] {
        let d = p.descriptor();
        let value = weather.weather_value(p, now).map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        lines.push(format!("{}: {} {}", d.code, value, d.display_unit));
    }

    lines.join("\n")
}

/// Prints a message with a timestamped caption and passes it on to the log
///
/// # Arguments
///
/// * 'message' - the message to print
/// * 'caption' - caption to use in the message
fn print_msg(message: &str, caption: &str) {
    let report_time = format!("{}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    let caption = format!("{} {} ", report_time, caption);

    println!("{:=<80}\n{}\n", caption, message);
    info!("{}", message.replace('\n', ", "));
}
