use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::models::station::Station;
use crate::parameter::{KelvinOffset, NormalizeOptions, WindDirectionType};

/// Where current values are taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    Forecast,
    Report,
    Mixed,
}

impl DataType {
    pub fn uses_report(&self) -> bool {
        matches!(self, DataType::Report | DataType::Mixed)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Presentation {
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default)]
    pub wind_direction_type: WindDirectionType,
    #[serde(default = "default_true")]
    pub interpolate: bool,
    #[serde(default)]
    pub hourly_update: bool,
    #[serde(default)]
    pub additional_forecast_attributes: bool,
    #[serde(default)]
    pub daily_temp_high_precision: bool,
    #[serde(default)]
    pub sensor_forecast_steps: usize,
    #[serde(default)]
    pub kelvin_offset: KelvinOffset,
}

impl Default for Presentation {
    fn default() -> Self {
        Presentation {
            data_type: DataType::default(),
            wind_direction_type: WindDirectionType::default(),
            interpolate: true,
            hourly_update: false,
            additional_forecast_attributes: false,
            daily_temp_high_precision: false,
            sensor_forecast_steps: 0,
            kelvin_offset: KelvinOffset::default(),
        }
    }
}

impl Presentation {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            kelvin_offset: self.kelvin_offset,
            wind_direction: self.wind_direction_type,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Files {
    pub snapshot: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct General {
    pub log_path: Option<String>,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
    #[serde(default)]
    pub run_once: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub station: Station,
    #[serde(default)]
    pub presentation: Presentation,
    pub files: Files,
    pub general: General,
}

fn default_true() -> bool {
    true
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)?;
    parse_config(&toml)
}

/// Parses and validates configuration from a toml string
///
/// # Arguments
///
/// * 'toml' - configuration document
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(toml)?;

    let geo = &config.station.geography;
    if !(-90.0..=90.0).contains(&geo.lat) {
        return Err(ConfigError::from("station latitude out of range"));
    }
    if !(-180.0..=180.0).contains(&geo.long) {
        return Err(ConfigError::from("station longitude out of range"));
    }
    if config.station.id.trim().is_empty() {
        return Err(ConfigError::from("station id must not be empty"));
    }
    if config.general.log_path.is_none() && !config.general.log_to_stdout {
        return Err(ConfigError::from("no log target, set log_path or log_to_stdout"));
    }

    Ok(config)
}
