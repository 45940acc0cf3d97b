use std::env;
use log::info;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use crate::config::{load_config, Config, General};
use crate::errors::InitError;
use crate::manager_dwd::SnapshotFileProvider;
use crate::manager_sun::SolarCalculator;
use crate::weather_data::WeatherData;

/// Environment variable holding the path to the configuration file
const CONFIG_PATH: &str = "CONFIG_PATH";

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

/// Long living managers used by the worker
pub struct Mgr {
    pub weather: WeatherData,
}

/// Loads configuration, sets up logging and returns config and managers
///
pub fn init() -> Result<(Config, Mgr), InitError> {
    let config_path = env::var(CONFIG_PATH)
        .map_err(|_| InitError::Environment(CONFIG_PATH.to_string()))?;

    let config = load_config(&config_path)?;
    setup_logger(&config.general)?;

    info!("dwd_forecast version: {}", env!("CARGO_PKG_VERSION"));
    info!("station {} ({})", config.station.id, config.station.name);

    let provider = SnapshotFileProvider::new(&config.files.snapshot);
    let sun = SolarCalculator::new(config.station.geography);
    let weather = WeatherData::new(
        config.station.clone(),
        config.presentation.clone(),
        Box::new(provider),
        Box::new(sun),
    );

    Ok((config, Mgr { weather }))
}

/// Sets up log4rs with a file appender and/or a console appender
///
/// # Arguments
///
/// * 'general' - general configuration with log settings
fn setup_logger(general: &General) -> Result<(), InitError> {
    let mut builder = LogConfig::builder();
    let mut root = Root::builder();

    if let Some(log_path) = &general.log_path {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(log_path)
            .map_err(|e| InitError::Logging(format!("{}: {}", log_path, e)))?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    if general.log_to_stdout {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
        root = root.appender("stdout");
    }

    let log_config = builder.build(root.build(general.log_level))?;
    log4rs::init_config(log_config)?;

    Ok(())
}
