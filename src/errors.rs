use std::fmt;
use std::fmt::Formatter;
use thiserror::Error;

/// Errors raised while turning provider data into a forecast store.
///
/// A malformed timestamp means the provider handed over corrupt content, hence
/// the whole snapshot is rejected rather than patched.
#[derive(Error, Debug, PartialEq)]
pub enum ForecastError {
    #[error("malformed forecast timestamp '{0}'")]
    MalformedTimestamp(String),
    #[error("malformed forecast record at {timestamp}: {reason}")]
    MalformedRecord { timestamp: String, reason: String },
}

#[derive(Error, Debug)]
#[error("error in communication with forecast provider: {0}")]
pub struct ProviderError(pub String);
impl From<std::io::Error> for ProviderError {
    fn from(e: std::io::Error) -> ProviderError {
        ProviderError(format!("io error: {}", e))
    }
}
impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> ProviderError {
        ProviderError(format!("json document error: {}", e))
    }
}

/// A refresh that failed, the previous snapshot stays in place
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

/// Errors from the worker's one-shot output
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error(transparent)]
    Refresh(#[from] RefreshError),
    #[error("output serialization failed: {0}")]
    Output(#[from] serde_json::Error),
}

/// Error depicting errors that occur while loading configuration
///
#[derive(Debug)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigError: {}", self.0)
    }
}
impl std::error::Error for ConfigError {}
impl From<&str> for ConfigError {
    fn from(e: &str) -> Self { ConfigError(e.to_string()) }
}
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self { ConfigError(e.to_string()) }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self { ConfigError(e.to_string()) }
}

/// Errors that stop the program before the refresh loop gets going
#[derive(Error, Debug)]
pub enum InitError {
    #[error("environment variable {0} is not set")]
    Environment(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("logger setup failed: {0}")]
    Logging(String),
}
impl From<log::SetLoggerError> for InitError {
    fn from(e: log::SetLoggerError) -> Self { InitError::Logging(e.to_string()) }
}
impl From<log4rs::config::runtime::ConfigErrors> for InitError {
    fn from(e: log4rs::config::runtime::ConfigErrors) -> Self { InitError::Logging(e.to_string()) }
}
