use std::fmt;
use std::fmt::Formatter;
use serde::{Deserialize, Serialize};
use crate::aggregation::AggregationKind;

/// Offset used by DWD integrations up to now when converting Kelvin to Celsius
pub const LEGACY_KELVIN_OFFSET: f64 = 273.1;

/// Physically correct offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

/// Which Kelvin to Celsius offset to use for temperatures.
///
/// Historic output was produced with 273.1, which makes every temperature
/// 0.05 degrees warmer than it should be. Legacy keeps those numbers stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KelvinOffset {
    #[default]
    Legacy,
    Exact,
}

impl KelvinOffset {
    pub fn value(&self) -> f64 {
        match self {
            KelvinOffset::Legacy => LEGACY_KELVIN_OFFSET,
            KelvinOffset::Exact  => KELVIN_OFFSET,
        }
    }
}

/// How wind direction is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindDirectionType {
    #[default]
    Degrees,
    Symbol,
}

/// Presentation switches handed to the normalizer on every call
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizeOptions {
    pub kelvin_offset: KelvinOffset,
    pub wind_direction: WindDirectionType,
}

/// A value ready for presentation, compass labels are the only text values
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Number(f64),
    Text(String),
}

impl DisplayValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DisplayValue::Number(v) => Some(*v),
            DisplayValue::Text(_) => None,
        }
    }
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            DisplayValue::Number(v) => write!(f, "{}", v),
            DisplayValue::Text(s)   => write!(f, "{}", s),
        }
    }
}

/// Forecast parameters known to the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Temperature,
    DewPoint,
    Pressure,
    WindSpeed,
    WindDirection,
    WindGusts,
    Precipitation,
    PrecipitationProbability,
    PrecipitationDuration,
    CloudCoverage,
    Visibility,
    SunDuration,
    SunIrradiance,
    FogProbability,
    Humidity,
    Evaporation,
}

/// Conversion from native to display unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    Identity,
    KelvinToCelsius,
    Divide(f64),
    Multiply(f64),
    Compass,
}

/// Static description of how a parameter is converted, rounded and aggregated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDescriptor {
    pub code: &'static str,
    pub display_unit: &'static str,
    pub conversion: Conversion,
    pub precision: i32,
    pub aggregation: AggregationKind,
}

impl Parameter {
    pub const ALL: [Parameter; 16] = [
        Parameter::Temperature,
        Parameter::DewPoint,
        Parameter::Pressure,
        Parameter::WindSpeed,
        Parameter::WindDirection,
        Parameter::WindGusts,
        Parameter::Precipitation,
        Parameter::PrecipitationProbability,
        Parameter::PrecipitationDuration,
        Parameter::CloudCoverage,
        Parameter::Visibility,
        Parameter::SunDuration,
        Parameter::SunIrradiance,
        Parameter::FogProbability,
        Parameter::Humidity,
        Parameter::Evaporation,
    ];

    /// Returns the static descriptor of the parameter
    pub fn descriptor(&self) -> ParameterDescriptor {
        use AggregationKind::*;
        use Conversion::*;

        let (code, display_unit, conversion, precision, aggregation) = match self {
            Parameter::Temperature              => ("TTT", "°C", KelvinToCelsius, 1, Max),
            Parameter::DewPoint                 => ("Td", "°C", KelvinToCelsius, 1, Max),
            Parameter::Pressure                 => ("PPPP", "hPa", Divide(100.0), 1, Max),
            Parameter::WindSpeed                => ("FF", "km/h", Multiply(3.6), 1, Max),
            Parameter::WindDirection            => ("DD", "°", Compass, 0, Avg),
            Parameter::WindGusts                => ("FX1", "km/h", Multiply(3.6), 1, Max),
            Parameter::Precipitation            => ("RR1c", "mm", Identity, 1, Sum),
            Parameter::PrecipitationProbability => ("wwP", "%", Identity, 0, Max),
            Parameter::PrecipitationDuration    => ("DRR1", "s", Identity, 0, Max),
            Parameter::CloudCoverage            => ("N", "%", Identity, 0, Max),
            Parameter::Visibility               => ("VV", "km", Divide(1000.0), 1, Min),
            Parameter::SunDuration              => ("SunD1", "s", Identity, 0, Sum),
            Parameter::SunIrradiance            => ("Rad1h", "Wh/m²", Divide(3.6), 0, Sum),
            Parameter::FogProbability           => ("wwM", "%", Identity, 0, Max),
            Parameter::Humidity                 => ("humidity", "%", Identity, 1, Max),
            Parameter::Evaporation              => ("PEvap", "mm", Identity, 1, Max),
        };

        ParameterDescriptor { code, display_unit, conversion, precision, aggregation }
    }

    pub fn code(&self) -> &'static str {
        self.descriptor().code
    }

    /// Looks up a parameter by its provider code
    ///
    /// # Arguments
    ///
    /// * 'code' - provider code, e.g. "TTT"
    pub fn from_code(code: &str) -> Option<Parameter> {
        Parameter::ALL.iter().copied().find(|p| p.code() == code)
    }
}

/// Converts a raw value to its display unit and rounds it to the parameter's precision
///
/// # Arguments
///
/// * 'parameter' - the parameter the value belongs to
/// * 'raw' - raw value in native unit
/// * 'options' - presentation switches
pub fn normalize(parameter: Parameter, raw: Option<f64>, options: &NormalizeOptions) -> Option<DisplayValue> {
    let raw = raw?;
    let descriptor = parameter.descriptor();

    let value = match descriptor.conversion {
        Conversion::Identity        => round_to(raw, descriptor.precision),
        Conversion::KelvinToCelsius => normalize_temperature(raw, options.kelvin_offset, descriptor.precision),
        Conversion::Divide(d)       => round_to(raw / d, descriptor.precision),
        Conversion::Multiply(m)     => round_to(raw * m, descriptor.precision),
        Conversion::Compass => {
            let degrees = round_to(raw, descriptor.precision);
            return Some(match options.wind_direction {
                WindDirectionType::Degrees => DisplayValue::Number(degrees),
                WindDirectionType::Symbol  => DisplayValue::Text(compass_label(degrees).to_string()),
            });
        }
    };

    Some(DisplayValue::Number(value))
}

/// Same as normalize but keyed by provider code, unknown codes pass through unconverted
///
/// # Arguments
///
/// * 'code' - provider parameter code
/// * 'raw' - raw value in native unit
/// * 'options' - presentation switches
pub fn normalize_code(code: &str, raw: Option<f64>, options: &NormalizeOptions) -> Option<DisplayValue> {
    match Parameter::from_code(code) {
        Some(parameter) => normalize(parameter, raw, options),
        None => raw.map(DisplayValue::Number),
    }
}

/// Converts a Kelvin temperature to Celsius
///
/// # Arguments
///
/// * 'kelvin' - temperature in Kelvin
/// * 'offset' - which Kelvin offset to use
/// * 'decimals' - number of decimals to round to
pub fn normalize_temperature(kelvin: f64, offset: KelvinOffset, decimals: i32) -> f64 {
    round_to(kelvin - offset.value(), decimals)
}

/// Maps degrees to one of eight compass labels, lower bucket bounds are inclusive
///
/// # Arguments
///
/// * 'degrees' - wind direction in degrees
pub fn compass_label(degrees: f64) -> &'static str {
    if degrees < 22.5 {
        "N"
    } else if degrees < 67.5 {
        "NO"
    } else if degrees < 112.5 {
        "O"
    } else if degrees < 157.5 {
        "SO"
    } else if degrees < 202.5 {
        "S"
    } else if degrees < 247.5 {
        "SW"
    } else if degrees < 292.5 {
        "W"
    } else if degrees < 337.5 {
        "NW"
    } else {
        "N"
    }
}

/// Rounds to the given number of decimals, halves go to the even neighbour
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
