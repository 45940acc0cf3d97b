use crate::parameter::round_to;

/// Molar mass of water in g/mol
const MOLAR_MASS_WATER: f64 = 18.016;

/// Universal gas constant in l·bar/(mol·K)
const GAS_CONSTANT: f64 = 0.083143;

/// Calculates absolute humidity in g/m³ from temperature and relative humidity.
///
/// Saturation vapour pressure follows the Magnus formula, the result is
/// rounded to one decimal.
///
/// # Arguments
///
/// * 'temperature' - temperature in °C
/// * 'relative_humidity' - relative humidity in %
pub fn absolute_humidity(temperature: Option<f64>, relative_humidity: Option<f64>) -> Option<f64> {
    let t = temperature?;
    let rh = relative_humidity?;

    let vapour_pressure = 6.112 * ((17.67 * t) / (t + 243.5)).exp() * rh;
    let value = (vapour_pressure * MOLAR_MASS_WATER) / ((273.15 + t) * GAS_CONSTANT * 100.0);

    Some(round_to(value, 1))
}
