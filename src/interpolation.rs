use chrono::{DateTime, Utc};
use crate::parameter::round_to;
use crate::time_window::strip_to_hour;

/// Blends the value of the current hour with the next hour's value.
///
/// Forecast data comes in hourly steps, blending avoids jumps in live values
/// between the hourly knots. Without a next value the current value is returned
/// untouched.
///
/// # Arguments
///
/// * 'current' - raw value for the current hour
/// * 'next' - raw value for the next hour, if any
/// * 'fraction' - part of the current hour that has passed, 0.0 - 1.0
pub fn interpolate(current: f64, next: Option<f64>, fraction: f64) -> f64 {
    match next {
        Some(next) => round_to(current + (next - current) * fraction, 2),
        None => current,
    }
}

/// Returns how much of the current hour has passed, as a fraction
///
/// # Arguments
///
/// * 'now' - current time
pub fn elapsed_fraction(now: DateTime<Utc>) -> f64 {
    (now - strip_to_hour(now)).num_seconds() as f64 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn halfway_between_knots() {
        assert_eq!(interpolate(10.0, Some(20.0), 0.5), 15.0);
    }

    #[test]
    fn equal_knots_are_a_no_op() {
        for f in [0.0, 0.13, 0.5, 0.99] {
            assert_eq!(interpolate(281.25, Some(281.25), f), 281.25);
        }
    }

    #[test]
    fn missing_next_value_keeps_current() {
        assert_eq!(interpolate(281.237, None, 0.7), 281.237);
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(interpolate(280.0, Some(281.0), 1.0 / 3.0), 280.33);
    }

    #[test]
    fn fraction_from_minutes() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 5, 45, 0).unwrap();
        assert_eq!(elapsed_fraction(now), 0.75);
        let top = Utc.with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap();
        assert_eq!(elapsed_fraction(top), 0.0);
    }
}
