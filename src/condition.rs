use std::fmt;
use std::fmt::Formatter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::manager_sun::{Daylight, SunTimes};
use crate::time_window::strip_to_hour;

/// Sky condition as presented to Home Assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    LightningRainy,
    SnowyRainy,
    Snowy,
    Pouring,
    Rainy,
    Fog,
    Cloudy,
    #[serde(rename = "partlycloudy")]
    PartlyCloudy,
    Sunny,
    ClearNight,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::LightningRainy => "lightning-rainy",
            Condition::SnowyRainy     => "snowy-rainy",
            Condition::Snowy          => "snowy",
            Condition::Pouring        => "pouring",
            Condition::Rainy          => "rainy",
            Condition::Fog            => "fog",
            Condition::Cloudy         => "cloudy",
            Condition::PartlyCloudy   => "partlycloudy",
            Condition::Sunny          => "sunny",
            Condition::ClearNight     => "clear-night",
        }
    }
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// DWD present weather codes (ww) in order of precedence, most significant first.
///
/// When several codes occur in one window the one listed first wins, so
/// thunderstorms outrank any precipitation and precipitation outranks clouds.
pub const WEATHER_CODES: [(&str, Condition); 30] = [
    ("95", Condition::LightningRainy),
    ("57", Condition::SnowyRainy),
    ("56", Condition::SnowyRainy),
    ("67", Condition::SnowyRainy),
    ("66", Condition::SnowyRainy),
    ("86", Condition::Snowy),
    ("85", Condition::Snowy),
    ("84", Condition::SnowyRainy),
    ("83", Condition::SnowyRainy),
    ("82", Condition::Pouring),
    ("81", Condition::Rainy),
    ("80", Condition::Rainy),
    ("75", Condition::Snowy),
    ("73", Condition::Snowy),
    ("71", Condition::Snowy),
    ("69", Condition::SnowyRainy),
    ("68", Condition::SnowyRainy),
    ("65", Condition::Pouring),
    ("63", Condition::Rainy),
    ("61", Condition::Rainy),
    ("55", Condition::Rainy),
    ("53", Condition::Rainy),
    ("51", Condition::Rainy),
    ("49", Condition::Fog),
    ("45", Condition::Fog),
    ("04", Condition::Cloudy),
    ("03", Condition::Cloudy),
    ("02", Condition::PartlyCloudy),
    ("01", Condition::PartlyCloudy),
    ("00", Condition::Sunny),
];

/// Returns the precedence rank of a weather code, lower is more significant.
/// None for codes not in the table.
///
/// # Arguments
///
/// * 'code' - DWD weather code, e.g. "61"
pub fn code_priority(code: &str) -> Option<usize> {
    WEATHER_CODES.iter().position(|(c, _)| *c == code)
}

/// Translates a DWD weather code into a condition
pub fn condition_for_code(code: &str) -> Option<Condition> {
    WEATHER_CODES.iter().find(|(c, _)| *c == code).map(|(_, condition)| *condition)
}

/// Replaces sunny with clear night when the time lies outside the daylight span.
///
/// The span is taken for the station's solar date and compared on whole hours,
/// so the hour of sunrise and the hour of sunset are still considered day.
///
/// # Arguments
///
/// * 'raw' - condition as derived from forecast data
/// * 'date_time' - the time the condition applies to
/// * 'sun' - sunrise/sunset source for the station
pub fn resolve_condition(raw: Condition, date_time: DateTime<Utc>, sun: &dyn SunTimes) -> Condition {
    if raw != Condition::Sunny {
        return raw;
    }

    let hour = strip_to_hour(date_time);
    let is_night = match sun.daylight(sun.solar_date(date_time)) {
        Daylight::PolarNight => true,
        Daylight::PolarDay => false,
        Daylight::Span { sunrise, sunset } => {
            hour < strip_to_hour(sunrise) || hour > strip_to_hour(sunset)
        }
    };

    if is_night { Condition::ClearNight } else { raw }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta, TimeZone};
    use crate::manager_sun::SolarCalculator;
    use crate::models::station::StationGeography;

    fn berlin() -> SolarCalculator {
        SolarCalculator::new(StationGeography { lat: 52.52, long: 13.40, elev: 34.0 })
    }

    #[test]
    fn precedence_is_table_order() {
        assert!(code_priority("95") < code_priority("61"));
        assert!(code_priority("61") < code_priority("45"));
        assert!(code_priority("45") < code_priority("03"));
        assert!(code_priority("03") < code_priority("00"));
        assert_eq!(code_priority("-"), None);
        assert_eq!(condition_for_code("82"), Some(Condition::Pouring));
    }

    #[test]
    fn sunny_turns_clear_night_around_sunrise() {
        let sun = berlin();
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let Daylight::Span { sunrise, .. } = sun.daylight(date) else {
            panic!("expected a daylight span for Berlin in June");
        };

        let before = sunrise - TimeDelta::hours(1);
        let after = sunrise + TimeDelta::hours(1);
        assert_eq!(resolve_condition(Condition::Sunny, before, &sun), Condition::ClearNight);
        assert_eq!(resolve_condition(Condition::Sunny, after, &sun), Condition::Sunny);
    }

    #[test]
    fn sunny_turns_clear_night_after_sunset() {
        let sun = berlin();
        let late = Utc.with_ymd_and_hms(2024, 1, 15, 22, 0, 0).unwrap();
        let noon = Utc.with_ymd_and_hms(2024, 1, 15, 11, 0, 0).unwrap();

        assert_eq!(resolve_condition(Condition::Sunny, late, &sun), Condition::ClearNight);
        assert_eq!(resolve_condition(Condition::Sunny, noon, &sun), Condition::Sunny);
    }

    #[test]
    fn western_station_daylight_crosses_utc_midnight() {
        let sun = SolarCalculator::new(StationGeography { lat: 40.78, long: -73.97, elev: 10.0 });
        let Daylight::Span { sunrise, sunset } = sun.daylight(NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()) else {
            panic!("expected a daylight span for New York in June");
        };
        assert_ne!(sunrise.date_naive(), sunset.date_naive());

        let local_noon = Utc.with_ymd_and_hms(2024, 6, 21, 17, 0, 0).unwrap();
        let local_evening = Utc.with_ymd_and_hms(2024, 6, 21, 23, 30, 0).unwrap();
        let local_night = Utc.with_ymd_and_hms(2024, 6, 22, 3, 0, 0).unwrap();

        assert_eq!(resolve_condition(Condition::Sunny, sunrise + TimeDelta::hours(1), &sun), Condition::Sunny);
        assert_eq!(resolve_condition(Condition::Sunny, local_noon, &sun), Condition::Sunny);
        assert_eq!(resolve_condition(Condition::Sunny, local_evening, &sun), Condition::Sunny);
        assert_eq!(resolve_condition(Condition::Sunny, sunrise - TimeDelta::hours(1), &sun), Condition::ClearNight);
        assert_eq!(resolve_condition(Condition::Sunny, local_night, &sun), Condition::ClearNight);
    }

    #[test]
    fn eastern_station_sunrise_before_utc_midnight() {
        let sun = SolarCalculator::new(StationGeography { lat: -33.87, long: 151.21, elev: 0.0 });
        let local_morning = Utc.with_ymd_and_hms(2024, 12, 21, 22, 0, 0).unwrap();
        let local_evening = Utc.with_ymd_and_hms(2024, 12, 21, 6, 0, 0).unwrap();
        let local_midnight = Utc.with_ymd_and_hms(2024, 12, 21, 14, 0, 0).unwrap();

        assert_eq!(resolve_condition(Condition::Sunny, local_morning, &sun), Condition::Sunny);
        assert_eq!(resolve_condition(Condition::Sunny, local_evening, &sun), Condition::Sunny);
        assert_eq!(resolve_condition(Condition::Sunny, local_midnight, &sun), Condition::ClearNight);
    }

    /// Always the same daylight situation regardless of date
    struct Polar(Daylight);

    impl SunTimes for Polar {
        fn daylight(&self, _date: NaiveDate) -> Daylight {
            self.0
        }
    }

    #[test]
    fn polar_day_and_night() {
        let midnight = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        let noon = Utc.with_ymd_and_hms(2024, 12, 21, 12, 0, 0).unwrap();

        assert_eq!(resolve_condition(Condition::Sunny, midnight, &Polar(Daylight::PolarDay)), Condition::Sunny);
        assert_eq!(resolve_condition(Condition::Sunny, noon, &Polar(Daylight::PolarNight)), Condition::ClearNight);
        assert_eq!(resolve_condition(Condition::Cloudy, noon, &Polar(Daylight::PolarNight)), Condition::Cloudy);
    }

    #[test]
    fn other_conditions_pass_through() {
        let sun = berlin();
        let midnight = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

        assert_eq!(resolve_condition(Condition::Rainy, midnight, &sun), Condition::Rainy);
        assert_eq!(resolve_condition(Condition::Cloudy, midnight, &sun), Condition::Cloudy);
    }

    #[test]
    fn serializes_home_assistant_names() {
        assert_eq!(serde_json::to_string(&Condition::ClearNight).unwrap(), "\"clear-night\"");
        assert_eq!(serde_json::to_string(&Condition::PartlyCloudy).unwrap(), "\"partlycloudy\"");
        assert_eq!(serde_json::to_string(&Condition::LightningRainy).unwrap(), "\"lightning-rainy\"");
    }
}
