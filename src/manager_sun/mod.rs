use std::f64::consts::PI;
use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use trig::Trig;
use crate::models::station::StationGeography;

/// Sun elevation at sunrise/sunset at sea level, accounts for refraction and the sun's radius
const HORIZON_ANGLE: f64 = -0.833;

/// Daylight situation for a given date at a given place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Daylight {
    Span { sunrise: DateTime<Utc>, sunset: DateTime<Utc> },
    PolarDay,
    PolarNight,
}

/// Source of sunrise and sunset times
pub trait SunTimes {
    /// Returns the daylight span of the given date, times in UTC
    fn daylight(&self, date: NaiveDate) -> Daylight;

    /// Returns the date whose daylight span applies to the given time
    fn solar_date(&self, date_time: DateTime<Utc>) -> NaiveDate {
        date_time.date_naive()
    }
}

/// Calculates sunrise and sunset for a fixed station
pub struct SolarCalculator {
    geo: StationGeography,
}

impl SolarCalculator {
    /// Returns a SolarCalculator for the given station geography
    ///
    /// # Arguments
    ///
    /// * 'geo' - latitude, longitude and elevation of the station
    pub fn new(geo: StationGeography) -> SolarCalculator {
        SolarCalculator { geo }
    }
}

impl SunTimes for SolarCalculator {
    /// Sunrise and sunset are found from the hour angle where the sun passes the
    /// horizon, which is lowered for stations above sea level since they see further.
    fn daylight(&self, date: NaiveDate) -> Daylight {
        let declination = get_declination(date);
        let noon = get_solar_noon(date, self.geo.long);

        let horizon = HORIZON_ANGLE - 2.076 * self.geo.elev.max(0.0).sqrt() / 60.0;
        let cos_hour_angle = (horizon.sind() - self.geo.lat.sind() * declination.sind())
            / (self.geo.lat.cosd() * declination.cosd());

        if cos_hour_angle > 1.0 {
            Daylight::PolarNight
        } else if cos_hour_angle < -1.0 {
            Daylight::PolarDay
        } else {
            let half_day = 4.0 * cos_hour_angle.acosd();
            let midnight = date.and_time(Default::default()).and_utc();
            Daylight::Span {
                sunrise: midnight + minutes(noon - half_day),
                sunset: midnight + minutes(noon + half_day),
            }
        }
    }

    /// Local mean solar time decides the date, so west of Greenwich an evening
    /// after UTC midnight still belongs to the previous day's span.
    fn solar_date(&self, date_time: DateTime<Utc>) -> NaiveDate {
        (date_time + minutes(4.0 * self.geo.long)).date_naive()
    }
}

/// Calculates the declination given a medium exact algorithm as described
/// here: https://www.reuk.co.uk/wordpress/solar/solar-declination/
///
/// # Arguments
///
/// * 'date' - the date
pub fn get_declination(date: NaiveDate) -> f64 {
    let day = date.ordinal0() as f64;

    let earth_tilt: f64 = -23.44;
    let p1 = earth_tilt.sind();
    let p2 = 360.0 / 365.24 * (day + 10.0);
    let p3 = 360.0 / PI * 0.0167 * (360.0 / 365.24 * (day - 2.0)).sind();

    (p1 * (p2 + p3).cosd()).asind()
}

/// Calculates solar noon in minutes after UTC midnight using the equation of time
/// as described here: https://www.pveducation.org/pvcdrom/properties-of-sunlight/solar-time
///
/// # Arguments
///
/// * 'date' - the date
/// * 'long' - the longitude given in decimal format
pub fn get_solar_noon(date: NaiveDate, long: f64) -> f64 {
    let b = 360.0 / 365.0 * (date.ordinal0() as f64 - 81.0);
    let eot = 9.87 * (2.0 * b).sind() - 7.53 * b.cosd() - 1.5 * b.sind();

    720.0 - 4.0 * long - eot
}

fn minutes(value: f64) -> TimeDelta {
    TimeDelta::seconds((value * 60.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn span(geo: StationGeography, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        match SolarCalculator::new(geo).daylight(date) {
            Daylight::Span { sunrise, sunset } => (sunrise, sunset),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn declination_peaks_at_solstices() {
        let june = get_declination(NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
        let december = get_declination(NaiveDate::from_ymd_opt(2024, 12, 21).unwrap());

        assert!((june - 23.44).abs() < 0.2, "june declination {}", june);
        assert!((december + 23.44).abs() < 0.2, "december declination {}", december);
    }

    #[test]
    fn berlin_midsummer_within_minutes_of_almanac() {
        // Almanac: sunrise 02:43 UTC, sunset 19:33 UTC
        let geo = StationGeography { lat: 52.52, long: 13.40, elev: 34.0 };
        let (sunrise, sunset) = span(geo, NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());

        let rise = sunrise.hour() * 60 + sunrise.minute();
        let set = sunset.hour() * 60 + sunset.minute();
        assert!((rise as i32 - 163).abs() <= 10, "sunrise {}", sunrise);
        assert!((set as i32 - 1173).abs() <= 10, "sunset {}", sunset);
    }

    #[test]
    fn elevation_widens_daylight() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let low = span(StationGeography { lat: 47.42, long: 10.98, elev: 0.0 }, date);
        let high = span(StationGeography { lat: 47.42, long: 10.98, elev: 2964.0 }, date);

        assert!(high.0 < low.0);
        assert!(high.1 > low.1);
    }

    #[test]
    fn polar_regions() {
        let longyearbyen = SolarCalculator::new(StationGeography { lat: 78.22, long: 15.65, elev: 0.0 });

        assert_eq!(longyearbyen.daylight(NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()), Daylight::PolarDay);
        assert_eq!(longyearbyen.daylight(NaiveDate::from_ymd_opt(2024, 12, 21).unwrap()), Daylight::PolarNight);
    }

    #[test]
    fn solar_date_follows_longitude() {
        let new_york = SolarCalculator::new(StationGeography { lat: 40.78, long: -73.97, elev: 0.0 });
        let tokyo = SolarCalculator::new(StationGeography { lat: 35.68, long: 139.69, elev: 0.0 });
        let late_utc = Utc.with_ymd_and_hms(2024, 6, 22, 2, 0, 0).unwrap();
        let early_utc = Utc.with_ymd_and_hms(2024, 6, 21, 20, 0, 0).unwrap();

        assert_eq!(new_york.solar_date(late_utc), NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
        assert_eq!(tokyo.solar_date(early_utc), NaiveDate::from_ymd_opt(2024, 6, 22).unwrap());
        assert_eq!(new_york.solar_date(early_utc), NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
    }
}
