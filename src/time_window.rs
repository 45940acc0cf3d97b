use std::fmt;
use std::fmt::Formatter;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use log::debug;
use crate::models::forecast_record::{ForecastRecord, ForecastStore};

/// Length of an aggregation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Hourly,
    Daily,
}

impl Interval {
    pub fn hours(&self) -> i64 {
        match self {
            Interval::Hourly => 1,
            Interval::Daily  => 24,
        }
    }

    pub fn duration(&self) -> TimeDelta {
        TimeDelta::hours(self.hours())
    }
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for Interval {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Interval::Hourly => write!(f, "1h"),
            Interval::Daily  => write!(f, "24h"),
        }
    }
}

/// A half-open span of time [start, start + interval) to aggregate over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub interval: Interval,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, interval: Interval) -> TimeWindow {
        TimeWindow { start, interval }
    }

    /// Returns the window of the given interval that contains the given time
    ///
    /// # Arguments
    ///
    /// * 'now' - the time that must fall inside the window
    /// * 'interval' - window length
    pub fn containing(now: DateTime<Utc>, interval: Interval) -> TimeWindow {
        TimeWindow { start: window_start(now, interval), interval }
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + self.interval.duration()
    }

    /// Returns the window directly following this one
    pub fn next(&self) -> TimeWindow {
        TimeWindow { start: self.end(), interval: self.interval }
    }
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} +{}", self.start.format("%Y-%m-%d %H:%M"), self.interval)
    }
}

/// Truncates a time to the start of its hour
///
/// # Arguments
///
/// * 'date_time' - time to truncate
pub fn strip_to_hour(date_time: DateTime<Utc>) -> DateTime<Utc> {
    date_time.duration_trunc(TimeDelta::hours(1)).unwrap_or(date_time)
}

/// Truncates a time to UTC midnight of the same day
pub fn strip_to_day(date_time: DateTime<Utc>) -> DateTime<Utc> {
    date_time.date_naive().and_time(Default::default()).and_utc()
}

/// Returns the start of the most recent window of the given interval that begins
/// at or before now.
///
/// Windows are laid out on a grid starting at UTC midnight. A boundary equal to
/// now belongs to the window it starts.
///
/// # Arguments
///
/// * 'now' - current time
/// * 'interval' - window length
pub fn window_start(now: DateTime<Utc>, interval: Interval) -> DateTime<Utc> {
    let step = interval.duration();
    let mut start = strip_to_day(now);
    while start + step <= now {
        start += step;
    }

    start
}

/// Fills the current hour when hourly forecast data starts in the future.
///
/// The hourly product from DWD does not carry a record for the hour in progress.
/// To still have something to present for "now", a record is cloned into the slot
/// one hour before the first record: the record that covered the current hour in
/// the previous snapshot if there was one, otherwise the first record itself.
/// This compensates a data gap and is not meant as a general gap filling strategy.
///
/// Returns true if a record was inserted.
///
/// # Arguments
///
/// * 'store' - freshly fetched store, not yet visible to readers
/// * 'now' - current time
/// * 'carried' - the current hour record from the previous snapshot, if any
pub fn fill_current_hour_gap(store: &mut ForecastStore, now: DateTime<Utc>, carried: Option<ForecastRecord>) -> bool {
    if store.is_in_timerange(now) {
        return false;
    }

    let Some((first, first_record)) = store.first() else {
        return false;
    };
    let first = *first;
    let record = carried.unwrap_or_else(|| first_record.clone());

    let slot = first - TimeDelta::hours(1);
    debug!("cloning forecast record into {} to cover the current hour", slot);
    store.insert(slot, record);

    true
}
