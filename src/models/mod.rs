pub mod dwd_snapshot;
pub mod forecast;
pub mod forecast_record;
pub mod station;
