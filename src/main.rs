use log::error;
use crate::initialization::init;
use crate::worker::run;

mod aggregation;
mod condition;
mod config;
mod errors;
mod humidity;
mod initialization;
mod interpolation;
mod manager_dwd;
mod manager_sun;
mod models;
mod parameter;
mod station_report;
mod time_window;
mod weather_data;
mod worker;

fn main() -> anyhow::Result<()> {
    let (config, mgr) = init()?;

    if let Err(e) = run(&config, &mgr) {
        error!("{}", e);
        return Err(e.into());
    }

    Ok(())
}
