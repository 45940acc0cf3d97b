use std::collections::BTreeSet;
use chrono::{DateTime, SecondsFormat, Utc};
use crate::condition::condition_for_code;
use crate::models::dwd_snapshot::{ForecastPayload, Snapshot};
use crate::models::forecast_record::{hour_key, ForecastStore, CONDITION_KEY};
use crate::models::station::Station;

/// Column order of the station table, unknown codes follow sorted by name
const COLUMNS: [(&str, &str); 17] = [
    (CONDITION_KEY, "condition"),
    ("TTT", "dry_bulb_temp"),
    ("Td", "dew_point"),
    ("PPPP", "pressure"),
    ("FF", "wind"),
    ("DD", "wind_dir"),
    ("FX1", "wind_gusts"),
    ("RR1c", "precip"),
    ("wwP", "precip_prob"),
    ("DRR1", "precip_dur"),
    ("N", "cloud_cover"),
    ("VV", "visibility"),
    ("SunD1", "sunshine_dur"),
    ("Rad1h", "radiation"),
    ("wwM", "fog_prop"),
    ("humidity", "rel_humidity"),
    ("PEvap", "evaporation"),
];

/// Renders a snapshot as a markdown document with a table of all forecast records
/// in raw provider units. Used to eyeball what a station delivers.
///
/// # Arguments
///
/// * 'station' - the configured station, used when the provider sends no station metadata
/// * 'snapshot' - snapshot to render
/// * 'now' - time of rendering
pub fn station_report(station: &Station, snapshot: &Snapshot, now: DateTime<Utc>) -> String {
    let issue_time = snapshot.issue_time
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, false))
        .unwrap_or_else(|| "-".to_string());
    let station = snapshot.station.as_ref().unwrap_or(station);
    let geo = &station.geography;

    let heading = format!(
        "## Station: {}\n{} ({}, {}, {} m)\n\n## Forecast from {} (updated at {})\n",
        station.id, station.name, geo.lat, geo.long, geo.elev,
        issue_time, now.to_rfc3339_opts(SecondsFormat::Secs, false),
    );

    let body = match &snapshot.forecast {
        ForecastPayload::Tabular(store) => table(store),
        ForecastPayload::Opaque(value) => format!("{:#}\n", value),
    };

    heading + &body
}

/// Returns the column order for the codes present in a store
fn column_codes(store: &ForecastStore) -> Vec<String> {
    let mut codes = store.iter()
        .flat_map(|(_, r)| r.codes().map(|c| c.to_string()))
        .collect::<BTreeSet<String>>();
    if store.iter().any(|(_, r)| r.condition_code().is_some()) {
        codes.insert(CONDITION_KEY.to_string());
    }

    let position = |code: &str| COLUMNS.iter().position(|(c, _)| *c == code).unwrap_or(COLUMNS.len());

    // BTreeSet is already sorted by name, a stable sort keeps that within the unknown group
    let mut codes = codes.into_iter().collect::<Vec<String>>();
    codes.sort_by_key(|c| position(c));

    codes
}

/// Renders the store as a markdown table, one row per record
fn table(store: &ForecastStore) -> String {
    let codes = column_codes(store);

    let mut header = vec!["timestamp"];
    header.extend(codes.iter().map(|code| {
        COLUMNS.iter().find(|(c, _)| *c == code.as_str()).map(|(_, label)| *label).unwrap_or(code.as_str())
    }));
    let mut out = format!("| {} |\n|{}\n", header.join(" | "), " --- |".repeat(header.len()));

    for (timestamp, record) in store.iter() {
        let mut row = vec![hour_key(*timestamp)];
        for code in &codes {
            let cell = if code == CONDITION_KEY {
                record.condition_code()
                    .and_then(condition_for_code)
                    .map(|c| c.to_string())
                    .unwrap_or_default()
            } else {
                record.value(code).map(|v| v.to_string()).unwrap_or_default()
            };
            row.push(cell);
        }
        out.push_str(&format!("| {} |\n", row.join(" | ")));
    }

    out
}
