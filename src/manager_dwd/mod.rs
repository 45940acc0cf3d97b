use std::fs;
use std::path::PathBuf;
use log::debug;
use crate::errors::ProviderError;
use crate::models::dwd_snapshot::RawSnapshot;

/// Placeholder in a snapshot path that is replaced by the station id
pub const STATION_PLACEHOLDER: &str = "{station_id}";

/// Source of DWD forecast and report data.
///
/// Fetching, station lookup and parsing of DWD's own formats happen behind this
/// trait, implementations hand over a snapshot following the provider contract.
pub trait ForecastProvider {
    /// Fetches the latest snapshot for a station
    ///
    /// # Arguments
    ///
    /// * 'station_id' - DWD station id, e.g. "10384"
    fn fetch(&self, station_id: &str) -> Result<RawSnapshot, ProviderError>;
}

/// Provider reading snapshots that an external fetcher has dumped as json files
pub struct SnapshotFileProvider {
    path_template: String,
}

impl SnapshotFileProvider {
    /// Returns a SnapshotFileProvider for the given path.
    ///
    /// The path may contain "{station_id}" which is replaced on every fetch, which
    /// makes it possible to serve several stations from one directory.
    ///
    /// # Arguments
    ///
    /// * 'path_template' - path to the snapshot file
    pub fn new(path_template: &str) -> SnapshotFileProvider {
        SnapshotFileProvider { path_template: path_template.to_string() }
    }

    fn path(&self, station_id: &str) -> PathBuf {
        PathBuf::from(self.path_template.replace(STATION_PLACEHOLDER, station_id))
    }
}

impl ForecastProvider for SnapshotFileProvider {
    fn fetch(&self, station_id: &str) -> Result<RawSnapshot, ProviderError> {
        let path = self.path(station_id);
        debug!("reading snapshot for station {} from {}", station_id, path.display());

        let json = fs::read_to_string(&path)?;
        let snapshot: RawSnapshot = serde_json::from_str(&json)?;

        Ok(snapshot)
    }
}
