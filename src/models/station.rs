use serde::Deserialize;

/// Where a station is, used for sunrise and sunset calculations
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StationGeography {
    pub lat: f64,
    pub long: f64,
    #[serde(default)]
    pub elev: f64,
}

/// A DWD station as selected in configuration or reported by the provider
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub geography: StationGeography,
}
