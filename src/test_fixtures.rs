use crate::mission::{ImagingRequest, SatelliteSpec};

const SATELLITE_JSON: &str = include_str!("../fixtures/satellite.json");
const REQUESTS_JSON: &str = include_str!("../fixtures/requests.json");

/// The demo satellite record from `fixtures/satellite.json`.
pub fn demo_satellite() -> SatelliteSpec {
    serde_json::from_str(SATELLITE_JSON).expect("fixture satellite.json is malformed")
}

/// The four-city demo catalog from `fixtures/requests.json`.
pub fn demo_requests() -> Vec<ImagingRequest> {
    serde_json::from_str(REQUESTS_JSON).expect("fixture requests.json is malformed")
}
