use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair. Longitude first, matching the GeoJSON axis order
/// used by upstream data sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}
