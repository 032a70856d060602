//! Visual configuration for satellite entities

use serde::{Deserialize, Serialize};

/// Knobs for the generated overlays. Defaults match the stock viewer look.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SatelliteVisualConfig {
    /// Marker box edge length in meters.
    pub marker_size_m: f64,
    /// Label text scale.
    pub label_scale: f64,
    /// Orbit/ground track polyline width in pixels.
    pub polyline_width: f64,
    /// Number of samples in the orbit track window.
    pub orbit_track_samples: usize,
    /// Sensor cone field of view in degrees (outer half-angle).
    pub cone_fov_deg: f64,
    /// Sensor cone radius in meters.
    pub cone_radius_m: f64,
}

impl Default for SatelliteVisualConfig {
    fn default() -> Self {
        Self {
            marker_size_m: 1000.0,
            label_scale: 0.8,
            polyline_width: 5.0,
            orbit_track_samples: 120,
            cone_fov_deg: 10.0,
            cone_radius_m: 1.0e7,
        }
    }
}
