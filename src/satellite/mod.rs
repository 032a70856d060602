//! Satellite entity module
//!
//! One addressable unit per satellite: overlays, time-varying properties,
//! and the camera tracking state machine.

pub mod config;
pub mod entity;
pub mod overlays;
pub mod tracker;

pub use config::SatelliteVisualConfig;
pub use entity::{SatelliteEntity, SatelliteError};
pub use overlays::{Overlay, OverlayKind, OverlaySet};
pub use tracker::{CameraTracker, TRACK_OFFSET, TrackError, TrackState};
