//! Orbital sampling module
//!
//! Wraps the injected propagation seam and converts between TEME, ECEF, and
//! geodetic representations for the visualization layer.

pub mod coordinates;
pub mod propagation;
pub mod sampler;

pub use coordinates::{
    EARTH_RADIUS_M, Geodetic, cartesians_from_flat, ecef_km_to_geodetic, eci_to_ecef_km, gmst_rad,
};
pub use propagation::{PropagationError, Propagator, Sgp4Propagator, minutes_since_epoch};
pub use sampler::OrbitSampler;
