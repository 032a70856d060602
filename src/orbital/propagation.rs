//! Orbital propagation seam
//!
//! The viewer core never does orbital mechanics itself; it consumes a
//! [`Propagator`], a pure function from time and sample count to a geodetic
//! track. [`Sgp4Propagator`] is the stock implementation over the `sgp4`
//! crate; hosts and tests may inject anything else.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::orbital::coordinates::{Geodetic, ecef_km_to_geodetic, eci_to_ecef_km, gmst_rad};
use crate::tle::TleRecord;
use glam::DVec3;

const MINUTES_PER_DAY: f64 = 1440.0;

/// Errors from the propagation seam.
#[derive(Debug, Error)]
pub enum PropagationError {
    /// The requested time lies outside the ephemeris validity window.
    #[error("time {time} outside ephemeris validity window")]
    OutsideEphemeris { time: DateTime<Utc> },
    /// The underlying model rejected the elements or the propagation.
    #[error("propagation model error: {0}")]
    Model(String),
    /// The propagator broke its own sampling contract.
    #[error("propagator returned {got} samples, expected {expected}")]
    SampleCount { got: usize, expected: usize },
}

/// Black-box propagator contract.
///
/// `compute_track(time, n)` returns `n` geodetic samples forming an evenly
/// spaced past/future window around `time`; `n == 1` is the instantaneous
/// position. The spacing policy belongs to the implementation. Must be a pure
/// function of its arguments so callers may re-evaluate it every frame.
pub trait Propagator {
    fn compute_track(
        &self,
        time: DateTime<Utc>,
        sample_count: usize,
    ) -> Result<Vec<Geodetic>, PropagationError>;
}

/// Calculate minutes since epoch for SGP4 propagation
pub fn minutes_since_epoch(sim_utc: DateTime<Utc>, epoch: DateTime<Utc>) -> f64 {
    let delta = sim_utc - epoch;
    delta.num_seconds() as f64 / 60.0 + (delta.subsec_nanos() as f64) / 60.0 / 1.0e9
}

/// SGP4-backed propagator built from a TLE record.
pub struct Sgp4Propagator {
    constants: sgp4::Constants,
    epoch_utc: DateTime<Utc>,
    period_min: f64,
    validity_min: f64,
}

impl Sgp4Propagator {
    /// Default ephemeris validity: one week either side of the TLE epoch.
    pub const DEFAULT_VALIDITY_MIN: f64 = 7.0 * MINUTES_PER_DAY;

    pub fn from_record(record: &TleRecord) -> Result<Self, PropagationError> {
        // Build SGP4 model (sgp4 2.x): parse TLE -> Elements -> Constants
        let elements = sgp4::Elements::from_tle(
            record.name.clone(),
            record.line1.as_bytes(),
            record.line2.as_bytes(),
        )
        .map_err(|e| PropagationError::Model(e.to_string()))?;
        let mean_motion_rev_day = elements.mean_motion;
        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| PropagationError::Model(e.to_string()))?;
        if mean_motion_rev_day <= 0.0 {
            return Err(PropagationError::Model(format!(
                "non-positive mean motion {mean_motion_rev_day}"
            )));
        }
        Ok(Self {
            constants,
            epoch_utc: record.epoch_utc,
            period_min: MINUTES_PER_DAY / mean_motion_rev_day,
            validity_min: Self::DEFAULT_VALIDITY_MIN,
        })
    }

    /// Override the ephemeris validity window around the TLE epoch.
    pub fn with_validity(mut self, window: Duration) -> Self {
        self.validity_min = window.num_minutes() as f64;
        self
    }

    /// Orbital period derived from the TLE mean motion, in minutes.
    pub fn period_min(&self) -> f64 {
        self.period_min
    }

    fn geodetic_at(&self, time: DateTime<Utc>) -> Result<Geodetic, PropagationError> {
        let mins = minutes_since_epoch(time, self.epoch_utc);
        if mins.abs() > self.validity_min {
            return Err(PropagationError::OutsideEphemeris { time });
        }
        let state = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(mins))
            .map_err(|e| PropagationError::Model(e.to_string()))?;
        let pos = state.position; // [f64; 3] in km (TEME)
        let eci = DVec3::new(pos[0], pos[1], pos[2]);
        let ecef = eci_to_ecef_km(eci, gmst_rad(time));
        Ok(ecef_km_to_geodetic(ecef))
    }
}

impl Propagator for Sgp4Propagator {
    /// Samples one orbital period centered on `time`, endpoints included.
    fn compute_track(
        &self,
        time: DateTime<Utc>,
        sample_count: usize,
    ) -> Result<Vec<Geodetic>, PropagationError> {
        if sample_count <= 1 {
            return Ok(vec![self.geodetic_at(time)?]);
        }
        let step_min = self.period_min / (sample_count - 1) as f64;
        let mut track = Vec::with_capacity(sample_count);
        for i in 0..sample_count {
            let offset_min = i as f64 * step_min - self.period_min / 2.0;
            let sample_time = time
                + Duration::microseconds((offset_min * 60.0 * 1.0e6).round() as i64);
            track.push(self.geodetic_at(sample_time)?);
        }
        Ok(track)
    }
}
