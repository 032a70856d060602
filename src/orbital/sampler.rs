//! Windowed track sampling over the propagation seam

use std::rc::Rc;

use chrono::{DateTime, Utc};
use log::warn;

use crate::orbital::coordinates::Geodetic;
use crate::orbital::propagation::{PropagationError, Propagator};

/// Wraps a [`Propagator`] and exposes flat lon/lat/alt triple sequences.
///
/// Stateless by construction: every call forwards `(time, count)` to the
/// propagator, so it is safe to invoke any number of times per frame.
#[derive(Clone)]
pub struct OrbitSampler {
    propagator: Rc<dyn Propagator>,
}

impl OrbitSampler {
    pub fn new(propagator: Rc<dyn Propagator>) -> Self {
        Self { propagator }
    }

    /// Flat track of `sample_count` lon/lat/alt triples around `time`.
    ///
    /// The returned sequence always has length `3 * sample_count`. A count of
    /// zero is treated as one, matching the "at least the instantaneous
    /// position" contract.
    pub fn compute_track(
        &self,
        time: DateTime<Utc>,
        sample_count: usize,
    ) -> Result<Vec<f64>, PropagationError> {
        let expected = sample_count.max(1);
        let samples = self.propagator.compute_track(time, expected)?;
        if samples.len() != expected {
            warn!(
                "propagator returned {} samples instead of {}",
                samples.len(),
                expected
            );
            return Err(PropagationError::SampleCount {
                got: samples.len(),
                expected,
            });
        }
        let mut flat = Vec::with_capacity(samples.len() * 3);
        for g in &samples {
            flat.push(g.longitude_rad);
            flat.push(g.latitude_rad);
            flat.push(g.altitude_m);
        }
        Ok(flat)
    }

    /// Instantaneous position at `time`.
    pub fn position(&self, time: DateTime<Utc>) -> Result<Geodetic, PropagationError> {
        let samples = self.propagator.compute_track(time, 1)?;
        samples
            .first()
            .copied()
            .ok_or(PropagationError::SampleCount {
                got: 0,
                expected: 1,
            })
    }
}
