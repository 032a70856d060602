//! Ground track projection
//!
//! Derives the surface-clamped variant of an orbit track by zeroing the
//! altitude slot of every lon/lat/alt triple in a flat sample sequence.

/// Pure, index-preserving ground projection over flat triple sequences.
pub struct GroundProjector;

impl GroundProjector {
    /// Zero every altitude element (flat index `i` with `(i + 1) % 3 == 0`),
    /// leaving longitude and latitude untouched. Total over any slice length
    /// and idempotent.
    pub fn project(samples: &[f64]) -> Vec<f64> {
        samples
            .iter()
            .enumerate()
            .map(|(i, v)| if (i + 1) % 3 == 0 { 0.0 } else { *v })
            .collect()
    }
}
