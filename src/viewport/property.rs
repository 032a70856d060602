//! Pull-based time-varying values
//!
//! The host renderer re-evaluates these every redraw; they carry no state of
//! their own and must not care about call order. `None` means "no value this
//! frame" (typically a propagation failure) and tells the host to skip the
//! visual update rather than crash the render loop.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use glam::{DQuat, DVec3};

/// A shared `(time) -> Option<T>` evaluator.
pub struct TimeVaryingProperty<T> {
    eval: Rc<dyn Fn(DateTime<Utc>) -> Option<T>>,
}

impl<T> Clone for TimeVaryingProperty<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<T> TimeVaryingProperty<T> {
    pub fn new(eval: impl Fn(DateTime<Utc>) -> Option<T> + 'static) -> Self {
        Self {
            eval: Rc::new(eval),
        }
    }

    pub fn evaluate(&self, time: DateTime<Utc>) -> Option<T> {
        (self.eval)(time)
    }
}

impl<T: Clone + 'static> TimeVaryingProperty<T> {
    /// A property that ignores time entirely.
    pub fn constant(value: T) -> Self {
        Self::new(move |_| Some(value.clone()))
    }
}

/// Cartesian position in meters.
pub type PositionProperty = TimeVaryingProperty<DVec3>;
/// Orientation quaternion.
pub type OrientationProperty = TimeVaryingProperty<DQuat>;
/// Polyline vertices in meters.
pub type PathProperty = TimeVaryingProperty<Vec<DVec3>>;
