//! satwatch — time-driven satellite visualization core
//!
//! Renders a satellite's real-time state in a host 3D geospatial viewer:
//! current position, predicted orbit track, ground-projected track, and a
//! sensor cone, all re-evaluated as the simulation clock advances, plus the
//! state machine that lets the viewport camera follow a moving satellite.
//!
//! The crate owns the sampling and tracking logic only. Orbital propagation
//! is an injected [`orbital::Propagator`] (an SGP4 implementation ships in
//! [`orbital::Sgp4Propagator`]), and the render host is consumed through the
//! [`viewport`] collaborator traits. Everything runs on the host's single
//! thread; the one asynchronous operation is the animated camera transition.
//!
//! ```no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use satwatch::satellite::{SatelliteEntity, SatelliteVisualConfig};
//! use satwatch::viewport::Viewer;
//! # fn host_collaborators() -> (
//! #     Rc<RefCell<dyn satwatch::viewport::PrimitiveRegistry>>,
//! #     Rc<RefCell<dyn satwatch::viewport::CameraController>>,
//! #     Rc<RefCell<dyn satwatch::viewport::SimulationClock>>,
//! # ) { unimplemented!() }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (registry, camera, clock) = host_collaborators();
//! let viewer = Viewer::new(registry, camera, clock);
//!
//! let tle = "ISS (ZARYA)\n\
//!     1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927\n\
//!     2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";
//! let iss = SatelliteEntity::from_tle(viewer, tle, SatelliteVisualConfig::default())?;
//! iss.show();
//! # Ok(())
//! # }
//! ```

pub mod ground_track;
pub mod orbital;
pub mod satellite;
pub mod tle;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_support;

pub use ground_track::GroundProjector;
pub use orbital::{OrbitSampler, PropagationError, Propagator, Sgp4Propagator};
pub use satellite::{OverlayKind, SatelliteEntity, SatelliteVisualConfig, TrackError, TrackState};
pub use tle::TleRecord;
pub use viewport::Viewer;
