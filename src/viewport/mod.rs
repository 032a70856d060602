//! Viewport collaborator model
//!
//! Contracts for the externally-owned render host: primitive registry,
//! camera controller, simulation clock, time-varying value evaluators, and
//! the event plumbing the camera tracker hangs off.

pub mod events;
pub mod host;
pub mod primitives;
pub mod property;

pub use events::{EventSource, Subscription};
pub use host::{
    CameraController, FlightOutcome, HeadingPitchRange, PrimitiveRegistry, SimulationClock, Viewer,
};
pub use primitives::{
    BoxGraphics, ConeGraphics, Graphics, LabelGraphics, NearFarScalar, PointGraphics,
    PolylineGraphics, Primitive, PrimitiveId, Rgba,
};
pub use property::{OrientationProperty, PathProperty, PositionProperty, TimeVaryingProperty};
