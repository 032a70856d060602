//! In-memory fakes for the host collaborator traits
//!
//! `FakeViewer` wires a fake registry, camera, and clock into a [`Viewer`]
//! so overlay and tracking behavior can be exercised without a render host.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use chrono::{DateTime, TimeZone, Utc};
use glam::DVec3;
use tokio::sync::oneshot;

use crate::viewport::{
    BoxGraphics, CameraController, FlightOutcome, Graphics, HeadingPitchRange, LabelGraphics,
    NearFarScalar, PointGraphics, Primitive, PrimitiveId, PrimitiveRegistry, Rgba,
    SimulationClock, Viewer,
};

/// Poll a future once against a no-op waker. The single-threaded tracking
/// futures only need re-polling after an explicit completion, so no real
/// executor is required.
pub fn poll_once<F: Future>(future: Pin<&mut F>) -> Poll<F::Output> {
    let mut cx = Context::from_waker(Waker::noop());
    future.poll(&mut cx)
}

/// Minimal marker primitive for tests that only need an id to target.
pub fn marker_primitive(name: &str) -> Rc<Primitive> {
    Primitive::new(
        Some(name.to_string()),
        None,
        Graphics::Marker {
            point: PointGraphics {
                pixel_size: 10.0,
                color: Rgba::WHITE,
            },
            label: LabelGraphics {
                text: name.to_string(),
                scale: 1.0,
                pixel_offset: (0.0, 0.0),
                distance_display: (0.0, 5.0e7),
                pixel_offset_scale_by_distance: NearFarScalar {
                    near: 1.0e1,
                    near_value: 10.0,
                    far: 2.0e5,
                    far_value: 1.0,
                },
            },
            box_graphics: BoxGraphics {
                dimensions: DVec3::splat(1000.0),
                color: Rgba::WHITE,
            },
            view_from: DVec3::ZERO,
        },
    )
}

/// Registry fake: a plain id -> primitive map.
#[derive(Default)]
pub struct FakeRegistry {
    items: HashMap<PrimitiveId, Rc<Primitive>>,
}

impl FakeRegistry {
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl PrimitiveRegistry for FakeRegistry {
    fn add(&mut self, primitive: Rc<Primitive>) {
        self.items.insert(primitive.id(), primitive);
    }

    fn remove(&mut self, id: PrimitiveId) -> bool {
        self.items.remove(&id).is_some()
    }

    fn contains(&self, id: PrimitiveId) -> bool {
        self.items.contains_key(&id)
    }
}

/// Camera fake: records the tracked target, pending flight, and follow
/// placements.
#[derive(Default)]
pub struct FakeCamera {
    tracked: Option<PrimitiveId>,
    pending_flight: Option<oneshot::Sender<FlightOutcome>>,
    last_flight: Option<(PrimitiveId, HeadingPitchRange)>,
    follow_calls: Vec<(PrimitiveId, DVec3)>,
    /// When set, flights resolve with this outcome as soon as they start.
    pub auto_outcome: Option<FlightOutcome>,
}

impl CameraController for FakeCamera {
    fn tracked_target(&self) -> Option<PrimitiveId> {
        self.tracked
    }

    fn set_tracked_target(&mut self, target: Option<PrimitiveId>) {
        self.tracked = target;
    }

    fn fly_to(
        &mut self,
        target: Rc<Primitive>,
        offset: HeadingPitchRange,
    ) -> oneshot::Receiver<FlightOutcome> {
        let (tx, rx) = oneshot::channel();
        self.last_flight = Some((target.id(), offset));
        if let Some(outcome) = self.auto_outcome {
            let _ = tx.send(outcome);
        } else {
            // A newer flight drops the previous sender, cancelling it.
            self.pending_flight = Some(tx);
        }
        rx
    }

    fn apply_follow(&mut self, target: PrimitiveId, position: DVec3) {
        self.follow_calls.push((target, position));
    }
}

/// Clock fake with a settable running flag.
pub struct FakeClock {
    now: DateTime<Utc>,
    running: bool,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            now: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            running: true,
        }
    }
}

impl SimulationClock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    fn advance_to(&mut self, time: DateTime<Utc>) {
        self.now = time;
    }
}

/// Bundled fakes plus the `Viewer` facade built over them.
pub struct FakeViewer {
    pub registry: Rc<RefCell<FakeRegistry>>,
    pub camera: Rc<RefCell<FakeCamera>>,
    pub clock: Rc<RefCell<FakeClock>>,
    pub viewer: Viewer,
}

impl FakeViewer {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let registry = Rc::new(RefCell::new(FakeRegistry::default()));
        let camera = Rc::new(RefCell::new(FakeCamera::default()));
        let clock = Rc::new(RefCell::new(FakeClock::default()));
        let viewer = Viewer::new(registry.clone(), camera.clone(), clock.clone());
        Self {
            registry,
            camera,
            clock,
            viewer,
        }
    }

    /// Resolve the pending flight, if any. The camera borrow is released
    /// before the receiver side can observe the result.
    pub fn complete_flight(&self, outcome: FlightOutcome) -> bool {
        let sender = self.camera.borrow_mut().pending_flight.take();
        match sender {
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }

    /// Drop the pending flight sender without resolving it.
    pub fn drop_flight(&self) {
        self.camera.borrow_mut().pending_flight = None;
    }

    pub fn last_flight(&self) -> Option<(PrimitiveId, HeadingPitchRange)> {
        self.camera.borrow().last_flight
    }

    pub fn follow_count(&self) -> usize {
        self.camera.borrow().follow_calls.len()
    }

    pub fn last_follow(&self) -> Option<(PrimitiveId, DVec3)> {
        self.camera.borrow().follow_calls.last().copied()
    }
}
