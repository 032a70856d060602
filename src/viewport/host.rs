//! Host collaborator contracts and the `Viewer` facade
//!
//! The render host is consumed through three injected traits: a primitive
//! registry, a camera controller, and a simulation clock. [`Viewer`] bundles
//! them with the two event sources the tracking logic listens to, and is the
//! only place that mutates shared viewport state. The facade emits events
//! only after releasing its collaborator borrows, so listeners are free to
//! read or mutate the same collaborators reentrantly.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use glam::DVec3;
use log::trace;
use tokio::sync::oneshot;

use crate::viewport::events::{EventSource, Subscription};
use crate::viewport::primitives::{Primitive, PrimitiveId};

/// Resolution of an asynchronous camera transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightOutcome {
    Completed,
    /// Interrupted by a newer flight or an explicit view change.
    Cancelled,
}

/// Camera offset relative to a target: heading/pitch in radians, range in
/// meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingPitchRange {
    pub heading_rad: f64,
    pub pitch_rad: f64,
    pub range_m: f64,
}

/// The host's set of active visual primitives.
pub trait PrimitiveRegistry {
    fn add(&mut self, primitive: Rc<Primitive>);
    /// Returns whether the primitive was present.
    fn remove(&mut self, id: PrimitiveId) -> bool;
    fn contains(&self, id: PrimitiveId) -> bool;
}

/// The host's camera: one tracked-target slot plus transition primitives.
pub trait CameraController {
    fn tracked_target(&self) -> Option<PrimitiveId>;
    fn set_tracked_target(&mut self, target: Option<PrimitiveId>);
    /// Begin an asynchronous transition toward `target`. The returned
    /// receiver resolves on completion; a dropped sender reads as
    /// cancellation. Bounding a never-resolving flight is the host's job.
    fn fly_to(
        &mut self,
        target: Rc<Primitive>,
        offset: HeadingPitchRange,
    ) -> oneshot::Receiver<FlightOutcome>;
    /// Per-frame manual camera placement toward a moving target.
    fn apply_follow(&mut self, target: PrimitiveId, position: DVec3);
}

/// The host's simulation clock.
pub trait SimulationClock {
    fn now(&self) -> DateTime<Utc>;
    fn is_running(&self) -> bool;
    fn set_running(&mut self, running: bool);
    fn advance_to(&mut self, time: DateTime<Utc>);
}

/// Single entry point to the externally-owned viewport state.
#[derive(Clone)]
pub struct Viewer {
    registry: Rc<RefCell<dyn PrimitiveRegistry>>,
    camera: Rc<RefCell<dyn CameraController>>,
    clock: Rc<RefCell<dyn SimulationClock>>,
    clock_tick: Rc<EventSource<DateTime<Utc>>>,
    tracked_target_changed: Rc<EventSource<Option<PrimitiveId>>>,
}

impl Viewer {
    pub fn new(
        registry: Rc<RefCell<dyn PrimitiveRegistry>>,
        camera: Rc<RefCell<dyn CameraController>>,
        clock: Rc<RefCell<dyn SimulationClock>>,
    ) -> Self {
        Self {
            registry,
            camera,
            clock,
            clock_tick: EventSource::new(),
            tracked_target_changed: EventSource::new(),
        }
    }

    // --- primitives -----------------------------------------------------

    pub fn add_primitive(&self, primitive: &Rc<Primitive>) {
        self.registry.borrow_mut().add(Rc::clone(primitive));
    }

    pub fn remove_primitive(&self, id: PrimitiveId) -> bool {
        self.registry.borrow_mut().remove(id)
    }

    pub fn contains_primitive(&self, id: PrimitiveId) -> bool {
        self.registry.borrow().contains(id)
    }

    // --- camera ---------------------------------------------------------

    pub fn tracked_target(&self) -> Option<PrimitiveId> {
        self.camera.borrow().tracked_target()
    }

    /// Update the tracked-target slot and notify listeners on change. The
    /// camera borrow is released before the event fires.
    pub fn set_tracked_target(&self, target: Option<PrimitiveId>) {
        let changed = {
            let mut camera = self.camera.borrow_mut();
            if camera.tracked_target() == target {
                false
            } else {
                camera.set_tracked_target(target);
                true
            }
        };
        if changed {
            trace!("tracked target changed: {target:?}");
            self.tracked_target_changed.emit(&target);
        }
    }

    pub fn fly_to(
        &self,
        target: &Rc<Primitive>,
        offset: HeadingPitchRange,
    ) -> oneshot::Receiver<FlightOutcome> {
        self.camera.borrow_mut().fly_to(Rc::clone(target), offset)
    }

    pub fn follow(&self, target: PrimitiveId, position: DVec3) {
        self.camera.borrow_mut().apply_follow(target, position);
    }

    // --- clock ----------------------------------------------------------

    pub fn current_time(&self) -> DateTime<Utc> {
        self.clock.borrow().now()
    }

    pub fn clock_running(&self) -> bool {
        self.clock.borrow().is_running()
    }

    pub fn set_clock_running(&self, running: bool) {
        self.clock.borrow_mut().set_running(running);
    }

    /// Advance the clock and fire the tick event. The clock borrow is
    /// released before listeners run.
    pub fn tick(&self, to: DateTime<Utc>) {
        self.clock.borrow_mut().advance_to(to);
        self.clock_tick.emit(&to);
    }

    // --- events ---------------------------------------------------------

    pub fn on_tick(
        &self,
        listener: impl Fn(&DateTime<Utc>) + 'static,
    ) -> Subscription<DateTime<Utc>> {
        self.clock_tick.subscribe(listener)
    }

    pub fn on_tracked_target_changed(
        &self,
        listener: impl Fn(&Option<PrimitiveId>) + 'static,
    ) -> Subscription<Option<PrimitiveId>> {
        self.tracked_target_changed.subscribe(listener)
    }
}
