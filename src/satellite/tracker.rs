//! Camera tracking state machine
//!
//! Governs how the viewport camera follows a satellite's default overlay:
//! immediate lock, animated fly-then-lock, and per-frame artificial follow
//! once the entity is the tracked target. All transitions run on the host's
//! single thread; the only suspension point is the fly-to future.

use std::cell::{Cell, RefCell};
use std::f64::consts::FRAC_PI_4;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use log::{debug, trace};
use thiserror::Error;

use crate::viewport::{
    FlightOutcome, HeadingPitchRange, PositionProperty, Primitive, PrimitiveId, Subscription,
    Viewer,
};

/// Camera offset used for the animated transition: level heading, looking
/// down at 45 degrees from 1580 km out.
pub const TRACK_OFFSET: HeadingPitchRange = HeadingPitchRange {
    heading_rad: 0.0,
    pitch_rad: -FRAC_PI_4,
    range_m: 1.58e6,
};

/// Tracking lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    /// Viewport is not following this entity.
    Untracked,
    /// Tracked-target slot points at the default overlay.
    Locked,
    /// A fly-to transition toward the default overlay is in flight.
    Animating,
    /// Per-frame listener is repositioning the camera every tick.
    ArtificiallyFollowing,
}

/// Camera tracking failures.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("entity has no default overlay to track")]
    NoTarget,
    #[error("an animated camera transition is already in flight")]
    TransitionInFlight,
    #[error("camera transition was interrupted before completion")]
    FlightInterrupted,
}

struct FollowSubscriptions {
    tick: Subscription<DateTime<Utc>>,
    retarget: Subscription<Option<PrimitiveId>>,
}

/// Follow-state machine bound to one entity's default overlay.
pub struct CameraTracker {
    viewer: Viewer,
    target: Rc<Primitive>,
    position: PositionProperty,
    state: Cell<TrackState>,
    /// Generation counter; a resolved flight applies nothing if superseded.
    flight_seq: Cell<u64>,
    follow: RefCell<Option<FollowSubscriptions>>,
}

impl CameraTracker {
    pub fn new(viewer: Viewer, target: Rc<Primitive>, position: PositionProperty) -> Rc<Self> {
        Rc::new(Self {
            viewer,
            target,
            position,
            state: Cell::new(TrackState::Untracked),
            flight_seq: Cell::new(0),
            follow: RefCell::new(None),
        })
    }

    pub fn state(&self) -> TrackState {
        self.state.get()
    }

    /// True iff the viewport's tracked target is this entity's default
    /// overlay.
    pub fn is_tracked(&self) -> bool {
        self.viewer.tracked_target() == Some(self.target.id())
    }

    /// Immediately set the viewport tracked target. Synchronous; preempts
    /// any in-flight animated transition.
    pub fn lock(&self) {
        self.flight_seq.set(self.flight_seq.get() + 1);
        self.state.set(TrackState::Locked);
        self.viewer.set_tracked_target(Some(self.target.id()));
    }

    /// Suspend the clock, fly the camera to the default overlay, then lock
    /// and restore the clock's prior running state.
    ///
    /// On cancellation the tracked target stays unset and the clock is left
    /// paused; the host owns any timeout on a flight that never resolves.
    pub async fn fly_and_lock(&self) -> Result<(), TrackError> {
        if self.state.get() == TrackState::Animating {
            return Err(TrackError::TransitionInFlight);
        }

        let clock_was_running = self.viewer.clock_running();
        self.viewer.set_tracked_target(None);
        self.viewer.set_clock_running(false);

        let seq = self.flight_seq.get() + 1;
        self.flight_seq.set(seq);
        self.state.set(TrackState::Animating);
        debug!("fly-to {} started", self.target.name().unwrap_or("satellite"));

        let arrival = self.viewer.fly_to(&self.target, TRACK_OFFSET).await;
        let superseded = self.flight_seq.get() != seq;

        match arrival {
            Ok(FlightOutcome::Completed) if !superseded => {
                self.viewer.set_clock_running(clock_was_running);
                self.state.set(TrackState::Locked);
                self.viewer.set_tracked_target(Some(self.target.id()));
                Ok(())
            }
            outcome => {
                if !superseded && self.state.get() == TrackState::Animating {
                    self.state.set(TrackState::Untracked);
                }
                debug!("fly-to interrupted: {outcome:?}, superseded: {superseded}");
                Err(TrackError::FlightInterrupted)
            }
        }
    }

    /// Begin per-frame camera repositioning toward the live position.
    ///
    /// Installs two listeners: a clock-tick handler that recomputes the
    /// camera placement, and a tracked-target watcher that tears both down
    /// as soon as the viewport targets something else.
    pub fn start_artificial_follow(self: &Rc<Self>) {
        if self.follow.borrow().is_some() {
            return;
        }
        self.state.set(TrackState::ArtificiallyFollowing);
        trace!("artificial follow started for {:?}", self.target.id());

        let tick = {
            let viewer = self.viewer.clone();
            let position = self.position.clone();
            let target_id = self.target.id();
            self.viewer.on_tick(move |time| {
                // A failed evaluation (outside ephemeris) skips this frame.
                if let Some(pos) = position.evaluate(*time) {
                    viewer.follow(target_id, pos);
                }
            })
        };
        let retarget = {
            let weak = Rc::downgrade(self);
            let target_id = self.target.id();
            self.viewer.on_tracked_target_changed(move |target| {
                if *target != Some(target_id) {
                    if let Some(tracker) = weak.upgrade() {
                        tracker.stop_artificial_follow();
                    }
                }
            })
        };

        *self.follow.borrow_mut() = Some(FollowSubscriptions { tick, retarget });
    }

    /// Tear down the follow listeners. Idempotent.
    pub fn stop_artificial_follow(&self) {
        let subscriptions = self.follow.borrow_mut().take();
        if let Some(subs) = subscriptions {
            subs.tick.cancel();
            subs.retarget.cancel();
            self.state.set(if self.is_tracked() {
                TrackState::Locked
            } else {
                TrackState::Untracked
            });
            trace!("artificial follow stopped for {:?}", self.target.id());
        }
    }

    /// Explicit release: stop following, clear the tracked-target slot if it
    /// is ours, and invalidate any in-flight transition.
    pub fn release(&self) {
        self.flight_seq.set(self.flight_seq.get() + 1);
        self.stop_artificial_follow();
        if self.is_tracked() {
            self.viewer.set_tracked_target(None);
        }
        self.state.set(TrackState::Untracked);
    }
}
