//! One addressable satellite in the viewer
//!
//! Composes the orbit sampler, the overlay set, and the camera tracker from
//! a raw TLE. The overlays carry time-varying properties that pull fresh
//! positions from the sampler every redraw; nothing here caches across
//! frames.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use glam::{DQuat, DVec3};
use log::{debug, info};
use thiserror::Error;

use crate::ground_track::GroundProjector;
use crate::orbital::{OrbitSampler, PropagationError, Sgp4Propagator, cartesians_from_flat};
use crate::satellite::config::SatelliteVisualConfig;
use crate::satellite::overlays::{OverlayKind, OverlaySet};
use crate::satellite::tracker::{CameraTracker, TrackError, TrackState};
use crate::tle::{TleError, TleRecord};
use crate::viewport::{
    BoxGraphics, ConeGraphics, Graphics, LabelGraphics, NearFarScalar, OrientationProperty,
    PathProperty, PointGraphics, PolylineGraphics, PositionProperty, Primitive, PrimitiveId,
    Rgba, Subscription, Viewer,
};

/// Errors from entity construction.
#[derive(Debug, Error)]
pub enum SatelliteError {
    #[error(transparent)]
    Tle(#[from] TleError),
    #[error(transparent)]
    Propagation(#[from] PropagationError),
}

/// A satellite with its marker, track, and sensor overlays plus camera
/// tracking, bound to one viewer.
pub struct SatelliteEntity {
    name: String,
    overlays: OverlaySet,
    tracker: Option<Rc<CameraTracker>>,
    /// Held for the entity's lifetime; starts artificial follow whenever the
    /// viewport begins tracking our default overlay.
    retarget_watch: Option<Subscription<Option<PrimitiveId>>>,
}

impl SatelliteEntity {
    /// Build an entity from raw TLE text, using the stock SGP4 propagator.
    pub fn from_tle(
        viewer: Viewer,
        tle: &str,
        config: SatelliteVisualConfig,
    ) -> Result<Self, SatelliteError> {
        let record = TleRecord::parse(tle)?;
        let name = record.display_name();
        let propagator = Sgp4Propagator::from_record(&record)?;
        let sampler = OrbitSampler::new(Rc::new(propagator));
        Ok(Self::with_sampler(viewer, name, sampler, config))
    }

    /// Build an entity over an already-constructed sampler (injected
    /// propagator).
    pub fn with_sampler(
        viewer: Viewer,
        name: String,
        sampler: OrbitSampler,
        config: SatelliteVisualConfig,
    ) -> Self {
        let position = position_property(&sampler);
        let mut overlays = OverlaySet::new(viewer.clone());

        let marker = build_marker(&name, &position, &config);
        let default_id = marker.id();
        overlays.add(OverlayKind::Satellite, Rc::clone(&marker));
        overlays.add(
            OverlayKind::OrbitTrack,
            build_orbit_track(&sampler, &config),
        );
        overlays.add(
            OverlayKind::GroundTrack,
            build_ground_track(&sampler, &config),
        );
        overlays.add(OverlayKind::Cone, build_cone(&position, &config));

        let tracker = CameraTracker::new(viewer.clone(), marker, position);
        let retarget_watch = {
            let tracker = Rc::clone(&tracker);
            viewer.on_tracked_target_changed(move |target| {
                if *target == Some(default_id) {
                    tracker.start_artificial_follow();
                }
            })
        };

        info!("satellite entity created: {name}");
        Self {
            name,
            overlays,
            tracker: Some(tracker),
            retarget_watch: Some(retarget_watch),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered overlay labels, in insertion order.
    pub fn components(&self) -> Vec<&'static str> {
        self.overlays.names()
    }

    /// Attach every overlay to the viewport.
    pub fn show(&self) {
        self.overlays.show_all();
    }

    /// Detach every overlay from the viewport (they stay registered).
    pub fn hide(&self) {
        self.overlays.hide_all();
    }

    pub fn show_component(&self, kind: OverlayKind) {
        self.overlays.show(kind);
    }

    pub fn hide_component(&self, kind: OverlayKind) {
        self.overlays.hide(kind);
    }

    pub fn is_component_shown(&self, kind: OverlayKind) -> bool {
        self.overlays.is_shown(kind)
    }

    /// Make the viewport camera follow this satellite.
    ///
    /// `animate = false` locks immediately with no suspension point;
    /// `animate = true` suspends the clock, flies the camera in, then locks
    /// and restores the clock. Without a default overlay this alters nothing
    /// and reports [`TrackError::NoTarget`].
    pub async fn track(&self, animate: bool) -> Result<(), TrackError> {
        let Some(tracker) = &self.tracker else {
            debug!("track({animate}) on {}: no default overlay", self.name);
            return Err(TrackError::NoTarget);
        };
        if animate {
            tracker.fly_and_lock().await
        } else {
            tracker.lock();
            Ok(())
        }
    }

    pub fn is_tracked(&self) -> bool {
        self.tracker.as_ref().is_some_and(|t| t.is_tracked())
    }

    pub fn track_state(&self) -> TrackState {
        self.tracker
            .as_ref()
            .map_or(TrackState::Untracked, |t| t.state())
    }

    /// Drop the default overlay and tracker wiring, leaving an entity that
    /// cannot be tracked. Exists for hosts that render overlays without a
    /// marker.
    pub fn clear_default_overlay(&mut self) {
        if let Some(tracker) = self.tracker.take() {
            tracker.release();
        }
        self.retarget_watch = None;
    }
}

impl Drop for SatelliteEntity {
    fn drop(&mut self) {
        self.overlays.hide_all();
        if let Some(tracker) = &self.tracker {
            tracker.release();
        }
    }
}

/// `(time) -> Cartesian` evaluator over the instantaneous position.
fn position_property(sampler: &OrbitSampler) -> PositionProperty {
    let sampler = sampler.clone();
    PositionProperty::new(move |time: DateTime<Utc>| match sampler.position(time) {
        Ok(geodetic) => Some(geodetic.to_cartesian()),
        Err(err) => {
            debug!("position unavailable at {time}: {err}");
            None
        }
    })
}

fn build_marker(
    name: &str,
    position: &PositionProperty,
    config: &SatelliteVisualConfig,
) -> Rc<Primitive> {
    let size = config.marker_size_m;
    let label = LabelGraphics {
        text: name.to_string(),
        scale: config.label_scale,
        pixel_offset: (20.0, 0.0),
        distance_display: (size * 10.0, 5.0e7),
        pixel_offset_scale_by_distance: NearFarScalar {
            near: 1.0e1,
            near_value: 10.0,
            far: 2.0e5,
            far_value: 1.0,
        },
    };
    let point = PointGraphics {
        pixel_size: 10.0,
        color: Rgba::WHITE,
    };
    let box_graphics = BoxGraphics {
        dimensions: DVec3::splat(size),
        color: Rgba::WHITE,
    };
    Primitive::new(
        Some(name.to_string()),
        Some(position.clone()),
        Graphics::Marker {
            point,
            label,
            box_graphics,
            view_from: DVec3::new(0.0, -1.2e6, 1.15e6),
        },
    )
}

fn build_orbit_track(sampler: &OrbitSampler, config: &SatelliteVisualConfig) -> Rc<Primitive> {
    let samples = config.orbit_track_samples;
    let sampler = sampler.clone();
    let positions = PathProperty::new(move |time| match sampler.compute_track(time, samples) {
        Ok(flat) => Some(cartesians_from_flat(&flat)),
        Err(err) => {
            debug!("orbit track unavailable at {time}: {err}");
            None
        }
    });
    Primitive::new(
        None,
        None,
        Graphics::Polyline(PolylineGraphics {
            width: config.polyline_width,
            color: Rgba::WHITE.with_alpha(0.2),
            dashed: false,
            positions,
        }),
    )
}

fn build_ground_track(sampler: &OrbitSampler, config: &SatelliteVisualConfig) -> Rc<Primitive> {
    let samples = config.orbit_track_samples;
    let sampler = sampler.clone();
    let positions = PathProperty::new(move |time| match sampler.compute_track(time, samples) {
        Ok(flat) => Some(cartesians_from_flat(&GroundProjector::project(&flat))),
        Err(err) => {
            debug!("ground track unavailable at {time}: {err}");
            None
        }
    });
    Primitive::new(
        None,
        None,
        Graphics::Polyline(PolylineGraphics {
            width: config.polyline_width,
            color: Rgba::WHITE.with_alpha(0.5),
            dashed: true,
            positions,
        }),
    )
}

fn build_cone(position: &PositionProperty, config: &SatelliteVisualConfig) -> Rc<Primitive> {
    let orientation = {
        let position = position.clone();
        OrientationProperty::new(move |time| position.evaluate(time).map(nadir_orientation))
    };
    Primitive::new(
        None,
        Some(position.clone()),
        Graphics::Cone {
            cone: ConeGraphics {
                radius_m: config.cone_radius_m,
                inner_half_angle_rad: 0.0,
                outer_half_angle_rad: config.cone_fov_deg.to_radians(),
                lateral_surface_color: Rgba::GOLD.with_alpha(0.15),
                intersection_color: Rgba::GOLD.with_alpha(0.3),
                intersection_width: 1.0,
            },
            orientation,
        },
    )
}

/// Quaternion turning the cone's +Z axis toward the Earth's center.
fn nadir_orientation(position: DVec3) -> DQuat {
    let down = (-position).normalize_or_zero();
    if down == DVec3::ZERO {
        return DQuat::IDENTITY;
    }
    DQuat::from_rotation_arc(DVec3::Z, down)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbital::{Geodetic, Propagator};
    use crate::test_support::{FakeViewer, poll_once};
    use crate::viewport::FlightOutcome;
    use chrono::TimeZone;
    use std::task::Poll;

    /// Fixed-point propagator so entity tests need no real ephemeris.
    struct FixedPropagator;

    impl Propagator for FixedPropagator {
        fn compute_track(
            &self,
            _time: DateTime<Utc>,
            sample_count: usize,
        ) -> Result<Vec<Geodetic>, PropagationError> {
            Ok(vec![Geodetic::new(0.5, 0.25, 500_000.0); sample_count])
        }
    }

    fn entity_on(fake: &FakeViewer) -> SatelliteEntity {
        SatelliteEntity::with_sampler(
            fake.viewer.clone(),
            "TESTSAT".to_string(),
            OrbitSampler::new(Rc::new(FixedPropagator)),
            SatelliteVisualConfig::default(),
        )
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_components_registered_in_order() {
        let fake = FakeViewer::new();
        let entity = entity_on(&fake);
        assert_eq!(
            entity.components(),
            vec!["Satellite", "OrbitTrack", "GroundTrack", "Cone"]
        );
    }

    #[test]
    fn test_show_then_hide_all_keeps_components() {
        let fake = FakeViewer::new();
        let entity = entity_on(&fake);

        entity.show();
        assert_eq!(fake.registry.borrow().len(), 4);

        entity.hide();
        assert_eq!(fake.registry.borrow().len(), 0);
        assert_eq!(entity.components().len(), 4, "hide must not deregister");
    }

    #[test]
    fn test_not_tracked_after_construction() {
        let fake = FakeViewer::new();
        let entity = entity_on(&fake);
        assert!(!entity.is_tracked());
        assert_eq!(entity.track_state(), TrackState::Untracked);
    }

    #[test]
    fn test_synchronous_track_locks_immediately() {
        let fake = FakeViewer::new();
        let entity = entity_on(&fake);

        let mut fut = Box::pin(entity.track(false));
        match poll_once(fut.as_mut()) {
            Poll::Ready(Ok(())) => {}
            other => panic!("track(false) must resolve immediately, got {other:?}"),
        }
        drop(fut);
        assert!(entity.is_tracked());
    }

    #[test]
    fn test_track_without_default_overlay_is_inert() {
        let fake = FakeViewer::new();
        let mut entity = entity_on(&fake);
        entity.clear_default_overlay();

        let clock_before = fake.viewer.clock_running();
        let mut fut = Box::pin(entity.track(true));
        match poll_once(fut.as_mut()) {
            Poll::Ready(Err(TrackError::NoTarget)) => {}
            other => panic!("expected NoTarget, got {other:?}"),
        }
        assert_eq!(fake.viewer.tracked_target(), None);
        assert_eq!(fake.viewer.clock_running(), clock_before);
    }

    #[test]
    fn test_becoming_tracked_starts_artificial_follow() {
        let fake = FakeViewer::new();
        let entity = entity_on(&fake);

        let mut fut = Box::pin(entity.track(false));
        assert!(matches!(poll_once(fut.as_mut()), Poll::Ready(Ok(()))));
        drop(fut);
        assert_eq!(entity.track_state(), TrackState::ArtificiallyFollowing);

        fake.viewer.tick(noon());
        assert_eq!(fake.follow_count(), 1, "tick drives a camera placement");
    }

    #[test]
    fn test_animated_track_full_cycle() {
        let fake = FakeViewer::new();
        let entity = entity_on(&fake);

        let mut fut = Box::pin(entity.track(true));
        assert!(poll_once(fut.as_mut()).is_pending());
        assert_eq!(entity.track_state(), TrackState::Animating);

        assert!(fake.complete_flight(FlightOutcome::Completed));
        assert!(matches!(poll_once(fut.as_mut()), Poll::Ready(Ok(()))));
        drop(fut);

        assert!(entity.is_tracked());
        assert!(fake.viewer.clock_running());
        assert_eq!(
            entity.track_state(),
            TrackState::ArtificiallyFollowing,
            "lock while tracked flips straight into artificial follow"
        );
    }

    #[test]
    fn test_position_property_evaluates_fixed_point() {
        let fake = FakeViewer::new();
        let entity = entity_on(&fake);

        let marker = entity.overlays.get(OverlayKind::Satellite).unwrap();
        let pos = marker
            .position()
            .expect("marker has a position property")
            .evaluate(noon())
            .expect("fixed propagator always evaluates");
        let expected = Geodetic::new(0.5, 0.25, 500_000.0).to_cartesian();
        assert!((pos - expected).length() < 1e-6);
    }

    #[test]
    fn test_drop_detaches_overlays_and_releases_tracking() {
        let fake = FakeViewer::new();
        let entity = entity_on(&fake);
        entity.show();

        let mut fut = Box::pin(entity.track(false));
        assert!(matches!(poll_once(fut.as_mut()), Poll::Ready(Ok(()))));
        drop(fut);

        drop(entity);
        assert_eq!(fake.registry.borrow().len(), 0, "overlays detached");
        assert_eq!(fake.viewer.tracked_target(), None, "tracking released");
    }

    #[test]
    fn test_nadir_orientation_points_down() {
        let position = DVec3::new(7.0e6, 0.0, 0.0);
        let q = nadir_orientation(position);
        let axis = q * DVec3::Z;
        assert!((axis - DVec3::new(-1.0, 0.0, 0.0)).length() < 1e-9);
    }
}
