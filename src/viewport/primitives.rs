//! Renderer-agnostic visual primitive descriptions
//!
//! These records describe what the host should draw; the host owns how. Each
//! primitive gets a process-unique id so attach/detach and camera targeting
//! can refer to it without sharing the payload.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::DVec3;

use crate::viewport::property::{OrientationProperty, PathProperty, PositionProperty};

static NEXT_PRIMITIVE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a registered primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveId(u64);

impl PrimitiveId {
    fn next() -> Self {
        Self(NEXT_PRIMITIVE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const GOLD: Rgba = Rgba { r: 1.0, g: 0.843, b: 0.0, a: 1.0 };

    pub const fn with_alpha(self, a: f32) -> Rgba {
        Rgba { a, ..self }
    }
}

/// Scalar interpolated between a near and a far camera distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearFarScalar {
    pub near: f64,
    pub near_value: f64,
    pub far: f64,
    pub far_value: f64,
}

#[derive(Debug, Clone)]
pub struct PointGraphics {
    pub pixel_size: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone)]
pub struct LabelGraphics {
    pub text: String,
    pub scale: f64,
    pub pixel_offset: (f64, f64),
    /// Camera-distance window (meters) inside which the label is shown.
    pub distance_display: (f64, f64),
    pub pixel_offset_scale_by_distance: NearFarScalar,
}

#[derive(Debug, Clone)]
pub struct BoxGraphics {
    /// Edge lengths in meters.
    pub dimensions: DVec3,
    pub color: Rgba,
}

#[derive(Clone)]
pub struct PolylineGraphics {
    pub width: f64,
    pub color: Rgba,
    pub dashed: bool,
    pub positions: PathProperty,
}

#[derive(Clone)]
pub struct ConeGraphics {
    pub radius_m: f64,
    pub inner_half_angle_rad: f64,
    pub outer_half_angle_rad: f64,
    pub lateral_surface_color: Rgba,
    pub intersection_color: Rgba,
    pub intersection_width: f64,
}

/// Primitive payload variants.
pub enum Graphics {
    /// Point + label + box marker with a fixed camera view offset.
    Marker {
        point: PointGraphics,
        label: LabelGraphics,
        box_graphics: BoxGraphics,
        view_from: DVec3,
    },
    Polyline(PolylineGraphics),
    /// Sensor cone oriented by a time-varying quaternion.
    Cone {
        cone: ConeGraphics,
        orientation: OrientationProperty,
    },
}

/// One addable/removable visual primitive.
pub struct Primitive {
    id: PrimitiveId,
    name: Option<String>,
    position: Option<PositionProperty>,
    graphics: Graphics,
}

impl Primitive {
    pub fn new(
        name: Option<String>,
        position: Option<PositionProperty>,
        graphics: Graphics,
    ) -> Rc<Self> {
        Rc::new(Self {
            id: PrimitiveId::next(),
            name,
            position,
            graphics,
        })
    }

    pub fn id(&self) -> PrimitiveId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn position(&self) -> Option<&PositionProperty> {
        self.position.as_ref()
    }

    pub fn graphics(&self) -> &Graphics {
        &self.graphics
    }
}
