//! Named overlay collection for one satellite entity

use std::rc::Rc;

use log::debug;

use crate::viewport::{Primitive, Viewer};

/// The overlay kinds a satellite entity owns. Labels match the names shown
/// in layer toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Satellite,
    OrbitTrack,
    GroundTrack,
    Cone,
}

impl OverlayKind {
    pub fn label(self) -> &'static str {
        match self {
            OverlayKind::Satellite => "Satellite",
            OverlayKind::OrbitTrack => "OrbitTrack",
            OverlayKind::GroundTrack => "GroundTrack",
            OverlayKind::Cone => "Cone",
        }
    }
}

/// One registered overlay.
pub struct Overlay {
    pub kind: OverlayKind,
    pub primitive: Rc<Primitive>,
}

/// Insertion-ordered overlay registry with idempotent attach/detach.
///
/// Hiding never deregisters; it only detaches the primitive from the
/// viewport. Operations on unregistered kinds are no-ops.
pub struct OverlaySet {
    viewer: Viewer,
    overlays: Vec<Overlay>,
}

impl OverlaySet {
    pub fn new(viewer: Viewer) -> Self {
        Self {
            viewer,
            overlays: Vec::new(),
        }
    }

    /// Register an overlay. Registration happens once, at entity
    /// construction; a duplicate kind is ignored.
    pub fn add(&mut self, kind: OverlayKind, primitive: Rc<Primitive>) {
        if self.contains(kind) {
            debug!("overlay {} already registered, ignoring", kind.label());
            return;
        }
        self.overlays.push(Overlay { kind, primitive });
    }

    pub fn contains(&self, kind: OverlayKind) -> bool {
        self.overlays.iter().any(|o| o.kind == kind)
    }

    pub fn get(&self, kind: OverlayKind) -> Option<&Rc<Primitive>> {
        self.overlays
            .iter()
            .find(|o| o.kind == kind)
            .map(|o| &o.primitive)
    }

    /// Registered overlay labels, in insertion order.
    pub fn names(&self) -> Vec<&'static str> {
        self.overlays.iter().map(|o| o.kind.label()).collect()
    }

    /// Whether the overlay is currently attached to the viewport.
    pub fn is_shown(&self, kind: OverlayKind) -> bool {
        self.get(kind)
            .is_some_and(|p| self.viewer.contains_primitive(p.id()))
    }

    pub fn show(&self, kind: OverlayKind) {
        let Some(primitive) = self.get(kind) else {
            debug!("show: no overlay {} registered", kind.label());
            return;
        };
        if !self.viewer.contains_primitive(primitive.id()) {
            self.viewer.add_primitive(primitive);
        }
    }

    pub fn hide(&self, kind: OverlayKind) {
        let Some(primitive) = self.get(kind) else {
            debug!("hide: no overlay {} registered", kind.label());
            return;
        };
        if self.viewer.contains_primitive(primitive.id()) {
            self.viewer.remove_primitive(primitive.id());
        }
    }

    pub fn show_all(&self) {
        for overlay in &self.overlays {
            self.show(overlay.kind);
        }
    }

    pub fn hide_all(&self) {
        for overlay in &self.overlays {
            self.hide(overlay.kind);
        }
    }
}
