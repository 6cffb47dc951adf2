use std::ops::{BitOr, BitOrAssign};

use glam::Vec3;

use crate::collision::Collision2D;

/// User-defined opaque key carried through events (e.g., pack your entity id).
pub type ColKey = u64;

/// Bitmask of box edges involved in a contact or correction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CollisionEdges(pub u8);

impl CollisionEdges {
    pub const NONE: Self = Self(0x00);
    pub const LEFT: Self = Self(0x01);
    pub const RIGHT: Self = Self(0x02);
    pub const TOP: Self = Self(0x04);
    pub const BOTTOM: Self = Self(0x08);
    pub const ALL: Self = Self(0x0f);

    pub fn contains(self, other: CollisionEdges) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for CollisionEdges {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CollisionEdges {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Per-direction correction against a set of candidate boxes.
///
/// `left` and `bottom` are ≥ 0, `right` and `top` are ≤ 0; each can be added to the
/// matching coordinate of the moving box.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CollisionCorrection {
    pub edges: CollisionEdges,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// Diagnostic counters for spatial queries (performance only).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryAnalytics {
    pub nodes_tested: usize,
    pub intersection_tests: usize,
}

/// Shape of a spatial index, for debugging.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub entries: usize,
    pub nodes: usize,
    pub leaves: usize,
    /// Boxes not contained by the root region, scanned on every query.
    pub overflow: usize,
    /// Largest number of boxes held by a single node.
    pub max_bucket: usize,
}

/// One thing a body touched during its step.
#[derive(Clone, Debug, PartialEq)]
pub struct Contact {
    /// `None` when the body hit a world limit rather than another box.
    pub other: Option<Collision2D>,
    /// Edges of the body that were in contact.
    pub edges: CollisionEdges,
}

impl Contact {
    pub fn is_world_limit(&self) -> bool {
        self.other.is_none()
    }
}

/// Notifications raised by bodies during [`crate::PhysicsWorldApi::update`].
#[derive(Clone, Debug, PartialEq)]
pub enum PhysicsEvent {
    PositionChanged {
        body: String,
        tag: Option<ColKey>,
        position: Vec3,
    },
    Collision {
        body: String,
        tag: Option<ColKey>,
        contacts: Vec<Contact>,
    },
    OnFloor {
        body: String,
        tag: Option<ColKey>,
    },
}

impl PhysicsEvent {
    pub fn body(&self) -> &str {
        match self {
            PhysicsEvent::PositionChanged { body, .. }
            | PhysicsEvent::Collision { body, .. }
            | PhysicsEvent::OnFloor { body, .. } => body,
        }
    }
}

/// Debug statistics for the physics world.
#[derive(Copy, Clone, Debug, Default)]
pub struct WorldStats {
    pub colliders: usize,
    pub bodies: usize,
    pub active_bodies: usize,
    pub index: IndexStats,
}

/// Timing breakdown for the last completed `update`.
#[derive(Copy, Clone, Debug, Default)]
pub struct StepTiming {
    pub update_ms: f64,
    /// Time spent gathering candidates (linear list or index query).
    pub candidates_ms: f64,
    /// Time spent integrating and resolving bodies.
    pub resolve_ms: f64,
    pub bodies_stepped: usize,
    pub events_emitted: usize,
}
