use crate::body::{BodyDesc, RigidBody};
use crate::collision::Collision2D;
use crate::config::WorldConfig;
use crate::error::PhysicsError;
use crate::rect::Rect;
use crate::types::*;

/// Broad-phase contract shared by the quad tree and the linear index.
///
/// Both implementations must return the same set for the same registered boxes; the
/// partitioning is an optimization only.
pub trait SpatialIndex {
    /// Register a box, or re-register it if its id is already present.
    fn add_collision(&mut self, collision: Collision2D);

    /// Unregister by id. Unknown ids are ignored.
    fn remove_collision(&mut self, id: &str) -> Option<Collision2D>;

    fn get(&self, id: &str) -> Option<&Collision2D>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    /// Append every registered box intersecting `region` to `results`, once each,
    /// skipping the box whose id equals `exclude`.
    fn query_rect<'a>(
        &'a self,
        region: &Rect,
        exclude: Option<&str>,
        results: &mut Vec<&'a Collision2D>,
        analytics: Option<&mut QueryAnalytics>,
    );

    /// Boxes overlapping `query`, excluding `query` itself (matched by id).
    fn check_for_collision<'a>(
        &'a self,
        query: &Collision2D,
        results: &mut Vec<&'a Collision2D>,
        analytics: Option<&mut QueryAnalytics>,
    ) {
        self.query_rect(query.bounds(), Some(query.id()), results, analytics);
    }
}

/// Per-direction edge corrections with corner cancellation.
pub trait EdgeCorrectionApi {
    /// Correction (≥ 0) to add to `left` to clear valid left-edge overlaps.
    fn left_edge<B: AsRef<Rect>>(body: &Rect, others: &[B]) -> f32;

    /// Correction (≤ 0) to add to `left` to clear valid right-edge overlaps.
    fn right_edge<B: AsRef<Rect>>(body: &Rect, others: &[B]) -> f32;

    /// Correction (≤ 0) to add to `top` to clear valid top-edge overlaps.
    fn top_edge<B: AsRef<Rect>>(body: &Rect, others: &[B]) -> f32;

    /// Correction (≥ 0) to add to `top` to clear valid bottom-edge overlaps.
    fn bottom_edge<B: AsRef<Rect>>(body: &Rect, others: &[B]) -> f32;

    /// All four directions, evaluated independently.
    fn correct<B: AsRef<Rect>>(body: &Rect, others: &[B]) -> CollisionCorrection;

    /// Iteratively push `body` out of `others` by half of each signed edge overlap.
    fn relax<B: AsRef<Rect>>(body: &mut Rect, others: &[B], iterations: usize)
    -> CollisionCorrection;
}

/// Public API contract for the physics world (the physics manager).
pub trait PhysicsWorldApi {
    /// Construct a new world with the given configuration.
    fn new(cfg: WorldConfig) -> Self
    where
        Self: Sized;

    // --- Registration ------------------------------------------------------

    /// Register (or re-register) a static box.
    fn add_collider(&mut self, collider: Collision2D);

    fn remove_collider(&mut self, id: &str) -> Option<Collision2D>;

    /// Register a body; its box joins the index so other bodies collide with it.
    fn add_body(&mut self, body: RigidBody) -> Result<(), PhysicsError>;

    /// Build and register a body from a scene-loader request.
    fn create_body(&mut self, desc: BodyDesc) -> Result<(), PhysicsError>;

    fn remove_body(&mut self, id: &str) -> Option<RigidBody>;

    fn body(&self, id: &str) -> Option<&RigidBody>;

    fn body_mut(&mut self, id: &str) -> Option<&mut RigidBody>;

    /// Resize the world limits (pixels).
    fn set_world_bounds(&mut self, width: f32, height: f32);

    // --- Stepping ----------------------------------------------------------

    /// Step every body once, in registration order.
    fn update(&mut self, dt: f32);

    /// Drain and return the events accumulated since the last drain.
    fn drain_events(&mut self) -> Vec<PhysicsEvent>;

    // --- Queries -----------------------------------------------------------

    /// Boxes overlapping `query` through the quad tree.
    fn query<'a>(
        &'a self,
        query: &Collision2D,
        analytics: Option<&mut QueryAnalytics>,
    ) -> Vec<&'a Collision2D>;

    /// Same as [`PhysicsWorldApi::query`] through the linear list.
    fn query_linear<'a>(
        &'a self,
        query: &Collision2D,
        analytics: Option<&mut QueryAnalytics>,
    ) -> Vec<&'a Collision2D>;
}
