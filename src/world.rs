use std::collections::HashSet;
use std::time::Instant;

use glam::Vec3;
use tracing::{debug, info, warn};

use crate::api::{PhysicsWorldApi, SpatialIndex};
use crate::body::{BodyDesc, RigidBody, StepContext};
use crate::collision::Collision2D;
use crate::config::{CandidateSource, WorldConfig};
use crate::error::PhysicsError;
use crate::linear::LinearIndex;
use crate::quadtree::QuadTree;
use crate::types::*;

/// Physics manager: owns the static boxes, the bodies and both spatial indexes, and
/// steps every body once per `update` in registration order.
///
/// Bodies see each other through the indexes, so a body stepped later in a frame
/// resolves against the already-committed position of bodies stepped before it.
pub struct PhysicsWorld {
    pub cfg: WorldConfig,
    pub frame_counter: u32,

    tree: QuadTree,
    linear: LinearIndex,
    colliders: HashSet<String>,
    bodies: Vec<RigidBody>,

    events: Vec<PhysicsEvent>,
    dropped_events: usize,

    last_timing: Option<StepTiming>,
}

impl PhysicsWorld {
    /// Like [`PhysicsWorldApi::new`], but rejects an out-of-range configuration.
    pub fn try_new(cfg: WorldConfig) -> Result<Self, PhysicsError> {
        cfg.validate()?;
        Ok(<Self as PhysicsWorldApi>::new(cfg))
    }

    /// Bodies in registration (and therefore update) order.
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub fn debug_stats(&self) -> WorldStats {
        WorldStats {
            colliders: self.colliders.len(),
            bodies: self.bodies.len(),
            active_bodies: self.bodies.iter().filter(|b| b.active).count(),
            index: self.tree.debug_stats(),
        }
    }

    /// Timing for the last `update`, when `enable_timing` is set.
    pub fn timing(&self) -> Option<StepTiming> {
        self.last_timing
    }

    /// Events dropped because the buffer hit `max_events` since the last drain.
    pub fn dropped_events(&self) -> usize {
        self.dropped_events
    }

    fn contains_id(&self, id: &str) -> bool {
        self.colliders.contains(id) || self.bodies.iter().any(|b| b.id() == id)
    }

    fn register(&mut self, collision: Collision2D) {
        self.tree.add_collision(collision.clone());
        self.linear.add_collision(collision);
    }

    fn unregister(&mut self, id: &str) -> Option<Collision2D> {
        self.tree.remove_collision(id);
        self.linear.remove_collision(id)
    }

    /// Keep at most `max_events` of the events buffered since `start`.
    fn cap_events(&mut self, start: usize) {
        let cap = self.cfg.max_events;
        let fresh = self.events.len() - start;
        if fresh > cap {
            let extra = fresh - cap;
            self.events.truncate(start + cap);
            self.dropped_events += extra;
            debug!(dropped = extra, cap, "event buffer full; dropping events");
        }
    }

    /// Re-register every body's current box; unchanged boxes keep their buckets.
    fn sync_bodies(&mut self) {
        for body in &self.bodies {
            self.tree.add_collision(body.collision().clone());
            self.linear.add_collision(body.collision().clone());
        }
    }

    /// Teleport a body (meters) and move its box in both indexes right away.
    pub fn set_body_position(&mut self, id: &str, position: Vec3) -> bool {
        let Some(body) = self.bodies.iter_mut().find(|b| b.id() == id) else {
            return false;
        };
        body.set_position(position);
        let moved = body.collision().clone();
        self.register(moved);
        true
    }
}

impl PhysicsWorldApi for PhysicsWorld {
    fn new(cfg: WorldConfig) -> Self {
        Self {
            tree: QuadTree::from_config(&cfg),
            cfg,
            frame_counter: 0,
            linear: LinearIndex::new(),
            colliders: HashSet::new(),
            bodies: Vec::new(),
            events: Vec::new(),
            dropped_events: 0,
            last_timing: None,
        }
    }

    fn add_collider(&mut self, collider: Collision2D) {
        if self.bodies.iter().any(|b| b.id() == collider.id()) {
            warn!(id = collider.id(), "collider id is already used by a body; ignoring");
            return;
        }
        self.colliders.insert(collider.id().to_owned());
        self.register(collider);
    }

    fn remove_collider(&mut self, id: &str) -> Option<Collision2D> {
        if !self.colliders.remove(id) {
            return None;
        }
        self.unregister(id)
    }

    fn add_body(&mut self, mut body: RigidBody) -> Result<(), PhysicsError> {
        if self.contains_id(body.id()) {
            return Err(PhysicsError::DuplicateId(body.id().to_owned()));
        }
        body.set_meters_to_pixels(self.cfg.meters_to_pixels);
        self.register(body.collision().clone());
        debug!(id = body.id(), bounds = %body.bounds(), "body added");
        self.bodies.push(body);
        Ok(())
    }

    fn create_body(&mut self, desc: BodyDesc) -> Result<(), PhysicsError> {
        let body = RigidBody::from_desc(desc, self.cfg.meters_to_pixels);
        self.add_body(body)
    }

    fn remove_body(&mut self, id: &str) -> Option<RigidBody> {
        let pos = self.bodies.iter().position(|b| b.id() == id)?;
        self.unregister(id);
        Some(self.bodies.remove(pos))
    }

    fn body(&self, id: &str) -> Option<&RigidBody> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    fn body_mut(&mut self, id: &str) -> Option<&mut RigidBody> {
        self.bodies.iter_mut().find(|b| b.id() == id)
    }

    fn set_world_bounds(&mut self, width: f32, height: f32) {
        info!(width, height, "world bounds changed");
        self.cfg.world_width = width;
        self.cfg.world_height = height;
    }

    fn update(&mut self, dt: f32) {
        let t_all = if self.cfg.enable_timing { Some(Instant::now()) } else { None };
        let mut timing = StepTiming::default();
        let events_before = self.events.len();
        let ctx = StepContext::from_config(&self.cfg);
        let source = self.cfg.candidate_source;
        self.frame_counter = self.frame_counter.wrapping_add(1);

        // bodies moved through `body_mut` since the last update
        self.sync_bodies();

        for i in 0..self.bodies.len() {
            // disjoint field borrows: the body is mutated while the indexes are read
            let body = &mut self.bodies[i];
            let Some(region) = body.begin_step(dt, &ctx) else {
                continue;
            };

            let t_cand = t_all.map(|_| Instant::now());
            let mut candidates: Vec<&Collision2D> = Vec::new();
            match source {
                CandidateSource::Linear => {
                    candidates.extend(self.linear.iter().filter(|c| c.id() != body.id()));
                }
                CandidateSource::Indexed => {
                    self.tree.query_rect(&region, Some(body.id()), &mut candidates, None);
                }
            }
            if let Some(t) = t_cand {
                timing.candidates_ms += t.elapsed().as_secs_f64() * 1000.0;
            }

            let t_resolve = t_all.map(|_| Instant::now());
            body.finish_step(&candidates, &ctx, &mut self.events);
            if let Some(t) = t_resolve {
                timing.resolve_ms += t.elapsed().as_secs_f64() * 1000.0;
            }
            timing.bodies_stepped += 1;

            let moved = body.collision().clone();
            self.tree.add_collision(moved.clone());
            self.linear.add_collision(moved);
            self.cap_events(events_before);
        }

        if let Some(t_all) = t_all {
            timing.update_ms = t_all.elapsed().as_secs_f64() * 1000.0;
            timing.events_emitted = self.events.len() - events_before;
            self.last_timing = Some(timing);
        }
    }

    fn drain_events(&mut self) -> Vec<PhysicsEvent> {
        self.dropped_events = 0;
        std::mem::take(&mut self.events)
    }

    fn query<'a>(
        &'a self,
        query: &Collision2D,
        analytics: Option<&mut QueryAnalytics>,
    ) -> Vec<&'a Collision2D> {
        let mut out = Vec::new();
        self.tree.check_for_collision(query, &mut out, analytics);
        out
    }

    fn query_linear<'a>(
        &'a self,
        query: &Collision2D,
        analytics: Option<&mut QueryAnalytics>,
    ) -> Vec<&'a Collision2D> {
        let mut out = Vec::new();
        self.linear.check_for_collision(query, &mut out, analytics);
        out
    }
}
