//! Semi-implicit Euler rigid body with step-up, stop, land and head-bump resolution.

use std::fmt;

use glam::Vec3;
use tracing::trace;

use crate::api::EdgeCorrectionApi;
use crate::collision::Collision2D;
use crate::config::{METERS_TO_PIXELS, WorldConfig};
use crate::correction::EdgeCorrection;
use crate::rect::Rect;
use crate::types::{ColKey, CollisionEdges, Contact, PhysicsEvent};

/// Penetration below this many pixels counts as touching, not overlapping.
pub const CONTACT_EPSILON: f32 = 1e-3;

/// Read-only world state a body sees during its step.
#[derive(Copy, Clone, Debug)]
pub struct StepContext {
    pub gravity: Vec3,
    pub wind: Vec3,
    pub meters_to_pixels: f32,
    pub step_limit: f32,
    /// World limits in pixels.
    pub world: Rect,
}

impl StepContext {
    pub fn from_config(cfg: &WorldConfig) -> Self {
        Self {
            gravity: cfg.gravity,
            wind: cfg.wind,
            meters_to_pixels: cfg.meters_to_pixels,
            step_limit: cfg.step_limit,
            world: Rect::new(0.0, cfg.world_width, cfg.world_height, cfg.world_height),
        }
    }
}

/// Body creation request from a scene/level loader.
#[derive(Clone, Debug)]
pub struct BodyDesc {
    pub id: String,
    /// Initial bounds in pixels.
    pub bounds: Rect,
    pub mass: f32,
    pub active: bool,
    pub tag: Option<ColKey>,
}

pub type CollisionListener = Box<dyn FnMut(&[Contact], &RigidBody)>;
pub type FloorListener = Box<dyn FnMut(&RigidBody)>;
pub type PositionListener = Box<dyn FnMut(Vec3, &RigidBody)>;

#[derive(Default)]
struct Listeners {
    on_collision: Option<CollisionListener>,
    on_floor: Option<FloorListener>,
    on_position_change: Option<PositionListener>,
}

/// Tentative state between integration and resolution.
#[derive(Copy, Clone, Debug)]
struct PendingStep {
    prev: Rect,
    next: Rect,
    next_vel: Vec3,
    next_z: f32,
}

/// A collision box that integrates its position under velocity, acceleration and
/// gravity, and resolves itself against candidate boxes each step.
///
/// `bounds` is always the pixel projection of `position` (meters). Position is only
/// written through [`RigidBody::set_position`] or by the step itself, which treats the
/// corrected bounds as authoritative and re-derives position from them.
pub struct RigidBody {
    collision: Collision2D,
    position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    /// Externally driven positional delta (e.g. run speed), not decayed by physics.
    pub instance_velocity: Vec3,
    pub force: Vec3,
    pub mass: f32,
    pub max_velocity: Vec3,
    pub min_velocity: Vec3,
    /// Inactive bodies stay registered but are not integrated or resolved.
    pub active: bool,
    /// Overrides the world gravity when set.
    pub custom_gravity: Option<Vec3>,
    meters_to_pixels: f32,
    pending: Option<PendingStep>,
    listeners: Listeners,
}

impl fmt::Debug for RigidBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RigidBody")
            .field("id", &self.collision.id())
            .field("bounds", self.collision.bounds())
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("acceleration", &self.acceleration)
            .field("instance_velocity", &self.instance_velocity)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl RigidBody {
    /// New body at `bounds` (pixels), using the default unit scale.
    pub fn new(id: impl Into<String>, bounds: Rect) -> Self {
        let mut body = Self {
            collision: Collision2D::new(id, bounds),
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            instance_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass: 10.0,
            max_velocity: Vec3::splat(1000.0),
            min_velocity: Vec3::splat(-1000.0),
            active: true,
            custom_gravity: None,
            meters_to_pixels: METERS_TO_PIXELS,
            pending: None,
            listeners: Listeners::default(),
        };
        body.derive_position();
        body
    }

    pub fn from_desc(desc: BodyDesc, meters_to_pixels: f32) -> Self {
        let mut body = Self::new(desc.id, desc.bounds);
        body.collision.set_tag(desc.tag);
        body.mass = desc.mass;
        body.active = desc.active;
        body.set_meters_to_pixels(meters_to_pixels);
        body
    }

    pub fn with_tag(mut self, tag: ColKey) -> Self {
        self.collision.set_tag(Some(tag));
        self
    }

    pub fn id(&self) -> &str {
        self.collision.id()
    }

    pub fn tag(&self) -> Option<ColKey> {
        self.collision.tag()
    }

    /// Current box in pixels (for debug drawing and gameplay reads).
    pub fn bounds(&self) -> &Rect {
        self.collision.bounds()
    }

    pub fn collision(&self) -> &Collision2D {
        &self.collision
    }

    pub fn show_collision(&mut self, show: bool) {
        self.collision.show_collision = show;
    }

    /// Position of the top-left corner, in meters.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport; bounds follow immediately.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.collision
            .set_pos(position.x * self.meters_to_pixels, position.y * self.meters_to_pixels);
    }

    /// Change the unit scale, keeping the pixel bounds where they are.
    pub fn set_meters_to_pixels(&mut self, meters_to_pixels: f32) {
        self.meters_to_pixels = meters_to_pixels;
        self.derive_position();
    }

    pub fn on_collision(&mut self, f: impl FnMut(&[Contact], &RigidBody) + 'static) {
        self.listeners.on_collision = Some(Box::new(f));
    }

    pub fn on_floor(&mut self, f: impl FnMut(&RigidBody) + 'static) {
        self.listeners.on_floor = Some(Box::new(f));
    }

    pub fn on_position_change(&mut self, f: impl FnMut(Vec3, &RigidBody) + 'static) {
        self.listeners.on_position_change = Some(Box::new(f));
    }

    fn derive_position(&mut self) {
        let b = *self.collision.bounds();
        self.position.x = b.left / self.meters_to_pixels;
        self.position.y = b.top / self.meters_to_pixels;
    }

    /// Integrate one step and resolve against `candidates` (other boxes; the body's
    /// own id is skipped). Events are delivered to the listeners and appended to `events`.
    pub fn update(
        &mut self,
        dt: f32,
        ctx: &StepContext,
        candidates: &[&Collision2D],
        events: &mut Vec<PhysicsEvent>,
    ) {
        if self.begin_step(dt, ctx).is_some() {
            self.finish_step(candidates, ctx, events);
        }
    }

    /// Integrate a tentative next position.
    ///
    /// Returns the region candidates must be gathered from (the swept box padded for
    /// step-ups), or `None` when the body is inactive.
    pub fn begin_step(&mut self, dt: f32, ctx: &StepContext) -> Option<Rect> {
        if !self.active {
            self.collision.clear_highlight();
            self.pending = None;
            return None;
        }

        let mut accel =
            self.acceleration + self.custom_gravity.unwrap_or(ctx.gravity) + ctx.wind;
        if self.mass > 0.0 {
            accel += self.force / self.mass;
        }
        let next_vel = (self.velocity + accel * dt).clamp(self.min_velocity, self.max_velocity);
        let delta = next_vel * dt + self.instance_velocity * dt;

        let prev = *self.collision.bounds();
        let mut next = prev;
        // displacement applied in pixel space so a body at rest keeps exact bounds
        next.set_position(
            prev.left + delta.x * ctx.meters_to_pixels,
            prev.top + delta.y * ctx.meters_to_pixels,
        );

        self.pending = Some(PendingStep { prev, next, next_vel, next_z: self.position.z + delta.z });

        let pad = 1.0;
        Some(prev.union(&next).expanded(pad, ctx.step_limit + pad, pad))
    }

    /// Resolve the step started by [`RigidBody::begin_step`], clamp to the world and commit.
    pub fn finish_step(
        &mut self,
        candidates: &[&Collision2D],
        ctx: &StepContext,
        events: &mut Vec<PhysicsEvent>,
    ) {
        let Some(PendingStep { prev, mut next, mut next_vel, next_z }) = self.pending.take() else {
            return;
        };
        let mut contacts: Vec<Contact> = Vec::new();
        let mut on_floor = false;
        let moving_right = next.left > prev.left;
        let moving_left = next.left < prev.left;

        for &c in candidates {
            if c.id() == self.id() {
                continue;
            }
            let cb = c.bounds();

            // Side contact: only when the body was already level with the box.
            if y_overlap(&prev, cb) && y_overlap(&next, cb) {
                let hits_left_face =
                    moving_right && prev.right() <= cb.left + CONTACT_EPSILON && next.right() > cb.left;
                let hits_right_face =
                    moving_left && prev.left >= cb.right() - CONTACT_EPSILON && next.left < cb.right();

                if hits_left_face || hits_right_face {
                    let rise = cb.top - next.bottom();
                    if rise > 0.0 && rise <= ctx.step_limit {
                        next.top = cb.top + next.height;
                        touch(&mut contacts, Some(c), CollisionEdges::BOTTOM);
                    } else {
                        self.stop_x(&mut next_vel);
                        if hits_left_face {
                            next.left = cb.left - next.width;
                            touch(&mut contacts, Some(c), CollisionEdges::RIGHT);
                        } else {
                            next.left = cb.right();
                            touch(&mut contacts, Some(c), CollisionEdges::LEFT);
                        }
                    }
                }
            }

            if x_overlap(&next, cb) {
                if prev.bottom() >= cb.top - CONTACT_EPSILON && next.bottom() < cb.top {
                    self.stop_y(&mut next_vel);
                    next.top = cb.top + next.height;
                    on_floor = true;
                    touch(&mut contacts, Some(c), CollisionEdges::BOTTOM);
                } else if prev.top <= cb.bottom() + CONTACT_EPSILON && next.top > cb.bottom() {
                    self.stop_y(&mut next_vel);
                    next.top = cb.bottom();
                    touch(&mut contacts, Some(c), CollisionEdges::TOP);
                }
            }
        }

        self.depenetrate(&prev, &mut next, &mut next_vel, candidates, ctx, &mut contacts, &mut on_floor);
        self.clamp_to_world(&mut next, &mut next_vel, ctx, &mut contacts);

        // commit: bounds are authoritative, position follows
        self.velocity = next_vel;
        let old_position = self.position;
        self.collision.set_bounds(&next);
        if next.left != prev.left {
            self.position.x = next.left / self.meters_to_pixels;
        }
        if next.top != prev.top {
            self.position.y = next.top / self.meters_to_pixels;
        }
        self.position.z = next_z;

        if contacts.is_empty() {
            self.collision.clear_highlight();
        } else {
            self.collision.set_highlight(true);
        }

        trace!(
            id = self.id(),
            bounds = %next,
            contacts = contacts.len(),
            on_floor,
            "body stepped"
        );
        self.emit(contacts, on_floor, old_position, events);
    }

    fn stop_x(&mut self, next_vel: &mut Vec3) {
        self.instance_velocity.x = 0.0;
        self.acceleration.x = 0.0;
        next_vel.x = 0.0;
    }

    fn stop_y(&mut self, next_vel: &mut Vec3) {
        self.acceleration.y = 0.0;
        next_vel.y = 0.0;
    }

    /// Push the body out of anything it still overlaps after the swept checks
    /// (spawned inside a box, or shoved by a body resolved earlier this frame).
    #[allow(clippy::too_many_arguments)]
    fn depenetrate(
        &mut self,
        prev: &Rect,
        next: &mut Rect,
        next_vel: &mut Vec3,
        candidates: &[&Collision2D],
        ctx: &StepContext,
        contacts: &mut Vec<Contact>,
        on_floor: &mut bool,
    ) {
        let mut overlapping: Vec<&Collision2D> = candidates
            .iter()
            .copied()
            .filter(|c| c.id() != self.id() && deep_overlap(next, c.bounds()))
            .collect();
        if overlapping.is_empty() {
            return;
        }

        let vertical = EdgeCorrection::correct(next, &overlapping);
        let mut stepped = false;
        if next_vel.y <= 0.0 && vertical.bottom > CONTACT_EPSILON {
            next.top += vertical.bottom;
            self.stop_y(next_vel);
            *on_floor = true;
            stepped = vertical.bottom <= ctx.step_limit;
            for &c in &overlapping {
                touch(contacts, Some(c), CollisionEdges::BOTTOM);
            }
        } else if next_vel.y > 0.0 && vertical.top < -CONTACT_EPSILON {
            next.top += vertical.top;
            self.stop_y(next_vel);
            for &c in &overlapping {
                touch(contacts, Some(c), CollisionEdges::TOP);
            }
        }

        overlapping.retain(|c| deep_overlap(next, c.bounds()));
        if stepped || overlapping.is_empty() {
            return;
        }

        let horizontal = EdgeCorrection::correct(next, &overlapping);
        let shift = if next.left > prev.left {
            horizontal.right
        } else if next.left < prev.left {
            horizontal.left
        } else if horizontal.left < -horizontal.right {
            horizontal.left
        } else {
            horizontal.right
        };
        if shift.abs() > CONTACT_EPSILON {
            next.left += shift;
            self.stop_x(next_vel);
            let edge = if shift < 0.0 { CollisionEdges::RIGHT } else { CollisionEdges::LEFT };
            for &c in &overlapping {
                touch(contacts, Some(c), edge);
            }
        }
    }

    fn clamp_to_world(
        &mut self,
        next: &mut Rect,
        next_vel: &mut Vec3,
        ctx: &StepContext,
        contacts: &mut Vec<Contact>,
    ) {
        let world = ctx.world;
        let mut edges = CollisionEdges::NONE;

        if next.left < world.left {
            next.left = world.left;
            self.stop_x(next_vel);
            edges |= CollisionEdges::LEFT;
        } else if next.right() > world.right() {
            next.left = world.right() - next.width;
            self.stop_x(next_vel);
            edges |= CollisionEdges::RIGHT;
        }

        if next.bottom() < world.bottom() {
            next.top = world.bottom() + next.height;
            self.stop_y(next_vel);
            edges |= CollisionEdges::BOTTOM;
        } else if next.top > world.top {
            next.top = world.top;
            self.stop_y(next_vel);
            edges |= CollisionEdges::TOP;
        }

        if !edges.is_empty() {
            touch(contacts, None, edges);
        }
    }

    fn emit(
        &mut self,
        contacts: Vec<Contact>,
        on_floor: bool,
        old_position: Vec3,
        events: &mut Vec<PhysicsEvent>,
    ) {
        if !contacts.is_empty() {
            if let Some(mut f) = self.listeners.on_collision.take() {
                f(&contacts, self);
                self.listeners.on_collision = Some(f);
            }
            events.push(PhysicsEvent::Collision {
                body: self.id().to_owned(),
                tag: self.tag(),
                contacts,
            });
        }

        if on_floor {
            if let Some(mut f) = self.listeners.on_floor.take() {
                f(self);
                self.listeners.on_floor = Some(f);
            }
            events.push(PhysicsEvent::OnFloor { body: self.id().to_owned(), tag: self.tag() });
        }

        if self.position != old_position {
            let position = self.position;
            if let Some(mut f) = self.listeners.on_position_change.take() {
                f(position, self);
                self.listeners.on_position_change = Some(f);
            }
            events.push(PhysicsEvent::PositionChanged {
                body: self.id().to_owned(),
                tag: self.tag(),
                position,
            });
        }
    }
}

fn x_overlap(a: &Rect, b: &Rect) -> bool {
    a.right() > b.left && a.left < b.right()
}

/// Level with `b` beyond the contact tolerance.
fn y_overlap(a: &Rect, b: &Rect) -> bool {
    a.top > b.bottom() + CONTACT_EPSILON && a.bottom() < b.top - CONTACT_EPSILON
}

fn deep_overlap(a: &Rect, b: &Rect) -> bool {
    a.right() - CONTACT_EPSILON > b.left
        && a.left + CONTACT_EPSILON < b.right()
        && a.top - CONTACT_EPSILON > b.bottom()
        && a.bottom() + CONTACT_EPSILON < b.top
}

/// Record a contact, merging edges when the same box is touched twice.
fn touch(contacts: &mut Vec<Contact>, other: Option<&Collision2D>, edges: CollisionEdges) {
    let id = other.map(|c| c.id());
    if let Some(existing) = contacts.iter_mut().find(|k| k.other.as_ref().map(|c| c.id()) == id) {
        existing.edges |= edges;
        return;
    }
    contacts.push(Contact { other: other.cloned(), edges });
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn ctx() -> StepContext {
        StepContext::from_config(&WorldConfig {
            world_width: 2000.0,
            world_height: 2000.0,
            ..Default::default()
        })
    }

    fn floor() -> Collision2D {
        Collision2D::new("floor", Rect::new(0.0, 1000.0, 100.0, 100.0))
    }

    fn floor_events(events: &[PhysicsEvent]) -> usize {
        events.iter().filter(|e| matches!(e, PhysicsEvent::OnFloor { .. })).count()
    }

    #[test]
    fn test_position_and_bounds_stay_in_sync() {
        let mut b = RigidBody::new("hero", Rect::new(280.0, 20.0, 560.0, 40.0));
        assert_eq!(b.position(), Vec3::new(1.0, 2.0, 0.0));
        b.set_position(Vec3::new(0.5, 1.0, 0.0));
        assert_eq!(*b.bounds(), Rect::new(140.0, 20.0, 280.0, 40.0));
    }

    #[test]
    fn test_free_fall_integrates_semi_implicit() {
        let mut b = RigidBody::new("rock", Rect::new(100.0, 10.0, 1000.0, 10.0));
        let mut events = Vec::new();
        b.update(DT, &ctx(), &[], &mut events);
        let v = -9.8 * DT;
        assert!((b.velocity.y - v).abs() < 1e-6);
        let expected_top = 1000.0 + v * DT * METERS_TO_PIXELS;
        assert!((b.bounds().top - expected_top).abs() < 1e-3);
        assert!(matches!(events.as_slice(), [PhysicsEvent::PositionChanged { .. }]));
    }

    #[test]
    fn test_wind_pushes_even_with_custom_gravity() {
        let mut b = RigidBody::new("leaf", Rect::new(100.0, 10.0, 1000.0, 10.0));
        b.custom_gravity = Some(Vec3::ZERO);
        let windy = StepContext { wind: Vec3::new(2.0, 0.0, 0.0), ..ctx() };
        let mut events = Vec::new();
        b.update(DT, &windy, &[], &mut events);
        assert!((b.velocity.x - 2.0 * DT).abs() < 1e-6);
        assert!(b.bounds().left > 100.0);
        assert_eq!(b.bounds().top, 1000.0);
    }

    #[test]
    fn test_instance_velocity_nudges_without_integrating() {
        let mut b = RigidBody::new("runner", Rect::new(100.0, 10.0, 1000.0, 10.0));
        b.custom_gravity = Some(Vec3::ZERO);
        b.instance_velocity = Vec3::new(1.0, 0.0, 0.0);
        let mut events = Vec::new();
        b.update(DT, &ctx(), &[], &mut events);
        assert_eq!(b.velocity, Vec3::ZERO);
        assert!((b.bounds().left - (100.0 + DT * METERS_TO_PIXELS)).abs() < 1e-3);
        assert_eq!(b.instance_velocity.x, 1.0);
    }

    #[test]
    fn test_lands_on_floor_and_fires_once() {
        let floor = floor();
        let mut b = RigidBody::new("hero", Rect::new(100.0, 20.0, 300.0, 20.0));
        let floors = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&floors);
        b.on_floor(move |_| *seen.borrow_mut() += 1);

        let mut landed_at = None;
        for frame in 0..200 {
            let mut events = Vec::new();
            b.update(DT, &ctx(), &[&floor], &mut events);
            if landed_at.is_none() && floor_events(&events) > 0 {
                assert_eq!(floor_events(&events), 1);
                landed_at = Some(frame);
            }
        }
        assert!(landed_at.is_some());
        assert_eq!(b.bounds().top, floor.bounds().top + 20.0);
        assert_eq!(b.velocity.y, 0.0);
        assert!(*floors.borrow() >= 1);
    }

    #[test]
    fn test_steps_up_low_ledge_without_losing_speed() {
        let floor = floor();
        let ledge = Collision2D::new("ledge", Rect::new(130.0, 50.0, 105.0, 5.0));
        let mut b = RigidBody::new("hero", Rect::new(100.0, 20.0, 120.0, 20.0));
        b.instance_velocity = Vec3::new(1.0, 0.0, 0.0);

        let mut stepped = false;
        for _ in 0..10 {
            let mut events = Vec::new();
            b.update(DT, &ctx(), &[&floor, &ledge], &mut events);
            if b.bounds().right() > 130.0 && !stepped {
                stepped = true;
                assert_eq!(b.bounds().top, 105.0 + 20.0);
            }
        }
        assert!(stepped);
        assert_eq!(b.instance_velocity.x, 1.0);
        assert_eq!(b.velocity.x, 0.0);
    }

    #[test]
    fn test_stops_against_tall_wall() {
        let floor = floor();
        let wall = Collision2D::new("wall", Rect::new(130.0, 50.0, 200.0, 100.0)).with_tag(9);
        let mut b = RigidBody::new("hero", Rect::new(100.0, 20.0, 120.0, 20.0));
        b.instance_velocity = Vec3::new(1.0, 0.0, 0.0);

        let mut hit_wall = false;
        for _ in 0..10 {
            let mut events = Vec::new();
            b.update(DT, &ctx(), &[&floor, &wall], &mut events);
            for e in &events {
                if let PhysicsEvent::Collision { contacts, .. } = e {
                    hit_wall |= contacts.iter().any(|c| {
                        c.other.as_ref().and_then(|o| o.tag()) == Some(9)
                            && c.edges.contains(CollisionEdges::RIGHT)
                    });
                }
            }
        }
        assert!(hit_wall);
        assert_eq!(b.bounds().right(), 130.0);
        assert_eq!(b.instance_velocity.x, 0.0);
        assert_eq!(b.bounds().top, 120.0);
    }

    #[test]
    fn test_head_bump_stops_rise() {
        let ceiling = Collision2D::new("ceiling", Rect::new(0.0, 1000.0, 400.0, 100.0));
        let mut b = RigidBody::new("jumper", Rect::new(100.0, 20.0, 295.0, 20.0));
        b.velocity = Vec3::new(0.0, 5.0, 0.0);
        let mut events = Vec::new();
        b.update(DT, &ctx(), &[&ceiling], &mut events);
        assert_eq!(b.bounds().top, 300.0);
        assert_eq!(b.velocity.y, 0.0);
        assert_eq!(floor_events(&events), 0);
    }

    #[test]
    fn test_world_floor_is_a_fixed_point() {
        let mut b = RigidBody::new("crate", Rect::new(50.0, 20.0, 20.0, 20.0));
        let start = b.position();
        for _ in 0..30 {
            let mut events = Vec::new();
            b.update(DT, &ctx(), &[], &mut events);
            assert!(events.iter().all(|e| !matches!(e, PhysicsEvent::PositionChanged { .. })));
            let Some(PhysicsEvent::Collision { contacts, .. }) = events.first() else {
                panic!("expected a world-limit collision, got {events:?}");
            };
            assert!(contacts[0].is_world_limit());
        }
        assert_eq!(b.position(), start);
        assert_eq!(b.bounds().top, 20.0);
        assert_eq!(b.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_inactive_body_is_untouched() {
        let floor = floor();
        let mut b = RigidBody::new("ghost", Rect::new(100.0, 20.0, 300.0, 20.0));
        b.active = false;
        let before = *b.bounds();
        let mut events = Vec::new();
        b.update(DT, &ctx(), &[&floor], &mut events);
        assert_eq!(*b.bounds(), before);
        assert!(events.is_empty());
        assert!(!b.collision().is_highlighted());
    }

    #[test]
    fn test_spawned_inside_floor_pops_out() {
        let floor = floor();
        let mut b = RigidBody::new("stuck", Rect::new(100.0, 20.0, 115.0, 20.0));
        let mut events = Vec::new();
        b.update(DT, &ctx(), &[&floor], &mut events);
        assert!((b.bounds().bottom() - 100.0).abs() < CONTACT_EPSILON);
        assert_eq!(b.velocity.y, 0.0);
        assert_eq!(floor_events(&events), 1);
    }

    #[test]
    fn test_listener_order_and_skip_self() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut b = RigidBody::new("hero", Rect::new(100.0, 20.0, 300.0, 20.0));
        let (o1, o2, o3) = (Rc::clone(&order), Rc::clone(&order), Rc::clone(&order));
        b.on_collision(move |_, _| o1.borrow_mut().push("collision"));
        b.on_floor(move |_| o2.borrow_mut().push("floor"));
        b.on_position_change(move |_, _| o3.borrow_mut().push("position"));

        // a copy of the body's own box must not be treated as an obstacle
        let own = b.collision().clone();
        let ground = Collision2D::new("ground", Rect::new(0.0, 1000.0, 280.0, 100.0));
        let mut events = Vec::new();
        b.update(DT, &ctx(), &[&own, &ground], &mut events);
        assert_eq!(*order.borrow(), ["collision", "floor"]);
        assert_eq!(b.bounds().top, 300.0);
    }
}
