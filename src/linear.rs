use std::collections::HashMap;

use crate::api::SpatialIndex;
use crate::collision::Collision2D;
use crate::rect::Rect;
use crate::types::QueryAnalytics;

/// Registration-ordered list of boxes with O(n) queries.
///
/// This is the "full candidate list" bodies resolve against by default, and the
/// brute-force reference the quad tree is checked against.
#[derive(Clone, Debug, Default)]
pub struct LinearIndex {
    entries: Vec<Collision2D>,
    slot_of: HashMap<String, usize>,
}

impl LinearIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered boxes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Collision2D> {
        self.entries.iter()
    }
}

impl SpatialIndex for LinearIndex {
    fn add_collision(&mut self, collision: Collision2D) {
        match self.slot_of.get(collision.id()) {
            Some(&slot) => self.entries[slot] = collision,
            None => {
                self.slot_of.insert(collision.id().to_owned(), self.entries.len());
                self.entries.push(collision);
            }
        }
    }

    fn remove_collision(&mut self, id: &str) -> Option<Collision2D> {
        let slot = self.slot_of.remove(id)?;
        let removed = self.entries.remove(slot);
        // keep registration order; shift the slots after the hole
        for s in self.slot_of.values_mut() {
            if *s > slot {
                *s -= 1;
            }
        }
        Some(removed)
    }

    fn get(&self, id: &str) -> Option<&Collision2D> {
        self.slot_of.get(id).map(|&slot| &self.entries[slot])
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.slot_of.clear();
    }

    fn query_rect<'a>(
        &'a self,
        region: &Rect,
        exclude: Option<&str>,
        results: &mut Vec<&'a Collision2D>,
        mut analytics: Option<&mut QueryAnalytics>,
    ) {
        if let Some(a) = analytics.as_deref_mut() {
            a.nodes_tested += 1;
        }
        for c in &self.entries {
            if exclude == Some(c.id()) {
                continue;
            }
            if let Some(a) = analytics.as_deref_mut() {
                a.intersection_tests += 1;
            }
            if c.is_colliding_rect(region) {
                results.push(c);
            }
        }
    }
}
