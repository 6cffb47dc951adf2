use std::collections::HashMap;

use tracing::{debug, warn};

use crate::api::SpatialIndex;
use crate::collision::Collision2D;
use crate::config::{WorldConfig, max_depth_for};
use crate::rect::Rect;
use crate::types::{IndexStats, QueryAnalytics};

/// Closed node region stored as explicit edges, so sibling and parent edges are
/// bit-identical and the children always tile their parent.
#[derive(Copy, Clone, Debug)]
struct Region {
    x0: f32,
    x1: f32,
    y0: f32,
    y1: f32,
}

impl Region {
    fn touches(&self, r: &Rect) -> bool {
        r.right() >= self.x0 && r.left <= self.x1 && r.top >= self.y0 && r.bottom() <= self.y1
    }

    fn contains(&self, r: &Rect) -> bool {
        r.left >= self.x0 && r.right() <= self.x1 && r.bottom() >= self.y0 && r.top <= self.y1
    }

    /// Top-left, top-right, bottom-left, bottom-right.
    fn quadrants(&self) -> [Region; 4] {
        let mx = self.x0 + (self.x1 - self.x0) * 0.5;
        let my = self.y0 + (self.y1 - self.y0) * 0.5;
        [
            Region { x0: self.x0, x1: mx, y0: my, y1: self.y1 },
            Region { x0: mx, x1: self.x1, y0: my, y1: self.y1 },
            Region { x0: self.x0, x1: mx, y0: self.y0, y1: my },
            Region { x0: mx, x1: self.x1, y0: self.y0, y1: my },
        ]
    }
}

#[derive(Clone, Debug)]
struct Node {
    region: Region,
    depth: u32,
    children: Option<[usize; 4]>,
    /// Slots stored here; only leaves hold boxes.
    slots: Vec<usize>,
}

impl Node {
    fn new(region: Region, depth: u32) -> Self {
        Self { region, depth, children: None, slots: Vec::new() }
    }
}

#[derive(Clone, Debug)]
struct Entry {
    collision: Collision2D,
    /// Leaves holding this entry; empty when it lives in the overflow list.
    homes: Vec<usize>,
}

/// Broad-phase quad tree over the square `[0, size] x [0, size]`.
///
/// Subdivision is lazy. Boxes not contained by the root region are kept in an
/// overflow list that every query scans, so queries always agree with a linear scan.
#[derive(Clone, Debug)]
pub struct QuadTree {
    size: f32,
    max_depth: u32,
    nodes: Vec<Node>,
    entries: Vec<Option<Entry>>,
    free: Vec<usize>,
    slot_of: HashMap<String, usize>,
    overflow: Vec<usize>,
}

impl Default for QuadTree {
    fn default() -> Self {
        Self::new(10_000.0, 8)
    }
}

impl QuadTree {
    /// Depth is clamped so leaves stay at least 1 px wide.
    pub fn new(size: f32, max_depth: u32) -> Self {
        let limit = max_depth_for(size);
        if max_depth > limit {
            warn!(max_depth, limit, size, "quad tree depth clamped");
        }
        let root = Node::new(Region { x0: 0.0, x1: size, y0: 0.0, y1: size }, 0);
        Self {
            size,
            max_depth: max_depth.clamp(1, limit),
            nodes: vec![root],
            entries: Vec::new(),
            free: Vec::new(),
            slot_of: HashMap::new(),
            overflow: Vec::new(),
        }
    }

    pub fn from_config(cfg: &WorldConfig) -> Self {
        Self::new(cfg.tree_size, cfg.max_depth)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Root region as a box (`left = 0`, `top = size`).
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, self.size, self.size, self.size)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collision2D> {
        self.entries.iter().flatten().map(|e| &e.collision)
    }

    /// Convenience wrapper returning a fresh result vector.
    pub fn query(&self, query: &Collision2D, analytics: Option<&mut QueryAnalytics>) -> Vec<&Collision2D> {
        let mut out = Vec::new();
        self.check_for_collision(query, &mut out, analytics);
        out
    }

    /// Return debug stats for the current tree shape.
    pub fn debug_stats(&self) -> IndexStats {
        let leaves = self.nodes.iter().filter(|n| self.is_leaf(n.depth)).count();
        let max_bucket = self.nodes.iter().map(|n| n.slots.len()).max().unwrap_or(0);
        IndexStats {
            entries: self.slot_of.len(),
            nodes: self.nodes.len(),
            leaves,
            overflow: self.overflow.len(),
            max_bucket: max_bucket.max(self.overflow.len()),
        }
    }

    #[inline]
    fn is_leaf(&self, depth: u32) -> bool {
        depth + 1 >= self.max_depth
    }

    fn alloc_slot(&mut self, entry: Entry) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.entries[slot] = Some(entry);
                slot
            }
            None => {
                self.entries.push(Some(entry));
                self.entries.len() - 1
            }
        }
    }

    fn ensure_children(&mut self, node: usize) -> [usize; 4] {
        if let Some(children) = self.nodes[node].children {
            return children;
        }
        let depth = self.nodes[node].depth + 1;
        let quads = self.nodes[node].region.quadrants();
        let first = self.nodes.len();
        self.nodes.extend(quads.into_iter().map(|q| Node::new(q, depth)));
        let children = [first, first + 1, first + 2, first + 3];
        self.nodes[node].children = Some(children);
        children
    }

    fn bucket(&mut self, slot: usize) {
        let bounds = match &self.entries[slot] {
            Some(e) => *e.collision.bounds(),
            None => return,
        };

        if !self.nodes[0].region.contains(&bounds) {
            if let Some(e) = &self.entries[slot] {
                warn!(id = e.collision.id(), %bounds, "collision is outside bounds of the tree");
            }
            self.overflow.push(slot);
            return;
        }

        let mut homes = Vec::new();
        let mut stack = vec![0usize];
        while let Some(n) = stack.pop() {
            if !self.nodes[n].region.touches(&bounds) {
                continue;
            }
            if self.is_leaf(self.nodes[n].depth) {
                self.nodes[n].slots.push(slot);
                homes.push(n);
            } else {
                stack.extend(self.ensure_children(n));
            }
        }
        if let Some(e) = self.entries[slot].as_mut() {
            e.homes = homes;
        }
    }

    fn test_slot(
        &self,
        slot: usize,
        region: &Rect,
        exclude: Option<&str>,
        hits: &mut Vec<usize>,
        analytics: &mut Option<&mut QueryAnalytics>,
    ) {
        let Some(entry) = &self.entries[slot] else { return };
        if exclude == Some(entry.collision.id()) {
            return;
        }
        if let Some(a) = analytics.as_deref_mut() {
            a.intersection_tests += 1;
        }
        if entry.collision.is_colliding_rect(region) {
            hits.push(slot);
        }
    }

    fn unbucket(&mut self, slot: usize, homes: &[usize]) {
        if homes.is_empty() {
            self.overflow.retain(|&s| s != slot);
        }
        for &n in homes {
            self.nodes[n].slots.retain(|&s| s != slot);
        }
    }
}

impl SpatialIndex for QuadTree {
    fn add_collision(&mut self, collision: Collision2D) {
        if let Some(&slot) = self.slot_of.get(collision.id()) {
            if let Some(entry) = self.entries[slot].as_mut() {
                // same bounds: keep the buckets, refresh the payload
                if entry.collision.bounds() == collision.bounds() {
                    entry.collision = collision;
                    return;
                }
                let homes = std::mem::take(&mut entry.homes);
                entry.collision = collision;
                self.unbucket(slot, &homes);
                self.bucket(slot);
            }
            return;
        }

        let id = collision.id().to_owned();
        let slot = self.alloc_slot(Entry { collision, homes: Vec::new() });
        self.slot_of.insert(id, slot);
        self.bucket(slot);
    }

    fn remove_collision(&mut self, id: &str) -> Option<Collision2D> {
        let slot = self.slot_of.remove(id)?;
        let entry = self.entries[slot].take()?;
        self.unbucket(slot, &entry.homes);
        self.free.push(slot);
        debug!(id, "removed collision from quad tree");
        Some(entry.collision)
    }

    fn get(&self, id: &str) -> Option<&Collision2D> {
        let slot = *self.slot_of.get(id)?;
        self.entries[slot].as_ref().map(|e| &e.collision)
    }

    fn len(&self) -> usize {
        self.slot_of.len()
    }

    fn clear(&mut self) {
        *self = Self::new(self.size, self.max_depth);
    }

    fn query_rect<'a>(
        &'a self,
        region: &Rect,
        exclude: Option<&str>,
        results: &mut Vec<&'a Collision2D>,
        mut analytics: Option<&mut QueryAnalytics>,
    ) {
        let mut hits: Vec<usize> = Vec::new();
        for &slot in &self.overflow {
            self.test_slot(slot, region, exclude, &mut hits, &mut analytics);
        }

        let mut stack = vec![0usize];
        while let Some(n) = stack.pop() {
            let node = &self.nodes[n];
            if let Some(a) = analytics.as_deref_mut() {
                a.nodes_tested += 1;
            }
            if !node.region.touches(region) {
                continue;
            }
            for &slot in &node.slots {
                self.test_slot(slot, region, exclude, &mut hits, &mut analytics);
            }
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }

        // a box spanning several leaves is found once per leaf
        hits.sort_unstable();
        hits.dedup();
        results.extend(hits.into_iter().filter_map(|s| self.entries[s].as_ref().map(|e| &e.collision)));
    }
}
