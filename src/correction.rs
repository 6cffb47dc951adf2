use crate::api::EdgeCorrectionApi;
use crate::rect::Rect;
use crate::types::{CollisionCorrection, CollisionEdges};

/// Edge correction with corner cancellation.
///
/// An apparent edge overlap is discarded when another candidate overlaps the opposite
/// edge across the same top/bottom (or left/right) band: that pair is the corner of a
/// seam resolved through the neighbour's own edge, not a wall.
pub struct EdgeCorrection;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// Left and bottom corrections are positive, right and top negative.
    fn is_positive(self) -> bool {
        matches!(self, Edge::Left | Edge::Bottom)
    }

    /// (overlap along the correction axis, overlap along the cross axis)
    fn overlaps(self, body: &Rect, other: &Rect) -> (f32, f32) {
        match self {
            Edge::Left | Edge::Right => (body.edge_overlap_x(other), body.edge_overlap_y(other)),
            Edge::Top | Edge::Bottom => (body.edge_overlap_y(other), body.edge_overlap_x(other)),
        }
    }
}

fn sign(v: f32) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

fn edge_correction<B: AsRef<Rect>>(body: &Rect, others: &[B], edge: Edge) -> f32 {
    let positive = edge.is_positive();
    let mut best = 0.0f32;

    for (i, candidate) in others.iter().enumerate() {
        let (overlap, cross) = edge.overlaps(body, candidate.as_ref());
        let on_edge = if positive { overlap > 0.0 } else { overlap < 0.0 };
        if !on_edge {
            continue;
        }

        // 0 on the cross axis means a plain wall contact; trust it.
        let cross_sign = sign(cross);
        if cross_sign != 0 {
            let cancelled = others.iter().enumerate().any(|(j, adjacent)| {
                if j == i {
                    return false;
                }
                let (adj_overlap, adj_cross) = edge.overlaps(body, adjacent.as_ref());
                let opposite = if positive { adj_overlap < 0.0 } else { adj_overlap > 0.0 };
                opposite && sign(adj_cross) == cross_sign
            });
            if cancelled {
                continue;
            }
        }

        best = if positive { best.max(overlap) } else { best.min(overlap) };
    }

    best
}

impl EdgeCorrectionApi for EdgeCorrection {
    fn left_edge<B: AsRef<Rect>>(body: &Rect, others: &[B]) -> f32 {
        edge_correction(body, others, Edge::Left)
    }

    fn right_edge<B: AsRef<Rect>>(body: &Rect, others: &[B]) -> f32 {
        edge_correction(body, others, Edge::Right)
    }

    fn top_edge<B: AsRef<Rect>>(body: &Rect, others: &[B]) -> f32 {
        edge_correction(body, others, Edge::Top)
    }

    fn bottom_edge<B: AsRef<Rect>>(body: &Rect, others: &[B]) -> f32 {
        edge_correction(body, others, Edge::Bottom)
    }

    fn correct<B: AsRef<Rect>>(body: &Rect, others: &[B]) -> CollisionCorrection {
        let mut out = CollisionCorrection {
            edges: CollisionEdges::NONE,
            left: Self::left_edge(body, others),
            right: Self::right_edge(body, others),
            top: Self::top_edge(body, others),
            bottom: Self::bottom_edge(body, others),
        };
        if out.left > 0.0 {
            out.edges |= CollisionEdges::LEFT;
        }
        if out.right < 0.0 {
            out.edges |= CollisionEdges::RIGHT;
        }
        if out.top < 0.0 {
            out.edges |= CollisionEdges::TOP;
        }
        if out.bottom > 0.0 {
            out.edges |= CollisionEdges::BOTTOM;
        }
        out
    }

    fn relax<B: AsRef<Rect>>(
        body: &mut Rect,
        others: &[B],
        iterations: usize,
    ) -> CollisionCorrection {
        const STEP: f32 = 0.5;
        let start = *body;
        let mut edges = CollisionEdges::NONE;

        for _ in 0..iterations {
            for other in others {
                let other = other.as_ref();
                let x = body.edge_overlap_x(other);
                let y = body.edge_overlap_y(other);
                body.set_position(body.left + x * STEP, body.top + y * STEP);

                if x < 0.0 {
                    edges |= CollisionEdges::RIGHT;
                }
                if x > 0.0 {
                    edges |= CollisionEdges::LEFT;
                }
                if y > 0.0 {
                    edges |= CollisionEdges::BOTTOM;
                }
                if y < 0.0 {
                    edges |= CollisionEdges::TOP;
                }
            }
        }

        // report the net displacement per direction
        let dx = body.left - start.left;
        let dy = body.top - start.top;
        CollisionCorrection {
            edges,
            left: dx.max(0.0),
            right: dx.min(0.0),
            top: dy.min(0.0),
            bottom: dy.max(0.0),
        }
    }
}
