use crate::rect::Rect;
use crate::types::ColKey;

/// A named, positioned box owned by some game entity.
///
/// Bounds only change through [`Collision2D::set`], [`Collision2D::set_pos`] and
/// [`Collision2D::set_bounds`].
#[derive(Clone, Debug, PartialEq)]
pub struct Collision2D {
    id: String,
    bounds: Rect,
    tag: Option<ColKey>,
    /// Debug drawing only; no effect on physics.
    pub show_collision: bool,
    highlighted: bool,
}

impl Collision2D {
    pub fn new(id: impl Into<String>, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            bounds,
            tag: None,
            show_collision: false,
            highlighted: false,
        }
    }

    /// Attach the owner's opaque key, echoed back in events.
    pub fn with_tag(mut self, tag: ColKey) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn tag(&self) -> Option<ColKey> {
        self.tag
    }

    pub fn set_tag(&mut self, tag: Option<ColKey>) {
        self.tag = tag;
    }

    pub fn set(&mut self, left: f32, width: f32, top: f32, height: f32) {
        self.bounds.set(left, width, top, height);
    }

    pub fn set_pos(&mut self, left: f32, top: f32) {
        self.bounds.set_position(left, top);
    }

    pub fn set_bounds(&mut self, bounds: &Rect) {
        bounds.copy_into(&mut self.bounds);
    }

    /// Region test used by the spatial index.
    pub fn is_colliding_rect(&self, other: &Rect) -> bool {
        self.bounds.intersects(other)
    }

    /// Box-vs-box test that also records the debug highlight.
    pub fn is_colliding(&mut self, other: &Collision2D) -> bool {
        self.highlighted = self.bounds.intersects(&other.bounds);
        self.highlighted
    }

    /// Whether the last [`Collision2D::is_colliding`] call found an overlap.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted = false;
    }

    pub(crate) fn set_highlight(&mut self, on: bool) {
        self.highlighted = on;
    }
}

impl AsRef<Rect> for Collision2D {
    fn as_ref(&self) -> &Rect {
        &self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_mutate_bounds_in_place() {
        let mut c = Collision2D::new("crate", Rect::new(0.0, 10.0, 10.0, 10.0)).with_tag(7);
        c.set_pos(5.0, 20.0);
        assert_eq!(*c.bounds(), Rect::new(5.0, 10.0, 20.0, 10.0));
        c.set(1.0, 2.0, 3.0, 4.0);
        assert_eq!(*c.bounds(), Rect::new(1.0, 2.0, 3.0, 4.0));
        c.set_bounds(&Rect::new(9.0, 9.0, 9.0, 9.0));
        assert_eq!(c.bounds().right(), 18.0);
        assert_eq!(c.tag(), Some(7));
        assert_eq!(c.id(), "crate");
    }

    #[test]
    fn test_is_colliding_tracks_highlight() {
        let mut a = Collision2D::new("a", Rect::new(0.0, 10.0, 10.0, 10.0));
        let b = Collision2D::new("b", Rect::new(5.0, 10.0, 10.0, 10.0));
        let far = Collision2D::new("far", Rect::new(50.0, 10.0, 10.0, 10.0));
        assert!(a.is_colliding(&b));
        assert!(a.is_highlighted());
        assert!(!a.is_colliding(&far));
        assert!(!a.is_highlighted());
        assert!(a.is_colliding_rect(b.bounds()));
        a.is_colliding(&b);
        a.clear_highlight();
        assert!(!a.is_highlighted());
    }
}
