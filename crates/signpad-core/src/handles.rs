//! Resize handle definitions for the field editor overlay.

use crate::geometry::FieldRect;
use kurbo::Point;

/// Handle hit tolerance in display pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// The kind of handle - determines which axes a resize affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

/// A manipulation handle on a field box.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub kind: HandleKind,
    /// Position in the same coordinate space as the rect it was built from.
    pub position: Point,
}

impl Handle {
    /// Create a new handle.
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self { kind, position }
    }

    /// Check if a point hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// The eight resize handles for a field box: four corners plus four edge
/// midpoints.
pub fn handles_for(rect: &FieldRect) -> Vec<Handle> {
    let x0 = rect.x;
    let y0 = rect.y;
    let x1 = rect.x + rect.width;
    let y1 = rect.y + rect.height;
    let cx = (x0 + x1) / 2.0;
    let cy = (y0 + y1) / 2.0;
    vec![
        Handle::new(HandleKind::TopLeft, Point::new(x0, y0)),
        Handle::new(HandleKind::Top, Point::new(cx, y0)),
        Handle::new(HandleKind::TopRight, Point::new(x1, y0)),
        Handle::new(HandleKind::Right, Point::new(x1, cy)),
        Handle::new(HandleKind::BottomRight, Point::new(x1, y1)),
        Handle::new(HandleKind::Bottom, Point::new(cx, y1)),
        Handle::new(HandleKind::BottomLeft, Point::new(x0, y1)),
        Handle::new(HandleKind::Left, Point::new(x0, cy)),
    ]
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(rect: &FieldRect, point: Point, tolerance: f64) -> Option<HandleKind> {
    handles_for(rect)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}
