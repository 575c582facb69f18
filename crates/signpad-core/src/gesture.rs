//! Interactive drag/resize controller.
//!
//! One controller instance tracks one gesture at a time. Pointer moves
//! only update a local, unsnapped candidate so the visual feedback stays
//! smooth; the geometry engine runs once at pointer-up and the gesture
//! produces exactly one commit.

use crate::field::FieldId;
use crate::geometry::{FieldRect, normalize};
use crate::handles::HandleKind;
use kurbo::{Point, Size};
use log::debug;

/// Where a gesture grabbed the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureTarget {
    /// The field body: the gesture translates the box.
    Body,
    /// A resize handle: the gesture resizes along the handle's axes.
    Handle(HandleKind),
}

/// Phase of the active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging,
    Resizing(HandleKind),
}

impl GesturePhase {
    /// Check if a gesture is in flight.
    pub fn is_active(&self) -> bool {
        !matches!(self, GesturePhase::Idle)
    }
}

/// The single authoritative write produced by a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureCommit {
    pub field_id: FieldId,
    pub rect: FieldRect,
}

/// Tracks one press-move-release interaction on a single field.
///
/// A pointer can only be in one place at a time, so a new gesture can only
/// start once the previous one has resolved back to idle; `pointer_down`
/// enforces that by ignoring presses while active.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    phase: GesturePhase,
    field_id: Option<FieldId>,
    start_pointer: Point,
    start_rect: FieldRect,
    candidate: FieldRect,
}

impl GestureController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Check if a gesture is in flight.
    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    /// The live candidate geometry for preview rendering, while active.
    pub fn candidate(&self) -> Option<FieldRect> {
        self.is_active().then_some(self.candidate)
    }

    /// Start a gesture on a field.
    ///
    /// Returns whether the press was consumed. The host must stop event
    /// propagation on a consumed press so the drag does not double as a
    /// page-level deselect click. A press while a gesture is already
    /// active is ignored.
    pub fn pointer_down(
        &mut self,
        field_id: FieldId,
        rect: FieldRect,
        target: GestureTarget,
        pointer: Point,
    ) -> bool {
        if self.is_active() {
            return false;
        }
        if !pointer.x.is_finite() || !pointer.y.is_finite() || !rect.is_finite() {
            return false;
        }
        self.phase = match target {
            GestureTarget::Body => GesturePhase::Dragging,
            GestureTarget::Handle(kind) => GesturePhase::Resizing(kind),
        };
        self.field_id = Some(field_id);
        self.start_pointer = pointer;
        self.start_rect = rect;
        self.candidate = rect;
        true
    }

    /// Track a pointer move, updating the unsnapped candidate.
    ///
    /// Returns the candidate for preview, or `None` while idle. Non-finite
    /// pointer coordinates (malformed events) leave the candidate at its
    /// last valid value.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<FieldRect> {
        if !self.is_active() {
            return None;
        }
        if pointer.x.is_finite() && pointer.y.is_finite() {
            let dx = pointer.x - self.start_pointer.x;
            let dy = pointer.y - self.start_pointer.y;
            self.candidate = apply_delta(self.start_rect, self.phase, dx, dy);
        }
        Some(self.candidate)
    }

    /// Finish the gesture: normalize the candidate exactly once and emit
    /// the single commit. Pointer-up while idle is a no-op.
    pub fn pointer_up(&mut self, container: Size, snap_unit: f64) -> Option<GestureCommit> {
        if !self.is_active() {
            return None;
        }
        let field_id = self.field_id.take()?;
        let rect = normalize(self.candidate, container, snap_unit);
        debug!("gesture commit for field {field_id}: {rect:?}");
        self.phase = GesturePhase::Idle;
        self.candidate = rect;
        Some(GestureCommit { field_id, rect })
    }

    /// Resolve a gesture whose pointer-up was lost (window blur, focus
    /// change). Commits the current candidate through the same path as
    /// `pointer_up`, so a stuck gesture cannot exist.
    pub fn force_resolve(&mut self, container: Size, snap_unit: f64) -> Option<GestureCommit> {
        self.pointer_up(container, snap_unit)
    }
}

/// Derive the candidate geometry for a pointer delta.
///
/// Dragging translates the box; edge handles move one side; corner handles
/// move two. Spans may go negative or tiny here - the candidate is visual
/// state only, and normalization at gesture end restores the invariants.
fn apply_delta(start: FieldRect, phase: GesturePhase, dx: f64, dy: f64) -> FieldRect {
    match phase {
        GesturePhase::Idle => start,
        GesturePhase::Dragging => start.translated(dx, dy),
        GesturePhase::Resizing(kind) => {
            let mut r = start;
            match kind {
                HandleKind::Right => r.width += dx,
                HandleKind::Left => {
                    r.x += dx;
                    r.width -= dx;
                }
                HandleKind::Bottom => r.height += dy,
                HandleKind::Top => {
                    r.y += dy;
                    r.height -= dy;
                }
                HandleKind::BottomRight => {
                    r.width += dx;
                    r.height += dy;
                }
                HandleKind::TopRight => {
                    r.y += dy;
                    r.height -= dy;
                    r.width += dx;
                }
                HandleKind::BottomLeft => {
                    r.x += dx;
                    r.width -= dx;
                    r.height += dy;
                }
                HandleKind::TopLeft => {
                    r.x += dx;
                    r.y += dy;
                    r.width -= dx;
                    r.height -= dy;
                }
            }
            r
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentDraft;
    use crate::field::{FieldPatch, FieldType};
    use crate::geometry::DEFAULT_SNAP_UNIT;

    const CONTAINER: Size = Size::new(1000.0, 800.0);

    fn start_rect() -> FieldRect {
        FieldRect::new(100.0, 100.0, 100.0, 50.0)
    }

    fn field_id() -> FieldId {
        uuid::Uuid::new_v4()
    }

    #[test]
    fn test_drag_translates_only() {
        let mut ctl = GestureController::new();
        assert!(ctl.pointer_down(
            field_id(),
            start_rect(),
            GestureTarget::Body,
            Point::new(150.0, 120.0)
        ));
        let candidate = ctl.pointer_move(Point::new(183.0, 147.0)).unwrap();
        assert_eq!(candidate, FieldRect::new(133.0, 127.0, 100.0, 50.0));
    }

    #[test]
    fn test_corner_resize_affects_both_axes() {
        let mut ctl = GestureController::new();
        ctl.pointer_down(
            field_id(),
            start_rect(),
            GestureTarget::Handle(HandleKind::BottomRight),
            Point::new(200.0, 150.0),
        );
        let candidate = ctl.pointer_move(Point::new(230.0, 170.0)).unwrap();
        assert_eq!(candidate, FieldRect::new(100.0, 100.0, 130.0, 70.0));
    }

    #[test]
    fn test_top_left_resize_moves_origin() {
        let mut ctl = GestureController::new();
        ctl.pointer_down(
            field_id(),
            start_rect(),
            GestureTarget::Handle(HandleKind::TopLeft),
            Point::new(100.0, 100.0),
        );
        let candidate = ctl.pointer_move(Point::new(90.0, 85.0)).unwrap();
        assert_eq!(candidate, FieldRect::new(90.0, 85.0, 110.0, 65.0));
    }

    #[test]
    fn test_edge_resize_affects_one_axis() {
        let mut ctl = GestureController::new();
        ctl.pointer_down(
            field_id(),
            start_rect(),
            GestureTarget::Handle(HandleKind::Right),
            Point::new(200.0, 125.0),
        );
        let candidate = ctl.pointer_move(Point::new(241.0, 300.0)).unwrap();
        assert_eq!(candidate, FieldRect::new(100.0, 100.0, 141.0, 50.0));
    }

    #[test]
    fn test_single_commit_per_gesture() {
        let mut draft = DocumentDraft::new("Untitled");
        let id = draft.add_field(FieldType::Text, 1, start_rect());

        let mut ctl = GestureController::new();
        ctl.pointer_down(id, start_rect(), GestureTarget::Body, Point::new(150.0, 120.0));

        let mut commits = 0;
        let mut last_candidate = start_rect();
        for i in 0..50 {
            let p = Point::new(150.0 + i as f64, 120.0 + i as f64 * 0.5);
            last_candidate = ctl.pointer_move(p).unwrap();
            // No commit is available mid-gesture; only pointer-up yields one.
        }
        if let Some(commit) = ctl.pointer_up(CONTAINER, DEFAULT_SNAP_UNIT) {
            commits += 1;
            assert_eq!(commit.rect, normalize(last_candidate, CONTAINER, DEFAULT_SNAP_UNIT));
            draft.update_field(commit.field_id, FieldPatch::geometry(commit.rect));
        }
        // A second pointer-up with no active gesture produces nothing.
        if ctl.pointer_up(CONTAINER, DEFAULT_SNAP_UNIT).is_some() {
            commits += 1;
        }

        assert_eq!(commits, 1);
        let committed = draft.field(id).unwrap().rect;
        assert_eq!(committed, normalize(last_candidate, CONTAINER, DEFAULT_SNAP_UNIT));
    }

    #[test]
    fn test_pointer_up_without_gesture_is_noop() {
        let mut ctl = GestureController::new();
        assert!(ctl.pointer_up(CONTAINER, DEFAULT_SNAP_UNIT).is_none());
    }

    #[test]
    fn test_second_pointer_down_is_ignored() {
        let mut ctl = GestureController::new();
        assert!(ctl.pointer_down(
            field_id(),
            start_rect(),
            GestureTarget::Body,
            Point::new(150.0, 120.0)
        ));
        assert!(!ctl.pointer_down(
            field_id(),
            start_rect(),
            GestureTarget::Body,
            Point::new(0.0, 0.0)
        ));
        assert_eq!(ctl.phase(), GesturePhase::Dragging);
    }

    #[test]
    fn test_nan_pointer_move_keeps_last_candidate() {
        let mut ctl = GestureController::new();
        ctl.pointer_down(field_id(), start_rect(), GestureTarget::Body, Point::new(150.0, 120.0));
        let good = ctl.pointer_move(Point::new(175.0, 140.0)).unwrap();
        let after_nan = ctl.pointer_move(Point::new(f64::NAN, 140.0)).unwrap();
        assert_eq!(good, after_nan);

        let commit = ctl.pointer_up(CONTAINER, DEFAULT_SNAP_UNIT).unwrap();
        assert!(commit.rect.is_finite());
        assert_eq!(commit.rect, normalize(good, CONTAINER, DEFAULT_SNAP_UNIT));
    }

    #[test]
    fn test_force_resolve_commits_and_idles() {
        let mut ctl = GestureController::new();
        let id = field_id();
        ctl.pointer_down(id, start_rect(), GestureTarget::Body, Point::new(150.0, 120.0));
        ctl.pointer_move(Point::new(180.0, 150.0));

        let commit = ctl.force_resolve(CONTAINER, DEFAULT_SNAP_UNIT).unwrap();
        assert_eq!(commit.field_id, id);
        assert_eq!(ctl.phase(), GesturePhase::Idle);
        assert!(ctl.force_resolve(CONTAINER, DEFAULT_SNAP_UNIT).is_none());
    }

    #[test]
    fn test_commit_geometry_is_normalized() {
        let mut ctl = GestureController::new();
        ctl.pointer_down(
            field_id(),
            start_rect(),
            GestureTarget::Handle(HandleKind::BottomRight),
            Point::new(200.0, 150.0),
        );
        // Shrink well below the minimum size.
        ctl.pointer_move(Point::new(50.0, 50.0));
        let commit = ctl.pointer_up(CONTAINER, DEFAULT_SNAP_UNIT).unwrap();
        assert!(commit.rect.width >= crate::geometry::MIN_FIELD_SIZE);
        assert!(commit.rect.height >= crate::geometry::MIN_FIELD_SIZE);
    }
}
