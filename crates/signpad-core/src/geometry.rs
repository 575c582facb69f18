//! Geometry normalization for field placement.
//!
//! Field rectangles are stored at a fixed base rendering scale. During a
//! drag or resize the candidate geometry stays raw for smooth feedback;
//! [`normalize`] runs exactly once at gesture end and is the only path by
//! which geometry reaches a document draft.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Minimum field width/height in base-scale pixels.
pub const MIN_FIELD_SIZE: f64 = 20.0;

/// Default grid unit for snapping committed geometry.
pub const DEFAULT_SNAP_UNIT: f64 = 5.0;

/// An axis-aligned field box in base-scale page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FieldRect {
    /// Create a new rect.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the rect as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Check if a point lies inside the rect.
    pub fn contains(&self, point: Point) -> bool {
        self.as_rect().contains(point)
    }

    /// Return the rect translated by a delta.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Check that every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Snap a span (width or height) to the grid while keeping it within
/// `[min, max]`. Falls back to `min` when no grid multiple fits the range,
/// which also covers containers smaller than the minimum size.
fn snap_span(value: f64, unit: f64, min: f64, max: f64) -> f64 {
    if max < min {
        return min;
    }
    let mut v = (value / unit).round() * unit;
    if v < min {
        v = (min / unit).ceil() * unit;
    }
    if v > max {
        v = (max / unit).floor() * unit;
    }
    if v < min || v > max { min } else { v }
}

/// Snap an offset to the grid while keeping it within `[0, max]`. The upper
/// bound itself is floored to the grid, so the result is always a grid
/// multiple and the box never leaves the container.
fn snap_offset(value: f64, unit: f64, max: f64) -> f64 {
    let max = max.max(0.0);
    let hi = (max / unit).floor() * unit;
    let v = (value / unit).round() * unit;
    v.clamp(0.0, hi)
}

/// Normalize a candidate geometry against its container.
///
/// Spans clamp to at least [`MIN_FIELD_SIZE`] and at most the container
/// dimension; offsets clamp so the box stays inside the container; all four
/// components land on multiples of `snap_unit` whenever a multiple exists
/// inside the feasible range. Clamping is grid-aware, which makes the
/// function idempotent: normalizing an already-normalized rect returns it
/// unchanged.
///
/// Non-finite inputs are sanitized before any math (offsets fall back to 0,
/// spans to the minimum size), so a poisoned geometry can never come out.
/// A box larger than its container pins to the top-left extent.
pub fn normalize(candidate: FieldRect, container: Size, snap_unit: f64) -> FieldRect {
    let unit = if snap_unit.is_finite() && snap_unit >= 1.0 {
        snap_unit
    } else {
        1.0
    };
    let cw = if container.width.is_finite() {
        container.width.max(0.0)
    } else {
        0.0
    };
    let ch = if container.height.is_finite() {
        container.height.max(0.0)
    } else {
        0.0
    };

    let x = if candidate.x.is_finite() { candidate.x } else { 0.0 };
    let y = if candidate.y.is_finite() { candidate.y } else { 0.0 };
    let w = if candidate.width.is_finite() {
        candidate.width
    } else {
        MIN_FIELD_SIZE
    };
    let h = if candidate.height.is_finite() {
        candidate.height
    } else {
        MIN_FIELD_SIZE
    };

    let width = snap_span(w, unit, MIN_FIELD_SIZE, cw);
    let height = snap_span(h, unit, MIN_FIELD_SIZE, ch);
    let x = snap_offset(x, unit, cw - width);
    let y = snap_offset(y, unit, ch - height);

    FieldRect::new(x, y, width, height)
}

/// Ratio between a target display scale and the base editing scale.
///
/// Degenerate scales (zero, negative, non-finite) yield 1.0 so bad page
/// metadata can never distort stored geometry.
pub fn scale_ratio(base_scale: f64, target_scale: f64) -> f64 {
    if !base_scale.is_finite()
        || base_scale <= 0.0
        || !target_scale.is_finite()
        || target_scale <= 0.0
    {
        return 1.0;
    }
    target_scale / base_scale
}

/// Project a base-scale rect into the coordinate space of another rendering
/// scale. The editor overlay and every read-only viewer derive their boxes
/// through this one function, which is what keeps them aligned at any zoom.
pub fn project_to_scale(rect: FieldRect, base_scale: f64, target_scale: f64) -> FieldRect {
    let ratio = scale_ratio(base_scale, target_scale);
    FieldRect::new(
        rect.x * ratio,
        rect.y * ratio,
        rect.width * ratio,
        rect.height * ratio,
    )
}
