//! Projection of stored field geometry onto rendering surfaces.
//!
//! Field geometry lives at [`BASE_SCALE`]. Every surface that draws a page
//! - the interactive editor overlay, the review overlay, the read-only
//! status overlay - builds a [`SurfaceProjector`] for its own display
//! scale. Because each box derives from the same stored numbers, a field
//! sits at the same relative position on every surface at any zoom.

use crate::field::Field;
use crate::geometry::{FieldRect, project_to_scale};
use serde::{Deserialize, Serialize};

/// The fixed scale at which field geometry is authored and stored.
pub const BASE_SCALE: f64 = 1.5;

/// Pixel dimensions of one rendered page, captured once per page load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Rendered width in pixels at `scale`.
    pub width: f64,
    /// Rendered height in pixels at `scale`.
    pub height: f64,
    /// The scale the dimensions were rendered at.
    pub scale: f64,
}

impl PageInfo {
    /// Create page info for dimensions captured at a scale.
    pub fn new(width: f64, height: f64, scale: f64) -> Self {
        Self {
            width,
            height,
            scale,
        }
    }

    fn scale_or_one(&self) -> f64 {
        if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        }
    }

    /// Page width at scale 1.0.
    pub fn natural_width(&self) -> f64 {
        self.width / self.scale_or_one()
    }

    /// Page height at scale 1.0.
    pub fn natural_height(&self) -> f64 {
        self.height / self.scale_or_one()
    }

    /// The scale at which the page exactly fills `available_width` pixels,
    /// as used by the fit-to-width review canvas.
    pub fn fit_to_width(&self, available_width: f64) -> f64 {
        let natural = self.natural_width();
        if natural <= 0.0 || !available_width.is_finite() || available_width <= 0.0 {
            return 1.0;
        }
        available_width / natural
    }
}

/// Maps base-scale field geometry into one on-screen surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceProjector {
    base_scale: f64,
    target_scale: f64,
}

impl SurfaceProjector {
    /// Create a projector from the stored scale to a display scale.
    pub fn new(base_scale: f64, target_scale: f64) -> Self {
        Self {
            base_scale,
            target_scale,
        }
    }

    /// Projector for a surface that renders the page to fill
    /// `available_width` pixels. The page info must come from the same
    /// scale the fields were stored at.
    pub fn fit_to_width(page: &PageInfo, available_width: f64) -> Self {
        Self::new(page.scale, page.fit_to_width(available_width))
    }

    /// The display scale of this surface.
    pub fn target_scale(&self) -> f64 {
        self.target_scale
    }

    /// Project one rect.
    pub fn project(&self, rect: FieldRect) -> FieldRect {
        project_to_scale(rect, self.base_scale, self.target_scale)
    }

    /// Project one field's stored geometry.
    pub fn project_field(&self, field: &Field) -> FieldRect {
        self.project(field.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentDraft;
    use crate::field::FieldType;

    #[test]
    fn test_natural_size_divides_out_scale() {
        let page = PageInfo::new(918.0, 1188.0, 1.5);
        assert!((page.natural_width() - 612.0).abs() < f64::EPSILON);
        assert!((page.natural_height() - 792.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fit_to_width() {
        let page = PageInfo::new(918.0, 1188.0, 1.5);
        // A 1224px review canvas shows the 612pt page at 2x.
        assert!((page.fit_to_width(1224.0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_projection_doubles() {
        let projector = SurfaceProjector::new(1.5, 3.0);
        let rect = FieldRect::new(100.0, 50.0, 150.0, 50.0);
        assert_eq!(
            projector.project(rect),
            FieldRect::new(200.0, 100.0, 300.0, 100.0)
        );
    }

    #[test]
    fn test_projection_identity() {
        let projector = SurfaceProjector::new(1.5, 1.5);
        let rect = FieldRect::new(100.0, 50.0, 150.0, 50.0);
        assert_eq!(projector.project(rect), rect);
    }

    #[test]
    fn test_surfaces_agree_on_relative_position() {
        // The same stored field projected onto three surfaces keeps its
        // relative position on the page. This is the rendering contract
        // the whole model exists to uphold.
        let mut draft = DocumentDraft::new("Untitled");
        let page = PageInfo::new(918.0, 1188.0, BASE_SCALE);
        let id = draft.add_field(
            FieldType::Signature,
            1,
            FieldRect::new(459.0, 297.0, 150.0, 50.0),
        );
        let field = draft.field(id).unwrap();

        let editor = SurfaceProjector::new(BASE_SCALE, BASE_SCALE);
        let review = SurfaceProjector::fit_to_width(&page, 1224.0);
        let status = SurfaceProjector::new(BASE_SCALE, 0.75);

        for projector in [editor, review, status] {
            let rect = projector.project_field(field);
            let page_width = page.natural_width() * projector.target_scale();
            let page_height = page.natural_height() * projector.target_scale();
            assert!((rect.x / page_width - 0.5).abs() < 1e-9);
            assert!((rect.y / page_height - 0.25).abs() < 1e-9);
        }
    }
}
