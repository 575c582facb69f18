//! PDF rendering collaborator interface.
//!
//! The model never decodes PDF bytes itself. It needs exactly three things
//! from whatever renders the document: the page count, per-page pixel
//! dimensions at a requested scale, and a rasterized image to draw under
//! the field overlay.

use crate::render::PageInfo;
use thiserror::Error;

/// PDF collaborator failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PdfError {
    #[error("page {0} out of range")]
    PageOutOfRange(u32),
    #[error("document could not be decoded: {0}")]
    Decode(String),
}

/// A rasterized page image (tightly packed RGBA8).
#[derive(Debug, Clone)]
pub struct PageImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Opens raw document bytes into a pageable handle.
pub trait PdfRenderer {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfPages>, PdfError>;
}

/// One opened document. Pages are 1-based, matching field pages.
pub trait PdfPages {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Pixel dimensions of a page rendered at the given scale.
    fn page_info(&self, page: u32, scale: f64) -> Result<PageInfo, PdfError>;

    /// Rasterize a page at the given scale.
    fn rasterize(&self, page: u32, scale: f64) -> Result<PageImage, PdfError>;
}

/// A document whose pages all share one natural size. Used by tests and
/// as a placeholder while a real renderer loads.
#[derive(Debug, Clone)]
pub struct FixedSizePdf {
    pages: u32,
    natural_width: f64,
    natural_height: f64,
}

impl FixedSizePdf {
    /// Create a uniform document. Dimensions are at scale 1.0.
    pub fn new(pages: u32, natural_width: f64, natural_height: f64) -> Self {
        Self {
            pages,
            natural_width,
            natural_height,
        }
    }

    fn check_page(&self, page: u32) -> Result<(), PdfError> {
        if page == 0 || page > self.pages {
            Err(PdfError::PageOutOfRange(page))
        } else {
            Ok(())
        }
    }
}

impl PdfPages for FixedSizePdf {
    fn page_count(&self) -> u32 {
        self.pages
    }

    fn page_info(&self, page: u32, scale: f64) -> Result<PageInfo, PdfError> {
        self.check_page(page)?;
        Ok(PageInfo::new(
            self.natural_width * scale,
            self.natural_height * scale,
            scale,
        ))
    }

    fn rasterize(&self, page: u32, scale: f64) -> Result<PageImage, PdfError> {
        let info = self.page_info(page, scale)?;
        let width = info.width.max(1.0) as u32;
        let height = info.height.max(1.0) as u32;
        // Blank white page.
        let pixels = vec![0xFF; (width as usize) * (height as usize) * 4];
        Ok(PageImage {
            width,
            height,
            pixels,
        })
    }
}
