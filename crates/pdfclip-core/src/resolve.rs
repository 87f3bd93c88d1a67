//! Turn user input into a [`Region`] in document point space.
//!
//! Two input modes: four numbers typed directly in points, or a rectangle
//! drawn on a raster preview of the first document. Canvas mode assumes the
//! preview renderer scales the page uniformly per axis, without margins,
//! cropping or rotation; [`crate::preview::PdftoppmRenderer`] satisfies this.

use serde::{Deserialize, Serialize};

use crate::error::PdfClipError;
use crate::extraction::PageSize;
use crate::preview::PreviewImage;
use crate::region::Region;

/// A rectangle drawn on a preview image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// What to do with a direct-mode region of zero width or height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// Accept it; extraction then yields empty text.
    #[default]
    Allow,
    Reject,
}

/// Region input as the caller supplies it.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionSpec {
    Direct {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Canvas {
        rect: CanvasRect,
        preview: PreviewImage,
        page: PageSize,
    },
}

pub fn resolve(spec: &RegionSpec, policy: DegeneratePolicy) -> Result<Region, PdfClipError> {
    match spec {
        RegionSpec::Direct { x1, y1, x2, y2 } => resolve_direct(*x1, *y1, *x2, *y2, policy),
        RegionSpec::Canvas {
            rect,
            preview,
            page,
        } => resolve_canvas(rect, preview, page),
    }
}

/// Direct mode: no unit conversion, only normalization. Out-of-page regions
/// are accepted.
pub fn resolve_direct(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    policy: DegeneratePolicy,
) -> Result<Region, PdfClipError> {
    if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
        return Err(PdfClipError::InvalidGeometry(format!(
            "coordinates must be finite numbers, got ({x1}, {y1}, {x2}, {y2})"
        )));
    }

    let region = Region::new(x1, y1, x2, y2);
    if policy == DegeneratePolicy::Reject && region.is_degenerate() {
        return Err(PdfClipError::InvalidGeometry(format!(
            "region {region} has zero width or height"
        )));
    }
    Ok(region)
}

/// Canvas mode: map a pixel rectangle on `preview` to points on `page`,
/// scaling each axis independently.
pub fn resolve_canvas(
    rect: &CanvasRect,
    preview: &PreviewImage,
    page: &PageSize,
) -> Result<Region, PdfClipError> {
    if preview.width_px == 0 || preview.height_px == 0 {
        return Err(PdfClipError::InvalidGeometry(format!(
            "preview image has no pixels ({}x{})",
            preview.width_px, preview.height_px
        )));
    }
    let page_ok = |v: f64| v.is_finite() && v > 0.0;
    if !page_ok(page.width_pt) || !page_ok(page.height_pt) {
        return Err(PdfClipError::InvalidGeometry(format!(
            "reference page has no usable size ({}x{} pt)",
            page.width_pt, page.height_pt
        )));
    }
    let values = [rect.left, rect.top, rect.width, rect.height];
    if !values.iter().all(|v| v.is_finite()) {
        return Err(PdfClipError::InvalidGeometry(
            "canvas rectangle has non-finite values".into(),
        ));
    }
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return Err(PdfClipError::InvalidGeometry(format!(
            "canvas rectangle must have positive size, got {}x{}",
            rect.width, rect.height
        )));
    }
    if rect.left < 0.0 || rect.top < 0.0 {
        return Err(PdfClipError::InvalidGeometry(format!(
            "canvas rectangle starts outside the image at ({}, {})",
            rect.left, rect.top
        )));
    }

    let scale_x = page.width_pt / f64::from(preview.width_px);
    let scale_y = page.height_pt / f64::from(preview.height_px);

    Ok(Region::new(
        rect.left * scale_x,
        rect.top * scale_y,
        (rect.left + rect.width) * scale_x,
        (rect.top + rect.height) * scale_y,
    ))
}
