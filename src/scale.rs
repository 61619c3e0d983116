//! Image scale resolution: how much larger or smaller an element renders
//! than its intrinsic size.
//!
//! Resolved fresh for every computation — the live transform can change
//! between calls, so caching a scale across reprojections would go stale.

#[cfg(test)]
#[path = "scale_test.rs"]
mod scale_test;

use serde::{Deserialize, Serialize};

use crate::element::ElementHandle;
use crate::geom::Size;

/// Snapshot of an element's rendering scale at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageScaleInfo {
    /// Whether the element has intrinsic image dimensions.
    pub is_image: bool,
    /// Intrinsic width in pixels; rendered width for non-images.
    pub natural_width: f64,
    /// Intrinsic height in pixels; rendered height for non-images.
    pub natural_height: f64,
    /// Horizontal rendered/natural ratio.
    pub scale_x: f64,
    /// Vertical rendered/natural ratio.
    pub scale_y: f64,
    /// Uniform scalar, `sqrt(scale_x * scale_y)`, for callers that only care
    /// about overall magnitude (character scale sync).
    pub total_scale: f64,
}

impl ImageScaleInfo {
    /// The scaled natural basis `natural × scale`, used to normalize offsets.
    #[must_use]
    pub fn basis(&self) -> Size {
        Size::new(self.natural_width * self.scale_x, self.natural_height * self.scale_y)
    }
}

/// Resolve the element's current scale.
///
/// For image elements the bounding rect already carries every active scale
/// source (CSS sizing and transforms alike), so the rendered/natural ratio is
/// the complete per-axis scale. Non-image elements have no intrinsic size;
/// their natural size is the rendered size and only a decomposed transform
/// contributes scale. An image that has not loaded yet (natural size zero)
/// falls back to its rendered rect at scale 1, so downstream ratio math never
/// divides by zero.
#[must_use]
pub fn resolve_scale(element: &dyn ElementHandle) -> ImageScaleInfo {
    let rect = element.rect();
    let is_image = element.is_image();

    if is_image {
        let natural = element.natural_size();
        if natural.width > 0.0 && natural.height > 0.0 {
            let scale_x = rect.width / natural.width;
            let scale_y = rect.height / natural.height;
            return ImageScaleInfo {
                is_image,
                natural_width: natural.width,
                natural_height: natural.height,
                scale_x,
                scale_y,
                total_scale: (scale_x * scale_y).sqrt(),
            };
        }
        // Not loaded yet: no usable intrinsic size.
        return ImageScaleInfo {
            is_image,
            natural_width: rect.width,
            natural_height: rect.height,
            scale_x: 1.0,
            scale_y: 1.0,
            total_scale: 1.0,
        };
    }

    let (scale_x, scale_y) = match element.computed_transform() {
        Some(m) => (m.scale_x(), m.scale_y()),
        None => (1.0, 1.0),
    };

    ImageScaleInfo {
        is_image,
        natural_width: rect.width,
        natural_height: rect.height,
        scale_x,
        scale_y,
        total_scale: (scale_x * scale_y).sqrt(),
    }
}
