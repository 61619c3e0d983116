//! Relative position capture: the offset between a character and its anchor
//! at pin-creation time, in both pixel and scale-normalized form.

#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;

use std::fmt;
use std::rc::Rc;

use crate::anchor::AnchorId;
use crate::element::{ElementHandle, ElementRef};
use crate::geom::{Point, Size};
use crate::scale::{ImageScaleInfo, resolve_scale};

/// Geometry snapshot binding a character to an anchor on a target element.
///
/// Created once per pin and read-only afterwards; replacing a pin discards
/// the old record rather than mutating it. Keeps a handle to the target so
/// reprojection can re-query the live scale.
#[derive(Clone)]
pub struct RelativePositionRecord {
    /// Anchor the offsets are measured from.
    pub anchor: AnchorId,
    /// Pixel delta from the anchor point to the character center at creation.
    pub raw_offset: Point,
    /// `raw_offset` normalized by the target's scaled natural basis.
    pub ratio_offset: Point,
    /// Target rendered size at creation, for the resize-threshold policy.
    pub target_size_at_creation: Size,
    /// Target scale at creation, for scale-ratio chaining.
    pub image_scale_at_creation: ImageScaleInfo,
    /// Character scale to reproduce while the target scale is unchanged.
    pub recommended_scale: f64,
    /// The target element, re-queried at reprojection time.
    pub target: ElementRef,
}

impl fmt::Debug for RelativePositionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelativePositionRecord")
            .field("anchor", &self.anchor)
            .field("raw_offset", &self.raw_offset)
            .field("ratio_offset", &self.ratio_offset)
            .field("target_size_at_creation", &self.target_size_at_creation)
            .field("image_scale_at_creation", &self.image_scale_at_creation)
            .field("recommended_scale", &self.recommended_scale)
            .finish_non_exhaustive()
    }
}

/// Snapshot the relative position of `character` against `anchor` on
/// `target`, with an extra user-chosen pixel `offset` folded into the delta.
///
/// Inputs are assumed validated (non-degenerate rects, see the registry);
/// the ratio divisions are still guarded so a raw call can never produce NaN.
#[must_use]
pub fn compute_relative_position(
    target: &ElementRef,
    character: &dyn ElementHandle,
    anchor: AnchorId,
    offset: Point,
) -> RelativePositionRecord {
    let target_rect = target.rect();
    let character_rect = character.rect();
    let scale = resolve_scale(target.as_ref());

    let anchor_point = anchor.point_on(target_rect);
    let character_center = character_rect.center();

    let raw_offset = Point::new(
        character_center.x - anchor_point.x + offset.x,
        character_center.y - anchor_point.y + offset.y,
    );

    let basis = scale.basis();
    let ratio_offset = Point::new(
        guarded_div(raw_offset.x, basis.width),
        guarded_div(raw_offset.y, basis.height),
    );

    RelativePositionRecord {
        anchor,
        raw_offset,
        ratio_offset,
        target_size_at_creation: target_rect.size(),
        image_scale_at_creation: scale,
        recommended_scale: scale.total_scale,
        target: Rc::clone(target),
    }
}

fn guarded_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 { 0.0 } else { numerator / denominator }
}
