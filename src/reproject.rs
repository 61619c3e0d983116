//! Reprojection: recomputing a character's placement when the pinned
//! target's geometry changes.

#[cfg(test)]
#[path = "reproject_test.rs"]
mod reproject_test;

use serde::{Deserialize, Serialize};

use crate::consts::SIZE_SWITCH_RATIO;
use crate::geom::{Point, Rect, Size};
use crate::record::RelativePositionRecord;
use crate::scale::resolve_scale;

/// Where the character should render: a top-left offset plus uniform scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Left edge in viewport pixels.
    pub left: f64,
    /// Top edge in viewport pixels.
    pub top: f64,
    /// Uniform character scale.
    pub scale: f64,
}

impl Placement {
    /// The character center this placement encodes, given the character size.
    #[must_use]
    pub fn center(&self, size: Size) -> Point {
        Point::new(self.left + size.width / 2.0, self.top + size.height / 2.0)
    }
}

/// Reprojection failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReprojectError {
    /// The pinned target left the document; the pin should be dropped.
    #[error("pin target is no longer attached to the document")]
    TargetDetached,
}

/// Recompute the character placement for `record` against the target's new
/// rectangle.
///
/// Image targets always take the scale-normalized path: the live scale is
/// re-resolved and the stored ratio offset is re-applied to the current
/// scaled natural basis, keeping the character locked to the same point on
/// the image across viewport and zoom changes. Non-image targets switch
/// between the ratio path and the raw pixel path on a width-change threshold,
/// which keeps near-static layouts immune to float jitter.
///
/// # Errors
///
/// [`ReprojectError::TargetDetached`] when the target element has left the
/// document. Callers treat this as an implicit pin teardown.
pub fn reproject(
    record: &RelativePositionRecord,
    new_target: Rect,
    character_size: Size,
) -> Result<Placement, ReprojectError> {
    if !record.target.is_connected() {
        return Err(ReprojectError::TargetDetached);
    }

    let anchor_point = record.anchor.point_on(new_target);

    let (center, scale) = if record.image_scale_at_creation.is_image {
        let current = resolve_scale(record.target.as_ref());
        let basis = current.basis();
        let center = Point::new(
            anchor_point.x + basis.width * record.ratio_offset.x,
            anchor_point.y + basis.height * record.ratio_offset.y,
        );
        let creation_total = record.image_scale_at_creation.total_scale;
        let scale = if creation_total > 0.0 {
            record.recommended_scale * (current.total_scale / creation_total)
        } else {
            record.recommended_scale
        };
        (center, scale)
    } else {
        let created = record.target_size_at_creation;
        let width_change = if created.width > 0.0 {
            (new_target.width - created.width).abs() / created.width
        } else {
            // Degenerate creation sizes never pass validation; force the
            // ratio path if one slips through.
            1.0
        };
        let center = if width_change > SIZE_SWITCH_RATIO {
            Point::new(
                anchor_point.x + new_target.width * record.ratio_offset.x,
                anchor_point.y + new_target.height * record.ratio_offset.y,
            )
        } else {
            Point::new(anchor_point.x + record.raw_offset.x, anchor_point.y + record.raw_offset.y)
        };
        (center, 1.0)
    };

    Ok(Placement {
        left: center.x - character_size.width / 2.0,
        top: center.y - character_size.height / 2.0,
        scale,
    })
}
