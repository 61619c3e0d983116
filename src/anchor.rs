//! Anchor points: the nine named grid positions on a target's bounding box.
//!
//! An anchor is the fixed reference point a character's offset is measured
//! from. Codes are row-then-column (`T`op/`M`iddle/`B`ottom then
//! `L`eft/`C`enter/`R`ight) and arrive from the host boundary as raw strings,
//! so parsing reports a typed error instead of silently falling back to the
//! center.

#[cfg(test)]
#[path = "anchor_test.rs"]
mod anchor_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{ZONE_HIGH, ZONE_LOW};
use crate::geom::{Point, Rect};

/// Error returned when an anchor code from the host boundary is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid anchor code: {0:?}")]
pub struct InvalidAnchor(pub String);

/// One of the nine grid positions on a target element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnchorId {
    /// Top-left corner.
    Tl,
    /// Top-center.
    Tc,
    /// Top-right corner.
    Tr,
    /// Middle-left.
    Ml,
    /// Middle-center.
    Mc,
    /// Middle-right.
    Mr,
    /// Bottom-left corner.
    Bl,
    /// Bottom-center.
    Bc,
    /// Bottom-right corner.
    Br,
}

impl AnchorId {
    /// All nine anchors, row-major from the top-left.
    pub const ALL: [Self; 9] = [
        Self::Tl,
        Self::Tc,
        Self::Tr,
        Self::Ml,
        Self::Mc,
        Self::Mr,
        Self::Bl,
        Self::Bc,
        Self::Br,
    ];

    /// Normalized `(x, y)` ratios in `[0, 1]` locating this anchor on a
    /// bounding box.
    #[must_use]
    pub fn ratios(self) -> Point {
        match self {
            Self::Tl => Point::new(0.0, 0.0),
            Self::Tc => Point::new(0.5, 0.0),
            Self::Tr => Point::new(1.0, 0.0),
            Self::Ml => Point::new(0.0, 0.5),
            Self::Mc => Point::new(0.5, 0.5),
            Self::Mr => Point::new(1.0, 0.5),
            Self::Bl => Point::new(0.0, 1.0),
            Self::Bc => Point::new(0.5, 1.0),
            Self::Br => Point::new(1.0, 1.0),
        }
    }

    /// Two-letter code, e.g. `"TC"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tl => "TL",
            Self::Tc => "TC",
            Self::Tr => "TR",
            Self::Ml => "ML",
            Self::Mc => "MC",
            Self::Mr => "MR",
            Self::Bl => "BL",
            Self::Bc => "BC",
            Self::Br => "BR",
        }
    }

    /// Absolute viewport position of this anchor on `rect`.
    #[must_use]
    pub fn point_on(self, rect: Rect) -> Point {
        let r = self.ratios();
        rect.point_at(r.x, r.y)
    }
}

impl FromStr for AnchorId {
    type Err = InvalidAnchor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TL" => Ok(Self::Tl),
            "TC" => Ok(Self::Tc),
            "TR" => Ok(Self::Tr),
            "ML" => Ok(Self::Ml),
            "MC" => Ok(Self::Mc),
            "MR" => Ok(Self::Mr),
            "BL" => Ok(Self::Bl),
            "BC" => Ok(Self::Bc),
            "BR" => Ok(Self::Br),
            other => Err(InvalidAnchor(other.to_string())),
        }
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A suggested anchor for a character's current position over a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    /// The suggested anchor.
    pub anchor: AnchorId,
    /// `0.0` (character at the target center, ambiguous) up to `1.0`.
    pub confidence: f64,
}

/// Recommend an anchor from where the character center sits within the target.
///
/// The target is split into a 3×3 zone grid at 33% / 67%; the zone containing
/// the normalized character center names the anchor. Confidence grows with
/// distance from the target center and saturates at `1.0`. A zero-area target
/// has no usable interior and yields `MC` at confidence `0.0`.
#[must_use]
pub fn recommend(target: Rect, character: Rect) -> Recommendation {
    if target.is_degenerate() {
        return Recommendation { anchor: AnchorId::Mc, confidence: 0.0 };
    }

    let center = character.center();
    let nx = (center.x - target.left) / target.width;
    let ny = (center.y - target.top) / target.height;

    let col = if nx < ZONE_LOW {
        0
    } else if nx > ZONE_HIGH {
        2
    } else {
        1
    };
    let row = if ny < ZONE_LOW {
        0
    } else if ny > ZONE_HIGH {
        2
    } else {
        1
    };

    let center_distance = ((nx - 0.5).powi(2) + (ny - 0.5).powi(2)).sqrt();

    Recommendation {
        anchor: AnchorId::ALL[row * 3 + col],
        confidence: (center_distance * 2.0).min(1.0),
    }
}
