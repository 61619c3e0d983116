//! Collaborator contracts: element handles and geometry observation.
//!
//! The core never touches the DOM outside [`crate::dom`]; hosts hand it
//! opaque element handles and an observer capability, and get placements
//! written back through the same seam. This mirrors the engine/host split of
//! a browser-embedded canvas engine: the host wires real DOM machinery, the
//! core stays testable natively.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::geom::{Matrix2d, Rect, Size};
use crate::reproject::Placement;

/// Why a geometry notification fired.
///
/// The core records and logs the kind but never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    /// First notification for a fresh subscription.
    Initial,
    /// The element itself was resized.
    Resize,
    /// A scroll moved the element within the viewport.
    Scroll,
    /// An attribute or style mutation changed the element's geometry.
    Mutation,
    /// The window was resized.
    WindowResize,
}

/// Opaque handle to a host element.
///
/// Geometry queries are side-effect-free and must not fail: a detached or
/// hidden element reports a zero-area rect, which validation treats as too
/// small. [`set_placement`](Self::set_placement) is the single write-back
/// seam the reprojector uses to move a character.
pub trait ElementHandle {
    /// Current viewport-relative bounding rectangle.
    fn rect(&self) -> Rect;

    /// The element's active 2D affine transform, already decomposed into
    /// clean components, or `None` when no transform applies.
    fn computed_transform(&self) -> Option<Matrix2d>;

    /// Whether this element renders an image with intrinsic dimensions.
    fn is_image(&self) -> bool;

    /// Intrinsic (unscaled) pixel size for image elements; the rendered size
    /// for everything else. An image that has not loaded reports zero.
    fn natural_size(&self) -> Size;

    /// Whether the element is still attached to the document.
    fn is_connected(&self) -> bool;

    /// Stable identifier used to key pins, e.g. the DOM element id. Hosts
    /// must give character elements distinct ids.
    fn element_id(&self) -> String;

    /// Write a computed placement back to the element.
    fn set_placement(&self, placement: &Placement);
}

/// Shared element handle. The crate is single-threaded (browser main thread),
/// so plain reference counting suffices.
pub type ElementRef = Rc<dyn ElementHandle>;

/// Callback invoked by the observer with the watched element's latest rect.
pub type GeometryCallback = Box<dyn FnMut(Rect, ChangeKind)>;

/// Cancels an observation. After it returns, no further callback fires for
/// that subscription.
pub type Unsubscribe = Box<dyn FnOnce()>;

/// External capability that watches an element's geometry.
///
/// Implementations must notify on resize, scroll-driven reposition, and
/// attribute/style mutation. No cross-element ordering is required, and no
/// initial notification is expected — the registry positions a pin itself on
/// creation.
pub trait GeometryObserver {
    /// Begin watching `element`. The returned handle cancels the
    /// subscription synchronously.
    fn observe(&self, element: &ElementRef, callback: GeometryCallback) -> Unsubscribe;
}
