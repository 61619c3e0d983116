#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::geom::{Matrix2d, Rect};
use crate::reproject::Placement;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Element fake with a mutable rect so tests can simulate layout changes.
struct FakeElement {
    rect: Cell<Rect>,
    natural: Option<Size>,
    transform: Cell<Option<Matrix2d>>,
}

impl FakeElement {
    fn plain(rect: Rect) -> Rc<Self> {
        Rc::new(Self { rect: Cell::new(rect), natural: None, transform: Cell::new(None) })
    }

    fn image(rect: Rect, natural: Size) -> Rc<Self> {
        Rc::new(Self { rect: Cell::new(rect), natural: Some(natural), transform: Cell::new(None) })
    }
}

impl ElementHandle for FakeElement {
    fn rect(&self) -> Rect {
        self.rect.get()
    }

    fn computed_transform(&self) -> Option<Matrix2d> {
        self.transform.get()
    }

    fn is_image(&self) -> bool {
        self.natural.is_some()
    }

    fn natural_size(&self) -> Size {
        self.natural.unwrap_or_else(|| self.rect.get().size())
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn element_id(&self) -> String {
        String::new()
    }

    fn set_placement(&self, _placement: &Placement) {}
}

fn as_ref(element: &Rc<FakeElement>) -> ElementRef {
    Rc::clone(element) as Rc<dyn ElementHandle>
}

// --- Concrete scenario from the positioning design ---

#[test]
fn top_center_anchor_scenario() {
    // Target {100, 100, 200×100}, anchor TC → anchor point (200, 100).
    // Character {180, 50, 40×40} → center (200, 70). Raw offset (0, -30).
    let target = FakeElement::plain(Rect::new(100.0, 100.0, 200.0, 100.0));
    let character = FakeElement::plain(Rect::new(180.0, 50.0, 40.0, 40.0));

    let record = compute_relative_position(
        &as_ref(&target),
        character.as_ref(),
        AnchorId::Tc,
        Point::ZERO,
    );

    assert!(approx_eq(record.raw_offset.x, 0.0));
    assert!(approx_eq(record.raw_offset.y, -30.0));
    assert_eq!(record.target_size_at_creation, Size::new(200.0, 100.0));
}

#[test]
fn offset_is_folded_into_raw_delta() {
    let target = FakeElement::plain(Rect::new(100.0, 100.0, 200.0, 100.0));
    let character = FakeElement::plain(Rect::new(180.0, 50.0, 40.0, 40.0));

    let record = compute_relative_position(
        &as_ref(&target),
        character.as_ref(),
        AnchorId::Tc,
        Point::new(5.0, -10.0),
    );

    assert!(approx_eq(record.raw_offset.x, 5.0));
    assert!(approx_eq(record.raw_offset.y, -40.0));
}

#[test]
fn ratio_offset_normalizes_by_rendered_basis() {
    let target = FakeElement::plain(Rect::new(0.0, 0.0, 200.0, 100.0));
    let character = FakeElement::plain(Rect::new(30.0, 15.0, 40.0, 50.0));

    // MC anchor point (100, 50); character center (50, 40); raw (-50, -10).
    let record = compute_relative_position(
        &as_ref(&target),
        character.as_ref(),
        AnchorId::Mc,
        Point::ZERO,
    );

    assert!(approx_eq(record.ratio_offset.x, -0.25));
    assert!(approx_eq(record.ratio_offset.y, -0.1));
}

#[test]
fn image_target_ratio_uses_scaled_natural_basis() {
    // Image rendered at half its natural size: basis equals the rendered rect.
    let target = FakeElement::image(Rect::new(0.0, 0.0, 400.0, 300.0), Size::new(800.0, 600.0));
    let character = FakeElement::plain(Rect::new(80.0, 130.0, 40.0, 40.0));

    let record = compute_relative_position(
        &as_ref(&target),
        character.as_ref(),
        AnchorId::Tl,
        Point::ZERO,
    );

    // Character center (100, 150) from TL (0, 0).
    assert!(approx_eq(record.raw_offset.x, 100.0));
    assert!(approx_eq(record.raw_offset.y, 150.0));
    assert!(approx_eq(record.ratio_offset.x, 0.25));
    assert!(approx_eq(record.ratio_offset.y, 0.5));
    assert_eq!(record.image_scale_at_creation.scale_x, 0.5);
}

#[test]
fn recommended_scale_tracks_target_total_scale() {
    let target = FakeElement::image(Rect::new(0.0, 0.0, 400.0, 300.0), Size::new(800.0, 600.0));
    let character = FakeElement::plain(Rect::new(0.0, 0.0, 40.0, 40.0));

    let record = compute_relative_position(
        &as_ref(&target),
        character.as_ref(),
        AnchorId::Mc,
        Point::ZERO,
    );

    assert_eq!(record.recommended_scale, 0.5);
}

#[test]
fn degenerate_basis_yields_zero_ratio_not_nan() {
    // Never reachable through validation, but a raw call must stay finite.
    let target = FakeElement::plain(Rect::new(0.0, 0.0, 0.0, 0.0));
    let character = FakeElement::plain(Rect::new(10.0, 10.0, 40.0, 40.0));

    let record = compute_relative_position(
        &as_ref(&target),
        character.as_ref(),
        AnchorId::Mc,
        Point::ZERO,
    );

    assert_eq!(record.ratio_offset, Point::ZERO);
    assert!(record.raw_offset.x.is_finite());
    assert!(record.raw_offset.y.is_finite());
}

#[test]
fn record_keeps_full_precision() {
    // 1/3 must survive unrounded; display rounding happens only in snapshots.
    let target = FakeElement::plain(Rect::new(0.0, 0.0, 300.0, 300.0));
    let character = FakeElement::plain(Rect::new(80.0, 130.0, 40.0, 40.0));

    let record = compute_relative_position(
        &as_ref(&target),
        character.as_ref(),
        AnchorId::Tl,
        Point::ZERO,
    );

    assert_eq!(record.ratio_offset.x, 100.0 / 300.0);
}

#[test]
fn record_debug_omits_element_handle() {
    let target = FakeElement::plain(Rect::new(0.0, 0.0, 100.0, 100.0));
    let character = FakeElement::plain(Rect::new(0.0, 0.0, 40.0, 40.0));
    let record = compute_relative_position(
        &as_ref(&target),
        character.as_ref(),
        AnchorId::Mc,
        Point::ZERO,
    );
    let formatted = format!("{record:?}");
    assert!(formatted.contains("RelativePositionRecord"));
    assert!(formatted.contains("anchor"));
}
