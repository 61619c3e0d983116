#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::geom::{Matrix2d, Rect};
use crate::reproject::Placement;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Minimal element fake: fixed rect, optional intrinsic size and transform.
struct FakeElement {
    rect: Rect,
    natural: Option<Size>,
    transform: Option<Matrix2d>,
}

impl FakeElement {
    fn plain(rect: Rect) -> Self {
        Self { rect, natural: None, transform: None }
    }

    fn image(rect: Rect, natural: Size) -> Self {
        Self { rect, natural: Some(natural), transform: None }
    }
}

impl ElementHandle for FakeElement {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn computed_transform(&self) -> Option<Matrix2d> {
        self.transform
    }

    fn is_image(&self) -> bool {
        self.natural.is_some()
    }

    fn natural_size(&self) -> Size {
        self.natural.unwrap_or_else(|| self.rect.size())
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn element_id(&self) -> String {
        String::new()
    }

    fn set_placement(&self, _placement: &Placement) {}
}

// --- Non-image elements ---

#[test]
fn plain_element_is_identity_scale() {
    let el = FakeElement::plain(Rect::new(0.0, 0.0, 300.0, 200.0));
    let info = resolve_scale(&el);
    assert!(!info.is_image);
    assert_eq!(info.natural_width, 300.0);
    assert_eq!(info.natural_height, 200.0);
    assert_eq!(info.scale_x, 1.0);
    assert_eq!(info.scale_y, 1.0);
    assert_eq!(info.total_scale, 1.0);
}

#[test]
fn plain_element_picks_up_transform_scale() {
    let mut el = FakeElement::plain(Rect::new(0.0, 0.0, 300.0, 200.0));
    el.transform = Some(Matrix2d { a: 2.0, b: 0.0, c: 0.0, d: 0.5, e: 0.0, f: 0.0 });
    let info = resolve_scale(&el);
    assert_eq!(info.scale_x, 2.0);
    assert_eq!(info.scale_y, 0.5);
    assert!(approx_eq(info.total_scale, 1.0));
}

#[test]
fn plain_element_negative_transform_uses_magnitude() {
    let mut el = FakeElement::plain(Rect::new(0.0, 0.0, 100.0, 100.0));
    el.transform = Some(Matrix2d { a: -1.5, b: 0.0, c: 0.0, d: 1.5, e: 0.0, f: 0.0 });
    let info = resolve_scale(&el);
    assert_eq!(info.scale_x, 1.5);
    assert_eq!(info.scale_y, 1.5);
}

// --- Image elements ---

#[test]
fn image_at_natural_size_is_identity() {
    let el = FakeElement::image(Rect::new(10.0, 10.0, 800.0, 600.0), Size::new(800.0, 600.0));
    let info = resolve_scale(&el);
    assert!(info.is_image);
    assert_eq!(info.scale_x, 1.0);
    assert_eq!(info.scale_y, 1.0);
    assert_eq!(info.total_scale, 1.0);
}

#[test]
fn image_css_resized_reports_rendered_over_natural() {
    let el = FakeElement::image(Rect::new(0.0, 0.0, 400.0, 300.0), Size::new(800.0, 600.0));
    let info = resolve_scale(&el);
    assert_eq!(info.scale_x, 0.5);
    assert_eq!(info.scale_y, 0.5);
    assert_eq!(info.total_scale, 0.5);
}

#[test]
fn image_transform_scaled_rect_reports_full_scale() {
    // A 2× transform doubles the bounding rect; the rendered/natural ratio
    // captures it without consulting the matrix.
    let mut el = FakeElement::image(Rect::new(0.0, 0.0, 1600.0, 1200.0), Size::new(800.0, 600.0));
    el.transform = Some(Matrix2d { a: 2.0, b: 0.0, c: 0.0, d: 2.0, e: 0.0, f: 0.0 });
    let info = resolve_scale(&el);
    assert_eq!(info.scale_x, 2.0);
    assert_eq!(info.scale_y, 2.0);
    assert_eq!(info.total_scale, 2.0);
}

#[test]
fn image_anisotropic_scale_total_is_geometric_mean() {
    let el = FakeElement::image(Rect::new(0.0, 0.0, 1600.0, 300.0), Size::new(800.0, 600.0));
    let info = resolve_scale(&el);
    assert_eq!(info.scale_x, 2.0);
    assert_eq!(info.scale_y, 0.5);
    assert!(approx_eq(info.total_scale, 1.0));
}

#[test]
fn unloaded_image_falls_back_to_rendered_rect() {
    let el = FakeElement::image(Rect::new(0.0, 0.0, 120.0, 90.0), Size::new(0.0, 0.0));
    let info = resolve_scale(&el);
    assert!(info.is_image);
    assert_eq!(info.natural_width, 120.0);
    assert_eq!(info.natural_height, 90.0);
    assert_eq!(info.scale_x, 1.0);
    assert_eq!(info.scale_y, 1.0);
    assert_eq!(info.total_scale, 1.0);
}

#[test]
fn unloaded_image_basis_never_zero_for_visible_rect() {
    let el = FakeElement::image(Rect::new(0.0, 0.0, 120.0, 90.0), Size::new(0.0, 0.0));
    let basis = resolve_scale(&el).basis();
    assert_eq!(basis.width, 120.0);
    assert_eq!(basis.height, 90.0);
}

// --- Basis ---

#[test]
fn basis_is_natural_times_scale() {
    let el = FakeElement::image(Rect::new(0.0, 0.0, 400.0, 300.0), Size::new(800.0, 600.0));
    let basis = resolve_scale(&el).basis();
    assert_eq!(basis.width, 400.0);
    assert_eq!(basis.height, 300.0);
}

#[test]
fn scale_info_serde_round_trip() {
    let el = FakeElement::image(Rect::new(0.0, 0.0, 400.0, 300.0), Size::new(800.0, 600.0));
    let info = resolve_scale(&el);
    let json = serde_json::to_string(&info).unwrap();
    let back: ImageScaleInfo = serde_json::from_str(&json).unwrap();
    assert_eq!(info, back);
}
