//! Browser boundary: `web-sys`-backed element handles and wall clock.
//!
//! Everything above this module is host-agnostic and runs natively; this
//! adapter is the one place the crate touches the DOM. Hosts wrap the
//! elements they care about in [`DomElement`] and hand them to the registry
//! as [`ElementRef`](crate::element::ElementRef)s.

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlImageElement};

use crate::clock::Clock;
use crate::element::ElementHandle;
use crate::geom::{Matrix2d, Rect, Size};
use crate::reproject::Placement;

/// Wall clock backed by `Date.now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// [`ElementHandle`] over a live DOM element.
pub struct DomElement {
    inner: Element,
}

impl DomElement {
    #[must_use]
    pub fn new(inner: Element) -> Self {
        Self { inner }
    }
}

impl ElementHandle for DomElement {
    fn rect(&self) -> Rect {
        let r = self.inner.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.width(), r.height())
    }

    fn computed_transform(&self) -> Option<Matrix2d> {
        let value = computed_property(&self.inner, "transform");
        parse_css_matrix(&value)
    }

    fn is_image(&self) -> bool {
        self.inner.dyn_ref::<HtmlImageElement>().is_some()
    }

    fn natural_size(&self) -> Size {
        match self.inner.dyn_ref::<HtmlImageElement>() {
            Some(image) => {
                Size::new(f64::from(image.natural_width()), f64::from(image.natural_height()))
            }
            None => self.rect().size(),
        }
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn element_id(&self) -> String {
        self.inner.id()
    }

    fn set_placement(&self, placement: &Placement) {
        let Some(element) = self.inner.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = element.style();
        // Absolutely positioned characters take left/top so the transform
        // stays a pure scale; everything else moves via the transform.
        if matches!(computed_property(&self.inner, "position").as_str(), "absolute" | "fixed") {
            // Writing string properties to an owned style declaration is
            // infallible.
            style
                .set_property("left", &format!("{:.2}px", placement.left))
                .unwrap_or_default();
            style
                .set_property("top", &format!("{:.2}px", placement.top))
                .unwrap_or_default();
            style
                .set_property("transform", &format!("scale({:.3})", placement.scale))
                .unwrap_or_default();
        } else {
            style
                .set_property(
                    "transform",
                    &format!(
                        "translate({:.2}px, {:.2}px) scale({:.3})",
                        placement.left, placement.top, placement.scale
                    ),
                )
                .unwrap_or_default();
        }
    }
}

fn computed_property(element: &Element, name: &str) -> String {
    let Some(window) = web_sys::window() else {
        return String::new();
    };
    let Some(style) = window.get_computed_style(element).unwrap_or(None) else {
        return String::new();
    };
    style.get_property_value(name).unwrap_or_default()
}

/// Parse a computed-style CSS `matrix(a, b, c, d, e, f)` string.
///
/// Returns `None` for `"none"`, `matrix3d(…)`, or anything malformed;
/// callers treat that as identity.
#[must_use]
pub fn parse_css_matrix(value: &str) -> Option<Matrix2d> {
    let body = value.trim().strip_prefix("matrix(")?.strip_suffix(')')?;
    let components: Vec<f64> = body
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .unwrap_or_default();
    if components.len() != 6 {
        return None;
    }
    Some(Matrix2d {
        a: components[0],
        b: components[1],
        c: components[2],
        d: components[3],
        e: components[4],
        f: components[5],
    })
}
