//! Anchor-relative pinning of character elements to page geometry.
//!
//! This crate is the positioning core of a browser-based character editor: it
//! captures where a character sits relative to a chosen anchor on a target
//! element (typically a responsive hero image), then keeps the character
//! locked to that spot as the target resizes, scrolls, or changes scale. It
//! compiles to WebAssembly for browser hosts and natively for tests. The host
//! layer is responsible only for wrapping elements in
//! [`dom::DomElement`], wiring real DOM observation to the
//! [`element::GeometryObserver`] seam, and pumping
//! [`pins::PinRegistry::flush`] once per frame.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`pins`] | Pin lifecycle registry and host-facing API |
//! | [`record`] | Relative-position capture at pin creation |
//! | [`reproject`] | Placement recomputation on geometry change |
//! | [`scale`] | Image scale resolution |
//! | [`anchor`] | Anchor table, parsing, and recommendation |
//! | [`throttle`] | Update gating for observer bursts |
//! | [`element`] | Collaborator traits (element handles, observer) |
//! | [`geom`] | Shared geometry value types |
//! | [`clock`] | Injected time source |
//! | [`dom`] | Browser adapter (`web-sys`) |
//! | [`consts`] | Shared numeric constants |

pub mod anchor;
pub mod clock;
pub mod consts;
pub mod dom;
pub mod element;
pub mod geom;
pub mod pins;
pub mod record;
pub mod reproject;
pub mod scale;
pub mod throttle;
