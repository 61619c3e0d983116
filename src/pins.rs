//! Pin lifecycle: validation, observer subscription, and reprojection
//! fan-out.
//!
//! A pin binds one character element to an anchor on a target element. The
//! registry owns every active pin, keyed by character id: creation validates
//! the request, snapshots the relative position, subscribes the target to the
//! external geometry observer, and positions the character immediately.
//! Observer notifications flow through a per-pin [`UpdateGate`] so bursts
//! collapse to one reprojection per throttle window; the host pumps
//! [`PinRegistry::flush`] once per frame to apply trailing updates and sweep
//! pins whose target left the document.

#[cfg(test)]
#[path = "pins_test.rs"]
mod pins_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::str::FromStr;

use log::{debug, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::anchor::{self, AnchorId, InvalidAnchor, Recommendation};
use crate::clock::Clock;
use crate::consts::{DISPLAY_PRECISION, MAX_PINS, MIN_ELEMENT_SIZE_PX, THROTTLE_WINDOW_MS};
use crate::element::{ChangeKind, ElementRef, GeometryCallback, GeometryObserver};
use crate::geom::{Point, Rect, Size, round_to};
use crate::record::{RelativePositionRecord, compute_relative_position};
use crate::reproject::{ReprojectError, reproject};
use crate::throttle::UpdateGate;

/// Unique identifier for a pin.
pub type PinId = Uuid;

/// Rejected `create_pin` request. Checks run in a fixed order; the first
/// failure wins.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// No target element was supplied.
    #[error("no target element supplied")]
    MissingTarget,
    /// No character element was supplied.
    #[error("no character element supplied")]
    MissingCharacter,
    /// The anchor code did not parse.
    #[error(transparent)]
    InvalidAnchor(#[from] InvalidAnchor),
    /// Target or character is smaller than the configured minimum.
    #[error("element {width}×{height} px is below the {min_px} px minimum")]
    ElementTooSmall {
        /// Offending element width.
        width: f64,
        /// Offending element height.
        height: f64,
        /// Configured minimum for both dimensions.
        min_px: f64,
    },
    /// The registry is at its active-pin cap.
    #[error("active pin limit ({0}) reached")]
    PinLimitReached(usize),
}

/// A pin creation request as received from the host boundary.
///
/// Element slots are optional because the boundary is untyped: a selector
/// lookup that found nothing arrives as `None` and is reported as a typed
/// validation error rather than a crash. The anchor arrives as its raw
/// two-letter code for the same reason.
pub struct PinRequest {
    /// Element the character is pinned relative to.
    pub target: Option<ElementRef>,
    /// Character element whose placement the registry manages.
    pub character: Option<ElementRef>,
    /// Anchor code, e.g. `"TC"`.
    pub anchor: String,
    /// Extra pixel offset folded into the captured delta.
    pub offset: Point,
}

/// Registry tunables. `Default` matches the documented limits.
#[derive(Debug, Clone, Copy)]
pub struct PinSettings {
    /// Fractional digits kept in snapshot offsets.
    pub display_precision: i32,
    /// Throttle window for observer bursts, in milliseconds.
    pub throttle_window_ms: f64,
    /// Maximum number of simultaneously active pins.
    pub max_pins: usize,
    /// Minimum width/height for target and character elements, in pixels.
    pub min_element_size_px: f64,
}

impl Default for PinSettings {
    fn default() -> Self {
        Self {
            display_precision: DISPLAY_PRECISION,
            throttle_window_ms: THROTTLE_WINDOW_MS,
            max_pins: MAX_PINS,
            min_element_size_px: MIN_ELEMENT_SIZE_PX,
        }
    }
}

/// Host-facing view of one active pin. Offsets are rounded to the display
/// precision; the internal record keeps full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinSnapshot {
    /// Unique pin id.
    pub id: PinId,
    /// Character the pin belongs to.
    pub character_id: String,
    /// Anchor the offsets are measured from.
    pub anchor: AnchorId,
    /// Pixel delta captured at creation.
    pub raw_offset: Point,
    /// Scale-normalized delta captured at creation.
    pub ratio_offset: Point,
    /// Target rendered size at creation.
    pub target_size_at_creation: Size,
    /// Creation timestamp in clock milliseconds.
    pub created_at_ms: f64,
    /// Timestamp of the most recent applied reprojection.
    pub last_update_ms: f64,
}

/// Aggregate statistics over the active pins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinStats {
    /// Number of active pins.
    pub total_pins: usize,
    /// Configured cap.
    pub max_pins: usize,
    /// Active pin count per anchor.
    pub anchor_distribution: HashMap<AnchorId, usize>,
    /// Mean pin age in milliseconds; zero with no pins.
    pub average_age_ms: f64,
    /// Character id of the longest-lived pin.
    pub oldest_character_id: Option<String>,
    /// Character id of the most recently created pin.
    pub newest_character_id: Option<String>,
}

/// Outcome of a [`PinRegistry::flush`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Pins whose trailing pending rect was applied.
    pub applied: usize,
    /// Character ids whose pins were dropped because the target detached.
    pub dropped: Vec<String>,
}

/// State shared between the registry and a pin's observer callback.
struct PinShared {
    record: RelativePositionRecord,
    gate: UpdateGate,
    last_update_ms: f64,
    detached: bool,
}

/// An active pin. Owned exclusively by the registry.
struct Pin {
    id: PinId,
    character_id: String,
    character: ElementRef,
    shared: Rc<RefCell<PinShared>>,
    unsubscribe: Option<Box<dyn FnOnce()>>,
    created_at_ms: f64,
}

/// Owns the set of active pins, one per character id.
///
/// The observer, clock, and (through element handles) geometry probe are
/// injected; the registry holds no ambient global state.
pub struct PinRegistry {
    observer: Rc<dyn GeometryObserver>,
    clock: Rc<dyn Clock>,
    settings: PinSettings,
    pins: HashMap<String, Pin>,
}

impl PinRegistry {
    /// Registry with default settings.
    #[must_use]
    pub fn new(observer: Rc<dyn GeometryObserver>, clock: Rc<dyn Clock>) -> Self {
        Self::with_settings(observer, clock, PinSettings::default())
    }

    /// Registry with explicit settings.
    #[must_use]
    pub fn with_settings(
        observer: Rc<dyn GeometryObserver>,
        clock: Rc<dyn Clock>,
        settings: PinSettings,
    ) -> Self {
        Self { observer, clock, settings, pins: HashMap::new() }
    }

    /// Create a pin, replacing any existing pin for the same character.
    ///
    /// Validation order: target present → character present → anchor parses →
    /// element sizes → pin cap. Replacement destroys the old pin (its
    /// unsubscribe runs first) and does not count against the cap. On success
    /// the character is positioned immediately.
    ///
    /// # Errors
    ///
    /// The first failing check, as a [`ValidationError`].
    pub fn create_pin(&mut self, request: PinRequest) -> Result<PinId, ValidationError> {
        let target = request.target.ok_or(ValidationError::MissingTarget)?;
        let character = request.character.ok_or(ValidationError::MissingCharacter)?;
        let anchor = AnchorId::from_str(&request.anchor)?;

        let min_px = self.settings.min_element_size_px;
        check_size(target.rect(), min_px)?;
        check_size(character.rect(), min_px)?;

        let character_id = character.element_id();
        let replacing = self.pins.contains_key(&character_id);
        if !replacing && self.pins.len() >= self.settings.max_pins {
            return Err(ValidationError::PinLimitReached(self.settings.max_pins));
        }
        if replacing {
            self.destroy_pin(&character_id);
        }

        let now = self.clock.now_ms();
        let record = compute_relative_position(&target, character.as_ref(), anchor, request.offset);
        let shared = Rc::new(RefCell::new(PinShared {
            record,
            gate: UpdateGate::new(self.settings.throttle_window_ms),
            last_update_ms: now,
            detached: false,
        }));

        let callback = make_callback(
            Rc::clone(&shared),
            Rc::clone(&character),
            Rc::clone(&self.clock),
        );
        let unsubscribe = self.observer.observe(&target, callback);

        let id = Uuid::new_v4();
        self.pins.insert(
            character_id.clone(),
            Pin {
                id,
                character_id: character_id.clone(),
                character: Rc::clone(&character),
                shared: Rc::clone(&shared),
                unsubscribe: Some(unsubscribe),
                created_at_ms: now,
            },
        );

        // Position the character now instead of waiting for the first
        // observer notification.
        gated_update(&shared, &character, target.rect(), ChangeKind::Initial, now);

        debug!("pin {id} created for character {character_id:?} at anchor {anchor}");
        Ok(id)
    }

    /// Tear down the pin for `character_id`, unsubscribing from the observer
    /// before the pin is discarded. Returns `false` when none existed.
    pub fn destroy_pin(&mut self, character_id: &str) -> bool {
        let Some(mut pin) = self.pins.remove(character_id) else {
            return false;
        };
        if let Some(unsubscribe) = pin.unsubscribe.take() {
            unsubscribe();
        }
        debug!("pin {} destroyed for character {character_id:?}", pin.id);
        true
    }

    /// Tear down every pin. Returns the number removed.
    pub fn destroy_all(&mut self) -> usize {
        let ids: Vec<String> = self.pins.keys().cloned().collect();
        let mut removed = 0;
        for id in ids {
            if self.destroy_pin(&id) {
                removed += 1;
            }
        }
        removed
    }

    /// Apply trailing throttled updates and sweep detached pins.
    ///
    /// Hosts call this once per animation frame — the moment a trailing
    /// throttle timer would otherwise fire. Dropped character ids are
    /// reported exactly once, here.
    pub fn flush(&mut self) -> FlushReport {
        let now = self.clock.now_ms();
        let mut report = FlushReport::default();
        let mut dead: Vec<String> = Vec::new();

        for (character_id, pin) in &self.pins {
            let mut state = pin.shared.borrow_mut();
            if state.detached {
                dead.push(character_id.clone());
                continue;
            }
            if let Some((rect, kind)) = state.gate.take_due(now) {
                if apply_reprojection(&mut state, &pin.character, rect, kind, now) {
                    report.applied += 1;
                } else {
                    dead.push(character_id.clone());
                }
            }
        }

        for character_id in dead {
            if self.destroy_pin(&character_id) {
                report.dropped.push(character_id);
            }
        }
        report
    }

    /// Snapshot of one active pin, if present.
    #[must_use]
    pub fn pin_state(&self, character_id: &str) -> Option<PinSnapshot> {
        self.pins.get(character_id).map(|pin| self.snapshot_of(pin))
    }

    /// Snapshots of all active pins, oldest first.
    #[must_use]
    pub fn snapshots(&self) -> Vec<PinSnapshot> {
        let mut all: Vec<PinSnapshot> = self.pins.values().map(|pin| self.snapshot_of(pin)).collect();
        all.sort_by(|a, b| {
            a.created_at_ms
                .total_cmp(&b.created_at_ms)
                .then_with(|| a.character_id.cmp(&b.character_id))
        });
        all
    }

    /// Aggregate statistics over the active pins.
    #[must_use]
    pub fn stats(&self) -> PinStats {
        let now = self.clock.now_ms();
        let mut distribution: HashMap<AnchorId, usize> = HashMap::new();
        let mut total_age = 0.0;
        let mut oldest: Option<(f64, &str)> = None;
        let mut newest: Option<(f64, &str)> = None;

        for pin in self.pins.values() {
            let anchor = pin.shared.borrow().record.anchor;
            *distribution.entry(anchor).or_insert(0) += 1;
            total_age += now - pin.created_at_ms;

            let entry = (pin.created_at_ms, pin.character_id.as_str());
            if oldest.is_none_or(|(t, id)| (entry.0, entry.1) < (t, id)) {
                oldest = Some(entry);
            }
            if newest.is_none_or(|(t, id)| (entry.0, entry.1) > (t, id)) {
                newest = Some(entry);
            }
        }

        let total_pins = self.pins.len();
        #[allow(clippy::cast_precision_loss)]
        let average_age_ms = if total_pins == 0 { 0.0 } else { total_age / total_pins as f64 };
        PinStats {
            total_pins,
            max_pins: self.settings.max_pins,
            anchor_distribution: distribution,
            average_age_ms,
            oldest_character_id: oldest.map(|(_, id)| id.to_string()),
            newest_character_id: newest.map(|(_, id)| id.to_string()),
        }
    }

    /// Suggest an anchor for pinning `character` to `target`.
    ///
    /// # Errors
    ///
    /// Missing elements are reported the same way
    /// [`create_pin`](Self::create_pin) reports them.
    pub fn recommend_anchor(
        &self,
        target: Option<&ElementRef>,
        character: Option<&ElementRef>,
    ) -> Result<Recommendation, ValidationError> {
        let target = target.ok_or(ValidationError::MissingTarget)?;
        let character = character.ok_or(ValidationError::MissingCharacter)?;
        Ok(anchor::recommend(target.rect(), character.rect()))
    }

    /// Number of active pins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Whether the registry has no active pins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// The registry's settings.
    #[must_use]
    pub fn settings(&self) -> PinSettings {
        self.settings
    }

    fn snapshot_of(&self, pin: &Pin) -> PinSnapshot {
        let state = pin.shared.borrow();
        let digits = self.settings.display_precision;
        PinSnapshot {
            id: pin.id,
            character_id: pin.character_id.clone(),
            anchor: state.record.anchor,
            raw_offset: Point::new(
                round_to(state.record.raw_offset.x, digits),
                round_to(state.record.raw_offset.y, digits),
            ),
            ratio_offset: Point::new(
                round_to(state.record.ratio_offset.x, digits),
                round_to(state.record.ratio_offset.y, digits),
            ),
            target_size_at_creation: state.record.target_size_at_creation,
            created_at_ms: pin.created_at_ms,
            last_update_ms: state.last_update_ms,
        }
    }
}

fn check_size(rect: Rect, min_px: f64) -> Result<(), ValidationError> {
    if rect.width < min_px || rect.height < min_px {
        return Err(ValidationError::ElementTooSmall {
            width: rect.width,
            height: rect.height,
            min_px,
        });
    }
    Ok(())
}

/// Observer callback for one pin: gate the notification, reproject, write the
/// placement. Only the per-pin shared cell is touched, never the registry
/// map, so callbacks can fire while the registry is borrowed elsewhere.
fn make_callback(
    shared: Rc<RefCell<PinShared>>,
    character: ElementRef,
    clock: Rc<dyn Clock>,
) -> GeometryCallback {
    Box::new(move |rect, kind| {
        let now = clock.now_ms();
        gated_update(&shared, &character, rect, kind, now);
    })
}

fn gated_update(
    shared: &Rc<RefCell<PinShared>>,
    character: &ElementRef,
    rect: Rect,
    kind: ChangeKind,
    now_ms: f64,
) {
    let mut state = shared.borrow_mut();
    if state.detached {
        return;
    }
    let Some((rect, kind)) = state.gate.offer(now_ms, rect, kind) else {
        return;
    };
    apply_reprojection(&mut state, character, rect, kind, now_ms);
}

/// Reproject one pin against `rect` and write the placement. Returns `false`
/// when the target turned out to be detached; the pin is marked dead and the
/// next flush sweeps it.
fn apply_reprojection(
    state: &mut PinShared,
    character: &ElementRef,
    rect: Rect,
    kind: ChangeKind,
    now_ms: f64,
) -> bool {
    match reproject(&state.record, rect, character.rect().size()) {
        Ok(placement) => {
            character.set_placement(&placement);
            state.last_update_ms = now_ms;
            true
        }
        Err(ReprojectError::TargetDetached) => {
            state.detached = true;
            warn!("pin target detached during {kind:?} update; pin will be dropped");
            false
        }
    }
}
