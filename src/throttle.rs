//! Update gating: duplicate suppression and burst collapsing for observer
//! notifications.

#[cfg(test)]
#[path = "throttle_test.rs"]
mod throttle_test;

use crate::consts::DUPLICATE_EPSILON_PX;
use crate::element::ChangeKind;
use crate::geom::Rect;

/// Per-pin gate deciding when an observed rect is worth reprojecting.
///
/// The first notification in a window applies immediately; later ones are
/// held as pending and collapse to a single trailing application (newest rect
/// wins) once the window elapses. Rects within the duplicate epsilon of the
/// last applied rect are dropped outright.
#[derive(Debug, Clone)]
pub struct UpdateGate {
    window_ms: f64,
    epsilon_px: f64,
    last_applied_ms: Option<f64>,
    last_rect: Option<Rect>,
    pending: Option<(Rect, ChangeKind)>,
}

impl UpdateGate {
    /// Gate with the standard duplicate epsilon.
    #[must_use]
    pub fn new(window_ms: f64) -> Self {
        Self::with_epsilon(window_ms, DUPLICATE_EPSILON_PX)
    }

    /// Gate with an explicit duplicate epsilon.
    #[must_use]
    pub fn with_epsilon(window_ms: f64, epsilon_px: f64) -> Self {
        Self { window_ms, epsilon_px, last_applied_ms: None, last_rect: None, pending: None }
    }

    /// Offer a fresh notification. Returns the rect to apply now, or `None`
    /// when it was a duplicate or is being held for the trailing flush.
    pub fn offer(&mut self, now_ms: f64, rect: Rect, kind: ChangeKind) -> Option<(Rect, ChangeKind)> {
        if self.is_duplicate(rect) {
            return None;
        }
        match self.last_applied_ms {
            Some(applied) if now_ms - applied < self.window_ms => {
                self.pending = Some((rect, kind));
                None
            }
            _ => {
                self.mark_applied(now_ms, rect);
                Some((rect, kind))
            }
        }
    }

    /// Take the trailing pending rect once its window has elapsed.
    pub fn take_due(&mut self, now_ms: f64) -> Option<(Rect, ChangeKind)> {
        let elapsed = match self.last_applied_ms {
            Some(applied) => now_ms - applied >= self.window_ms,
            None => true,
        };
        if !elapsed {
            return None;
        }
        let (rect, kind) = self.pending.take()?;
        // The pending rect may have converged back onto the applied one.
        if self.is_duplicate(rect) {
            return None;
        }
        self.mark_applied(now_ms, rect);
        Some((rect, kind))
    }

    /// Whether a trailing rect is waiting for [`take_due`](Self::take_due).
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn is_duplicate(&self, rect: Rect) -> bool {
        let Some(last) = self.last_rect else {
            return false;
        };
        (rect.left - last.left).abs() < self.epsilon_px
            && (rect.top - last.top).abs() < self.epsilon_px
            && (rect.width - last.width).abs() < self.epsilon_px
            && (rect.height - last.height).abs() < self.epsilon_px
    }

    fn mark_applied(&mut self, now_ms: f64, rect: Rect) {
        self.last_applied_ms = Some(now_ms);
        self.last_rect = Some(rect);
    }
}
