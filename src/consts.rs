//! Shared numeric constants for pin management and reprojection.

// ── Pin limits ──────────────────────────────────────────────────

/// Maximum number of simultaneously active pins.
pub const MAX_PINS: usize = 10;

/// Minimum width/height in pixels for a pinnable target or character.
pub const MIN_ELEMENT_SIZE_PX: f64 = 20.0;

// ── Update cadence ──────────────────────────────────────────────

/// Throttle window for observer bursts — one 60 fps frame.
pub const THROTTLE_WINDOW_MS: f64 = 16.0;

/// Rect changes below this per-component delta are duplicates.
pub const DUPLICATE_EPSILON_PX: f64 = 0.05;

// ── Reprojection ────────────────────────────────────────────────

/// Non-image targets switch from pixel to ratio reprojection past this
/// relative width change.
pub const SIZE_SWITCH_RATIO: f64 = 0.1;

// ── Anchor recommendation ───────────────────────────────────────

/// Normalized coordinate below this falls in the left/top zone.
pub const ZONE_LOW: f64 = 0.33;

/// Normalized coordinate above this falls in the right/bottom zone.
pub const ZONE_HIGH: f64 = 0.67;

// ── Display ─────────────────────────────────────────────────────

/// Fractional digits kept in snapshot offsets.
pub const DISPLAY_PRECISION: i32 = 4;
