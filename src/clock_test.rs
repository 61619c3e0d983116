#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

#[test]
fn manual_clock_starts_at_zero() {
    let clock = ManualClock::new();
    assert_eq!(clock.now_ms(), 0.0);
}

#[test]
fn manual_clock_at_starting_time() {
    let clock = ManualClock::at(1_000.0);
    assert_eq!(clock.now_ms(), 1_000.0);
}

#[test]
fn manual_clock_set_jumps() {
    let clock = ManualClock::new();
    clock.set(250.0);
    assert_eq!(clock.now_ms(), 250.0);
}

#[test]
fn manual_clock_advance_accumulates() {
    let clock = ManualClock::at(100.0);
    clock.advance(16.0);
    clock.advance(16.0);
    assert_eq!(clock.now_ms(), 132.0);
}

#[test]
fn manual_clock_through_trait_object() {
    let clock: &dyn Clock = &ManualClock::at(42.0);
    assert_eq!(clock.now_ms(), 42.0);
}
