use uuid::Uuid;

use super::*;

// =============================================================
// GestureState
// =============================================================

#[test]
fn gesture_default_is_idle() {
    assert!(GestureState::default().is_idle());
}

#[test]
fn gesture_names_are_distinct() {
    let id = Uuid::new_v4();
    let states = [
        GestureState::Idle,
        GestureState::Drawing { last_world: Point::default() },
        GestureState::Panning { anchor: Point::default() },
        GestureState::Dragging { id, grab: Point::default() },
        GestureState::Resizing { id, start_world: Point::default(), orig_w: 1.0, orig_h: 1.0 },
    ];
    let mut names: Vec<&str> = states.iter().map(GestureState::name).collect();
    names.dedup();
    assert_eq!(names.len(), states.len());
    assert!(states[1..].iter().all(|s| !s.is_idle()));
}

// =============================================================
// TapTracker
// =============================================================

#[test]
fn two_quick_taps_on_same_item_are_double() {
    let id = Uuid::new_v4();
    let mut taps = TapTracker::default();
    assert!(!taps.register(id, 1000.0));
    assert!(taps.register(id, 1200.0));
}

#[test]
fn slow_taps_are_not_double() {
    let id = Uuid::new_v4();
    let mut taps = TapTracker::default();
    assert!(!taps.register(id, 1000.0));
    assert!(!taps.register(id, 1000.0 + DOUBLE_TAP_MS));
}

#[test]
fn taps_on_different_items_are_not_double() {
    let mut taps = TapTracker::default();
    assert!(!taps.register(Uuid::new_v4(), 0.0));
    assert!(!taps.register(Uuid::new_v4(), 10.0));
}

#[test]
fn third_tap_starts_over() {
    let id = Uuid::new_v4();
    let mut taps = TapTracker::default();
    taps.register(id, 0.0);
    assert!(taps.register(id, 50.0));
    assert!(!taps.register(id, 100.0));
}

#[test]
fn clear_forgets_previous_tap() {
    let id = Uuid::new_v4();
    let mut taps = TapTracker::default();
    taps.register(id, 0.0);
    taps.clear();
    assert!(!taps.register(id, 10.0));
}
