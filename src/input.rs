//! Input model: wheel deltas, tap tracking, and the gesture state machine.
//!
//! `GestureState` is the single gesture being tracked between pointer-down
//! and pointer-up. Only one variant can be active, which makes drawing,
//! panning, dragging and resizing mutually exclusive by construction.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::DOUBLE_TAP_MS;
use crate::doc::ItemId;

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Internal state for the gesture state machine.
///
/// Each active variant carries the context needed to compute the next
/// update from a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Painting segments on the raster surface.
    Drawing {
        /// Content-space end of the last committed segment.
        last_world: Point,
    },
    /// Dragging the viewport by its background.
    Panning {
        /// `client - pan` at press time; `pan = client - anchor` while moving.
        anchor: Point,
    },
    /// Moving a card.
    Dragging {
        id: ItemId,
        /// Pointer position relative to the card's origin, in content space.
        grab: Point,
    },
    /// Resizing a card by its bottom-right handle.
    Resizing {
        id: ItemId,
        /// Content-space pointer position at press time.
        start_world: Point,
        orig_w: f64,
        orig_h: f64,
    },
}

impl GestureState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Drawing { .. } => "drawing",
            Self::Panning { .. } => "panning",
            Self::Dragging { .. } => "dragging",
            Self::Resizing { .. } => "resizing",
        }
    }
}

/// Detects two taps on the same card within [`DOUBLE_TAP_MS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TapTracker {
    last: Option<(ItemId, f64)>,
}

impl TapTracker {
    /// Record a tap on `id` at `now_ms`. Returns `true` when it completes a double tap;
    /// the tracker then resets so a third tap starts over.
    pub fn register(&mut self, id: ItemId, now_ms: f64) -> bool {
        if let Some((prev_id, prev_ms)) = self.last {
            if prev_id == id && (now_ms - prev_ms) >= 0.0 && (now_ms - prev_ms) < DOUBLE_TAP_MS {
                self.last = None;
                return true;
            }
        }
        self.last = Some((id, now_ms));
        false
    }

    /// Forget the previous tap (e.g. after a tap on the background).
    pub fn clear(&mut self) {
        self.last = None;
    }
}
