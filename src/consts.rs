//! Shared numeric constants for the canvas crate.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest zoom factor the content layer may be scaled to.
pub const ZOOM_MIN: f64 = 0.35;

/// Largest zoom factor the content layer may be scaled to.
pub const ZOOM_MAX: f64 = 3.5;

/// Multiplier applied per wheel notch when scrolling up.
pub const ZOOM_IN_FACTOR: f64 = 1.12;

/// Multiplier applied per wheel notch when scrolling down.
pub const ZOOM_OUT_FACTOR: f64 = 0.88;

// ── Items ───────────────────────────────────────────────────────

/// Resize floor for item width, in content pixels.
pub const MIN_ITEM_WIDTH: f64 = 40.0;

/// Resize floor for item height, in content pixels.
pub const MIN_ITEM_HEIGHT: f64 = 30.0;

/// Offset applied to both axes when duplicating an item.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Side of the square resize handle in the bottom-right corner of every card.
pub const RESIZE_HANDLE_SIZE: f64 = 14.0;

/// Frame-relative points where toolbar-created cards land, one per kind.
pub const IMAGE_SCREEN_INSET: (f64, f64) = (40.0, 40.0);
pub const TEXT_SCREEN_INSET: (f64, f64) = (60.0, 60.0);
pub const MUSIC_SCREEN_INSET: (f64, f64) = (80.0, 80.0);
pub const FILM_SCREEN_INSET: (f64, f64) = (80.0, 160.0);

/// Body of a text card created without text.
pub const TEXT_PLACEHOLDER: &str = "Escreva aqui...";

/// Two taps on the same item closer than this count as a double tap.
pub const DOUBLE_TAP_MS: f64 = 300.0;

// ── Export ──────────────────────────────────────────────────────

/// Name of the downloaded export.
pub const EXPORT_FILE_NAME: &str = "tela-livre.png";

/// Delay between neutralizing the layer transform and capturing.
pub const EXPORT_SETTLE_MS: u32 = 60;
