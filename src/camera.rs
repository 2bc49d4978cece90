#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::{ZOOM_IN_FACTOR, ZOOM_MAX, ZOOM_MIN, ZOOM_OUT_FACTOR};

/// A point in either client or content space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Map a client-space point into content space.
///
/// `layer_origin` is the top-left corner of the content layer's bounding rect
/// as the browser reports it, i.e. already translated by the pan offset.
#[must_use]
pub fn map_client_point(client: Point, layer_origin: Point, zoom: f64) -> Point {
    Point {
        x: (client.x - layer_origin.x) / zoom,
        y: (client.y - layer_origin.y) / zoom,
    }
}

/// Pan/zoom state of the content layer.
///
/// `pan_x` / `pan_y` are the CSS-pixel translation of the layer inside its frame.
/// `zoom` is a scale factor (1.0 = no zoom), always within [`ZOOM_MIN`, `ZOOM_MAX`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Client-space position of the layer's top-left corner for a frame at `frame_origin`.
    #[must_use]
    pub fn layer_origin(&self, frame_origin: Point) -> Point {
        Point {
            x: frame_origin.x + self.pan_x,
            y: frame_origin.y + self.pan_y,
        }
    }

    /// Convert a client-space point to content coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point, frame_origin: Point) -> Point {
        map_client_point(screen, self.layer_origin(frame_origin), self.zoom)
    }

    /// Convert a content-space point to client coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point, frame_origin: Point) -> Point {
        let origin = self.layer_origin(frame_origin);
        Point {
            x: world.x * self.zoom + origin.x,
            y: world.y * self.zoom + origin.y,
        }
    }

    /// Convert a client-space distance (pixels) to a content-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Apply one wheel step centred on `cursor`.
    ///
    /// Negative `delta_y` zooms in, positive zooms out, zero is ignored. The
    /// content point under the cursor keeps its client position. Returns
    /// `false` when nothing changed (zero delta or already at a limit).
    pub fn zoom_at(&mut self, delta_y: f64, cursor: Point, frame_origin: Point) -> bool {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return false;
        }
        let factor = if delta_y < 0.0 { ZOOM_IN_FACTOR } else { ZOOM_OUT_FACTOR };
        let next = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        if (next - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        // Cursor relative to the layer's translated origin, in client pixels.
        let rel_x = cursor.x - frame_origin.x - self.pan_x;
        let rel_y = cursor.y - frame_origin.y - self.pan_y;
        let ratio = next / self.zoom - 1.0;

        self.pan_x -= rel_x * ratio;
        self.pan_y -= rel_y * ratio;
        self.zoom = next;
        true
    }

    /// The single combined CSS transform for the content layer.
    ///
    /// Assumes `transform-origin: 0 0` on the layer.
    #[must_use]
    pub fn css_transform(&self) -> String {
        format!("translate({}px, {}px) scale({})", self.pan_x, self.pan_y, self.zoom)
    }

    /// Zoom as a whole percentage for the toolbar readout, e.g. `"112%"`.
    #[must_use]
    pub fn zoom_percent(&self) -> String {
        format!("{}%", (self.zoom * 100.0).round())
    }
}
