//! Raster surface: the persistent bitmap strokes are committed to.
//!
//! Drawing is immediate-mode. A segment is painted once and never recorded,
//! so the only way to remove it is to paint over it; the eraser does exactly
//! that with the background color.
//!
//! [`CanvasSurface`] is the only place in the crate that touches
//! [`web_sys::CanvasRenderingContext2d`]. [`PixelSurface`] is an in-memory
//! RGBA equivalent for headless hosts and tests.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::Point;
use crate::tools::Color;

/// One committed line segment, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSegment {
    pub from: Point,
    pub to: Point,
    pub color: Color,
    pub width: f64,
}

/// Something strokes can be painted on.
pub trait Surface {
    /// Fill color of the unpainted surface.
    fn background(&self) -> Color;

    /// A gesture started painting at `start`.
    fn begin_stroke(&mut self, start: Point);

    /// Paint one segment with round caps.
    fn draw_segment(&mut self, segment: &StrokeSegment);

    /// The gesture that was painting ended.
    fn end_stroke(&mut self);
}

// =============================================================
// Canvas2D
// =============================================================

/// Surface backed by an `HTMLCanvasElement` inside the content layer.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    background: Color,
}

impl CanvasSurface {
    /// Size the canvas backing store, obtain its 2D context and fill it with `background`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element has no 2D context.
    pub fn new(canvas: &HtmlCanvasElement, background: Color, width: u32, height: u32) -> Result<Self, JsValue> {
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        ctx.set_fill_style_str(&background.to_hex());
        ctx.fill_rect(0.0, 0.0, f64::from(width), f64::from(height));
        ctx.set_line_cap("round");
        ctx.set_line_join("round");

        Ok(Self { ctx, background })
    }
}

impl Surface for CanvasSurface {
    fn background(&self) -> Color {
        self.background
    }

    fn begin_stroke(&mut self, start: Point) {
        self.ctx.begin_path();
        self.ctx.move_to(start.x, start.y);
    }

    fn draw_segment(&mut self, segment: &StrokeSegment) {
        // Each segment gets its own path so a mid-gesture tool switch only
        // recolors what comes after it.
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(&segment.color.to_hex());
        self.ctx.set_line_width(segment.width);
        self.ctx.move_to(segment.from.x, segment.from.y);
        self.ctx.line_to(segment.to.x, segment.to.y);
        self.ctx.stroke();
    }

    fn end_stroke(&mut self) {
        self.ctx.close_path();
    }
}

// =============================================================
// In-memory RGBA
// =============================================================

/// Opaque RGBA bitmap with aliased, capsule-shaped segment coverage.
///
/// A pixel is painted when its centre lies within `width / 2` of the segment.
/// Coverage depends only on geometry, so repainting the same path with the
/// same or a wider width fully replaces the earlier color.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    background: Color,
    rgba: Vec<u8>,
    open_stroke: bool,
}

impl PixelSurface {
    #[must_use]
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let len = width as usize * height as usize;
        let mut rgba = Vec::with_capacity(len * 4);
        for _ in 0..len {
            rgba.extend_from_slice(&[background.r, background.g, background.b, 0xff]);
        }
        Self { width, height, background, rgba, open_stroke: false }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Color at `(x, y)`, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Color::rgb(self.rgba[i], self.rgba[i + 1], self.rgba[i + 2]))
    }

    /// Number of pixels that differ from the background.
    #[must_use]
    pub fn painted_pixels(&self) -> usize {
        let bg = [self.background.r, self.background.g, self.background.b];
        self.rgba.chunks_exact(4).filter(|px| px[..3] != bg).count()
    }

    /// Whether a gesture is currently painting.
    #[must_use]
    pub fn stroke_open(&self) -> bool {
        self.open_stroke
    }

    fn put(&mut self, x: usize, y: usize, color: Color) {
        let i = (y * self.width as usize + x) * 4;
        self.rgba[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, 0xff]);
    }
}

impl Surface for PixelSurface {
    fn background(&self) -> Color {
        self.background
    }

    fn begin_stroke(&mut self, _start: Point) {
        self.open_stroke = true;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn draw_segment(&mut self, segment: &StrokeSegment) {
        let radius = segment.width / 2.0;
        if !(radius.is_finite() && radius > 0.0) || self.width == 0 || self.height == 0 {
            return;
        }
        let max_x = f64::from(self.width - 1);
        let max_y = f64::from(self.height - 1);
        let x0 = (segment.from.x.min(segment.to.x) - radius).floor().clamp(0.0, max_x) as usize;
        let x1 = (segment.from.x.max(segment.to.x) + radius).ceil().clamp(0.0, max_x) as usize;
        let y0 = (segment.from.y.min(segment.to.y) - radius).floor().clamp(0.0, max_y) as usize;
        let y1 = (segment.from.y.max(segment.to.y) + radius).ceil().clamp(0.0, max_y) as usize;

        for y in y0..=y1 {
            for x in x0..=x1 {
                #[allow(clippy::cast_precision_loss)]
                let centre = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if distance_to_segment(centre, segment.from, segment.to) <= radius {
                    self.put(x, y, segment.color);
                }
            }
        }
    }

    fn end_stroke(&mut self) {
        self.open_stroke = false;
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0)
    };
    let dx = p.x - (a.x + t * abx);
    let dy = p.y - (a.y + t * aby);
    (dx * dx + dy * dy).sqrt()
}
