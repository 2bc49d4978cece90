use web_sys::{HtmlCanvasElement, HtmlElement};

use crate::camera::{Camera, Point};
use crate::config::CanvasConfig;
use crate::consts::{MIN_ITEM_HEIGHT, MIN_ITEM_WIDTH};
use crate::doc::{CanvasItem, ItemContent, ItemGeometry, ItemId, ItemStore};
use crate::dom::CardLayer;
use crate::export::ExportGuard;
use crate::hit::{self, Hit, HitPart, Target};
use crate::input::{GestureState, TapTracker, WheelDelta};
use crate::surface::{CanvasSurface, StrokeSegment, Surface};
use crate::tools::{Color, Tool, ToolState};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A painting gesture started at this content point.
    BeginStroke(Point),
    /// Commit one segment to the raster surface.
    DrawSegment(StrokeSegment),
    /// The painting gesture ended.
    EndStroke,
    /// New combined CSS transform for the content layer.
    SetLayerTransform(String),
    /// New text for the zoom readout, e.g. `"112%"`.
    SetZoomLabel(String),
    /// New CSS cursor for the frame.
    SetCursor(&'static str),
    ItemCreated(CanvasItem),
    ItemUpdated { id: ItemId, geometry: ItemGeometry },
    ItemDeleted { id: ItemId },
}

/// Feed the stroke actions in `actions` to `surface`, skipping everything else.
pub fn paint<S: Surface>(surface: &mut S, actions: &[Action]) {
    for action in actions {
        match action {
            Action::BeginStroke(start) => surface.begin_stroke(*start),
            Action::DrawSegment(segment) => surface.draw_segment(segment),
            Action::EndStroke => surface.end_stroke(),
            _ => {}
        }
    }
}

/// Core engine state: every bit of logic that does not touch the DOM.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub items: ItemStore,
    pub camera: Camera,
    pub tools: ToolState,
    pub gesture: GestureState,
    /// Most recently pressed card; the source for duplication.
    pub selected_id: Option<ItemId>,
    /// Client-space top-left corner of the frame element.
    pub frame_origin: Point,
    background: Color,
    taps: TapTracker,
    export_guard: ExportGuard,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            items: ItemStore::new(),
            camera: Camera::default(),
            tools: ToolState::new(config.stroke_color, config.stroke_width),
            gesture: GestureState::Idle,
            selected_id: None,
            frame_origin: Point::default(),
            background: config.background,
            taps: TapTracker::default(),
            export_guard: ExportGuard::new(),
        }
    }

    /// Background color of the raster surface; what the eraser paints with.
    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_frame_origin(&mut self, origin: Point) {
        self.frame_origin = origin;
    }

    /// The guard exports of this canvas must run under. While it is held the
    /// layer shows the neutral export transform, so pointer input is dropped.
    #[must_use]
    pub fn export_guard(&self) -> ExportGuard {
        self.export_guard.clone()
    }

    fn input_locked(&self) -> bool {
        self.export_guard.is_active()
    }

    /// Layer transform and zoom readout for the current camera.
    #[must_use]
    pub fn viewport_actions(&self) -> Vec<Action> {
        vec![
            Action::SetLayerTransform(self.camera.css_transform()),
            Action::SetZoomLabel(self.camera.zoom_percent()),
        ]
    }

    // --- Toolbar ---

    /// Switch tools and update the cursor affordance.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.tools.set_tool(tool);
        log::debug!("tool -> {tool:?}");
        vec![Action::SetCursor(tool.cursor())]
    }

    /// Switch tools by toolbar name. Unknown names are ignored.
    pub fn set_tool_name(&mut self, name: &str) -> Vec<Action> {
        match Tool::from_name(name) {
            Some(tool) => self.set_tool(tool),
            None => {
                log::warn!("ignoring unknown tool {name:?}");
                Vec::new()
            }
        }
    }

    pub fn set_color(&mut self, raw: &str) -> bool {
        self.tools.set_color(raw)
    }

    pub fn set_width(&mut self, width: f64) -> bool {
        self.tools.set_width(width)
    }

    // --- Items ---

    /// Place a new card at `position` (content space) on top of the stack.
    pub fn add_item(&mut self, content: ItemContent, position: Point) -> Vec<Action> {
        let item = self.items.add(content, position).clone();
        log::debug!("created {:?} card {}", item.kind(), item.id);
        vec![Action::ItemCreated(item)]
    }

    /// Place a new card just inside the visible top-left corner of the frame,
    /// at the landing point of its kind.
    pub fn add_item_in_view(&mut self, content: ItemContent) -> Vec<Action> {
        let inset = content.screen_inset();
        let landing = Point::new(self.frame_origin.x + inset.x, self.frame_origin.y + inset.y);
        let position = self.camera.screen_to_world(landing, self.frame_origin);
        self.add_item(content, position)
    }

    /// Clone the selected card 20px down and right. No-op without a selection.
    pub fn duplicate_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.selected_id else {
            return Vec::new();
        };
        match self.items.duplicate(&id) {
            Some(copy) => {
                log::debug!("duplicated card {id} as {}", copy.id);
                vec![Action::ItemCreated(copy.clone())]
            }
            None => Vec::new(),
        }
    }

    /// Remove a card for good.
    pub fn delete_item(&mut self, id: &ItemId) -> Vec<Action> {
        if self.items.remove(id).is_none() {
            return Vec::new();
        }
        if self.selected_id.as_ref() == Some(id) {
            self.selected_id = None;
        }
        if matches!(self.gesture, GestureState::Dragging { id: g, .. } | GestureState::Resizing { id: g, .. } if g == *id)
        {
            self.gesture = GestureState::Idle;
        }
        log::debug!("deleted card {id}");
        vec![Action::ItemDeleted { id: *id }]
    }

    /// Replace the text of a text card, e.g. after in-place editing.
    pub fn set_item_text(&mut self, id: &ItemId, text: String) -> bool {
        self.items.set_text(id, text)
    }

    // --- Input events ---

    /// Start a gesture. What starts depends on the active tool and what was pressed.
    pub fn on_pointer_down(&mut self, screen: Point) -> Vec<Action> {
        if !self.gesture.is_idle() || self.input_locked() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen, self.frame_origin);
        let target = hit::target_at(world, &self.items);
        if let Target::Item(hit) = target {
            self.selected_id = Some(hit.item_id);
        }

        let mut actions = Vec::new();
        self.gesture = match (self.tools.tool, target) {
            (Tool::Brush | Tool::Eraser, Target::Background) => {
                actions.push(Action::BeginStroke(world));
                GestureState::Drawing { last_world: world }
            }
            (Tool::Select, Target::Background) => GestureState::Panning {
                anchor: Point::new(screen.x - self.camera.pan_x, screen.y - self.camera.pan_y),
            },
            (Tool::Select, Target::Item(hit)) => self.item_gesture(hit, world),
            (Tool::Brush | Tool::Eraser, Target::Item(_)) => GestureState::Idle,
        };
        if !self.gesture.is_idle() {
            log::debug!("gesture -> {}", self.gesture.name());
        }
        actions
    }

    fn item_gesture(&self, hit: Hit, world: Point) -> GestureState {
        let Some(item) = self.items.get(&hit.item_id) else {
            return GestureState::Idle;
        };
        match hit.part {
            HitPart::Body => GestureState::Dragging {
                id: item.id,
                grab: Point::new(world.x - item.x, world.y - item.y),
            },
            HitPart::ResizeHandle => GestureState::Resizing {
                id: item.id,
                start_world: world,
                orig_w: item.width,
                orig_h: item.height,
            },
        }
    }

    /// Continue the active gesture, if any.
    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        if self.input_locked() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen, self.frame_origin);
        match self.gesture {
            GestureState::Idle => Vec::new(),
            GestureState::Drawing { last_world } => {
                // Tool switched to select mid-gesture: stop painting.
                let Some(color) = self.tools.paint_color(self.background) else {
                    return Vec::new();
                };
                let segment = StrokeSegment { from: last_world, to: world, color, width: self.tools.stroke_width };
                self.gesture = GestureState::Drawing { last_world: world };
                vec![Action::DrawSegment(segment)]
            }
            GestureState::Panning { anchor } => {
                self.camera.pan_x = screen.x - anchor.x;
                self.camera.pan_y = screen.y - anchor.y;
                self.viewport_actions()
            }
            GestureState::Dragging { id, grab } => {
                self.update_item(id, ItemGeometry::position(world.x - grab.x, world.y - grab.y))
            }
            GestureState::Resizing { id, start_world, orig_w, orig_h } => {
                let width = (orig_w + world.x - start_world.x).max(MIN_ITEM_WIDTH);
                let height = (orig_h + world.y - start_world.y).max(MIN_ITEM_HEIGHT);
                self.update_item(id, ItemGeometry::size(width, height))
            }
        }
    }

    fn update_item(&mut self, id: ItemId, geometry: ItemGeometry) -> Vec<Action> {
        if self.items.apply_geometry(&id, &geometry) {
            vec![Action::ItemUpdated { id, geometry }]
        } else {
            self.gesture = GestureState::Idle;
            Vec::new()
        }
    }

    /// Finish the active gesture.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let ended = std::mem::take(&mut self.gesture);
        if !ended.is_idle() {
            log::debug!("gesture {} -> idle", ended.name());
        }
        match ended {
            GestureState::Drawing { .. } => vec![Action::EndStroke],
            _ => Vec::new(),
        }
    }

    /// Zoom one step around the cursor.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        if self.input_locked() {
            return Vec::new();
        }
        if self.camera.zoom_at(delta.dy, screen, self.frame_origin) {
            self.viewport_actions()
        } else {
            Vec::new()
        }
    }

    /// Delete the card under the pointer.
    pub fn on_double_click(&mut self, screen: Point) -> Vec<Action> {
        if self.input_locked() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen, self.frame_origin);
        match hit::hit_test(world, &self.items) {
            Some(hit) => self.delete_item(&hit.item_id),
            None => Vec::new(),
        }
    }

    /// Register a tap; the second quick tap on the same card deletes it.
    pub fn on_tap(&mut self, screen: Point, now_ms: f64) -> Vec<Action> {
        if self.input_locked() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen, self.frame_origin);
        match hit::hit_test(world, &self.items) {
            Some(hit) if self.taps.register(hit.item_id, now_ms) => self.delete_item(&hit.item_id),
            Some(_) => Vec::new(),
            None => {
                self.taps.clear();
                Vec::new()
            }
        }
    }

    /// Touch press: a completed double tap wins, otherwise a regular pointer-down.
    pub fn on_touch_start(&mut self, screen: Point, now_ms: f64) -> Vec<Action> {
        let deleted = self.on_tap(screen, now_ms);
        if deleted.is_empty() { self.on_pointer_down(screen) } else { deleted }
    }

    // --- Queries ---

    /// The currently selected card, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ItemId> {
        self.selected_id
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Look up a card by ID.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&CanvasItem> {
        self.items.get(id)
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the DOM it mutates.
pub struct Engine {
    frame: HtmlElement,
    layer: HtmlElement,
    surface: CanvasSurface,
    cards: CardLayer,
    zoom_label: Option<HtmlElement>,
    pub core: EngineCore,
}

impl Engine {
    /// Bind an engine to the frame, its content layer and the raster canvas
    /// inside it. `zoom_label`, when given, shows the zoom as a percentage.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context or the layer cannot be styled.
    pub fn new(
        frame: HtmlElement,
        layer: HtmlElement,
        canvas: &HtmlCanvasElement,
        zoom_label: Option<HtmlElement>,
        config: &CanvasConfig,
    ) -> Result<Self, wasm_bindgen::JsValue> {
        let surface = CanvasSurface::new(canvas, config.background, config.surface_width, config.surface_height)?;
        let cards = CardLayer::new(layer.clone())?;
        let core = EngineCore::new(config);

        layer.style().set_property("transform-origin", "0 0")?;
        let mut engine = Self { frame, layer, surface, cards, zoom_label, core };
        let mut initial = engine.core.viewport_actions();
        initial.push(Action::SetCursor(engine.core.tools.tool.cursor()));
        engine.apply(&initial);
        Ok(engine)
    }

    /// Re-read the frame's client rect; call before handling a press or wheel.
    pub fn refresh_frame_origin(&mut self) {
        let rect = self.frame.get_bounding_client_rect();
        self.core.set_frame_origin(Point::new(rect.left(), rect.top()));
    }

    /// Apply engine actions to the raster surface and the DOM.
    pub fn apply(&mut self, actions: &[Action]) {
        paint(&mut self.surface, actions);
        for action in actions {
            let result = match action {
                Action::SetLayerTransform(transform) => self.layer.style().set_property("transform", transform),
                Action::SetZoomLabel(text) => {
                    if let Some(label) = &self.zoom_label {
                        label.set_text_content(Some(text));
                    }
                    Ok(())
                }
                Action::SetCursor(cursor) => self.frame.style().set_property("cursor", cursor),
                Action::ItemCreated(item) => self.cards.create(item),
                Action::ItemUpdated { id, geometry } => self.cards.update(id, geometry),
                Action::ItemDeleted { id } => {
                    self.cards.remove(id);
                    Ok(())
                }
                Action::BeginStroke(_) | Action::DrawSegment(_) | Action::EndStroke => Ok(()),
            };
            if let Err(err) = result {
                log::warn!("failed to apply {action:?}: {err:?}");
            }
        }
    }

    /// Create a card at its kind's landing point in the current view.
    pub fn add_in_view(&mut self, content: ItemContent) {
        self.refresh_frame_origin();
        let actions = self.core.add_item_in_view(content);
        self.apply(&actions);
    }

    /// Duplicate the selection, carrying over any in-place text edits first.
    pub fn duplicate_selected(&mut self) {
        if let Some(id) = self.core.selection() {
            if let Some(text) = self.cards.edited_text(&id) {
                self.core.set_item_text(&id, text);
            }
        }
        let actions = self.core.duplicate_selected();
        self.apply(&actions);
    }
}
