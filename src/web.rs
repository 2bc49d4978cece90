//! JavaScript entry points.
//!
//! [`FreeCanvas`] binds one [`Engine`] to a frame element, wires DOM events into
//! it, and exposes the toolbar operations to the page. Listeners are detached
//! when the widget is dropped (`free()` from JS).

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{
    Event, EventTarget, HtmlCanvasElement, HtmlElement, HtmlInputElement, MouseEvent, TouchEvent, WheelEvent,
};

use crate::camera::Point;
use crate::config::{CanvasConfig, ExportConfig};
use crate::doc::{ItemContent, MediaKind};
use crate::dom::DomExportHost;
use crate::engine::Engine;
use crate::export::{ExportGuard, export_scene};
use crate::input::WheelDelta;

/// Install the panic hook as soon as the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

fn init_logging(level: log::Level) {
    if console_log::init_with_level(level).is_err() {
        // Already installed by an earlier widget; just follow the newest level.
        log::set_max_level(level.to_level_filter());
    }
}

/// A registered DOM listener, removed again on drop.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("failed to detach {} listener: {err:?}", self.event);
        }
    }
}

/// Free-form canvas widget: brush and eraser strokes under a pan/zoom layer of
/// draggable cards, with PNG export.
#[wasm_bindgen]
pub struct FreeCanvas {
    engine: Rc<RefCell<Engine>>,
    listeners: Vec<Listener>,
    export_host: DomExportHost,
    export_guard: ExportGuard,
    export_config: ExportConfig,
}

#[wasm_bindgen]
impl FreeCanvas {
    /// Bind the widget.
    ///
    /// `frame` is the clipping viewport, `layer` the transformed content layer
    /// inside it, `canvas` the raster surface inside the layer, and `capture`
    /// the page's `capture(element, options) -> Promise<HTMLCanvasElement>`.
    /// `zoom_label`, if given, is kept showing the zoom percentage.
    ///
    /// # Errors
    ///
    /// Returns `Err` for malformed config JSON, a canvas without a 2D context,
    /// or a frame that is not attached to a window.
    #[wasm_bindgen(constructor)]
    pub fn new(
        frame: HtmlElement,
        layer: HtmlElement,
        canvas: HtmlCanvasElement,
        capture: js_sys::Function,
        zoom_label: Option<HtmlElement>,
        config_json: Option<String>,
    ) -> Result<FreeCanvas, JsValue> {
        let config = CanvasConfig::from_json(config_json.as_deref().unwrap_or_default())
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        init_logging(config.level_filter().map_err(|err| JsValue::from_str(&err.to_string()))?);

        let engine = Engine::new(frame.clone(), layer.clone(), &canvas, zoom_label, &config)?;
        let export_guard = engine.core.export_guard();
        let mut widget = Self {
            engine: Rc::new(RefCell::new(engine)),
            listeners: Vec::new(),
            export_host: DomExportHost { frame: frame.clone(), layer, capture },
            export_guard,
            export_config: config.export.clone(),
        };
        widget.wire(&frame)?;
        log::info!("canvas ready ({}x{})", config.surface_width, config.surface_height);
        Ok(widget)
    }

    /// Switch tool by toolbar name: `brush`, `eraser` or `select`.
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&self, name: &str) {
        self.with_engine(|engine| {
            let actions = engine.core.set_tool_name(name);
            engine.apply(&actions);
        });
    }

    /// Set the stroke color from a `#rgb`/`#rrggbb` string. Returns whether it was accepted.
    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&self, value: &str) -> bool {
        self.with_engine(|engine| engine.core.set_color(value)).unwrap_or_default()
    }

    /// Set the stroke width in content pixels. Returns whether it was accepted.
    #[wasm_bindgen(js_name = setWidth)]
    pub fn set_width(&self, width: f64) -> bool {
        self.with_engine(|engine| engine.core.set_width(width)).unwrap_or_default()
    }

    #[wasm_bindgen(js_name = addImage)]
    pub fn add_image(&self, src: String) {
        self.add(ItemContent::image(src));
    }

    /// Add a text card. An empty `text` gets the placeholder body.
    #[wasm_bindgen(js_name = addText)]
    pub fn add_text(&self, text: Option<String>) {
        self.add(ItemContent::text(text.unwrap_or_default()));
    }

    #[wasm_bindgen(js_name = addMusic)]
    pub fn add_music(&self, title: &str, description: &str) {
        self.add(ItemContent::media(MediaKind::Music, title, description));
    }

    #[wasm_bindgen(js_name = addFilm)]
    pub fn add_film(&self, title: &str, description: &str) {
        self.add(ItemContent::media(MediaKind::Film, title, description));
    }

    /// Turn the first file picked in `input` into an image card, then clear the
    /// input so the same file can be picked again.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the change listener cannot be attached.
    #[wasm_bindgen(js_name = bindImageUpload)]
    pub fn bind_image_upload(&mut self, input: HtmlInputElement) -> Result<(), JsValue> {
        let target: EventTarget = input.clone().into();
        self.listen(&target, "change", move |engine, _event: &Event| {
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            match web_sys::Url::create_object_url_with_blob(&file) {
                Ok(url) => {
                    log::debug!("uploaded {} as {url}", file.name());
                    engine.add_in_view(ItemContent::image(url));
                }
                Err(err) => log::warn!("could not open uploaded file: {err:?}"),
            }
            input.set_value("");
        })
    }

    /// Duplicate the most recently pressed card.
    pub fn duplicate(&self) {
        self.with_engine(Engine::duplicate_selected);
    }

    /// Export the frame as a PNG download. Ignored while another export runs;
    /// pointer and wheel input are dropped until it finishes.
    pub fn export(&self) {
        let host = self.export_host.clone();
        let guard = self.export_guard.clone();
        let config = self.export_config.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = export_scene(&host, &guard, &config).await;
            log::debug!("export finished: {outcome:?}");
        });
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.with_engine(|engine| engine.core.camera().zoom).unwrap_or(1.0)
    }
}

impl FreeCanvas {
    fn with_engine<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> Option<R> {
        match self.engine.try_borrow_mut() {
            Ok(mut engine) => Some(f(&mut *engine)),
            Err(_) => {
                log::warn!("engine busy; dropping toolbar call");
                None
            }
        }
    }

    fn add(&self, content: ItemContent) {
        self.with_engine(|engine| engine.add_in_view(content));
    }

    fn wire(&mut self, frame: &HtmlElement) -> Result<(), JsValue> {
        let window: EventTarget = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .into();
        let frame: EventTarget = frame.clone().into();

        self.listen(&frame, "mousedown", |engine, event: &MouseEvent| {
            if event.button() != 0 {
                return;
            }
            engine.refresh_frame_origin();
            let actions = engine.core.on_pointer_down(client_point(event));
            engine.apply(&actions);
        })?;
        self.listen(&window, "mousemove", |engine, event: &MouseEvent| {
            if engine.core.gesture.is_idle() {
                return;
            }
            let actions = engine.core.on_pointer_move(client_point(event));
            engine.apply(&actions);
        })?;
        self.listen(&window, "mouseup", |engine, _event: &MouseEvent| {
            let actions = engine.core.on_pointer_up();
            engine.apply(&actions);
        })?;
        self.listen(&frame, "dblclick", |engine, event: &MouseEvent| {
            event.prevent_default();
            engine.refresh_frame_origin();
            let actions = engine.core.on_double_click(client_point(event));
            engine.apply(&actions);
        })?;
        self.listen(&frame, "wheel", |engine, event: &WheelEvent| {
            event.prevent_default();
            engine.refresh_frame_origin();
            let delta = WheelDelta { dx: event.delta_x(), dy: event.delta_y() };
            let actions = engine.core.on_wheel(client_point(event), delta);
            engine.apply(&actions);
        })?;

        self.listen(&frame, "touchstart", |engine, event: &TouchEvent| {
            let Some(point) = primary_touch(event) else {
                return;
            };
            event.prevent_default();
            engine.refresh_frame_origin();
            let actions = engine.core.on_touch_start(point, js_sys::Date::now());
            engine.apply(&actions);
        })?;
        self.listen(&frame, "touchmove", |engine, event: &TouchEvent| {
            let Some(point) = primary_touch(event) else {
                return;
            };
            event.prevent_default();
            let actions = engine.core.on_pointer_move(point);
            engine.apply(&actions);
        })?;
        for name in ["touchend", "touchcancel"] {
            self.listen(&frame, name, |engine, _event: &TouchEvent| {
                let actions = engine.core.on_pointer_up();
                engine.apply(&actions);
            })?;
        }
        Ok(())
    }

    fn listen<E>(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        mut handler: impl FnMut(&mut Engine, &E) + 'static,
    ) -> Result<(), JsValue>
    where
        E: JsCast + 'static,
    {
        let engine = Rc::clone(&self.engine);
        let callback = Closure::<dyn FnMut(Event)>::new(move |raw: Event| {
            let Some(typed) = raw.dyn_ref::<E>() else {
                return;
            };
            match engine.try_borrow_mut() {
                Ok(mut engine) => handler(&mut *engine, typed),
                Err(_) => log::debug!("engine busy; dropping {event}"),
            }
        });
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        self.listeners.push(Listener { target: target.clone(), event, callback });
        Ok(())
    }
}

fn client_point(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

fn primary_touch(event: &TouchEvent) -> Option<Point> {
    let touch = event.touches().get(0)?;
    Some(Point::new(f64::from(touch.client_x()), f64::from(touch.client_y())))
}
