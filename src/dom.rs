//! DOM side of the widget: card elements and the export host.
//!
//! Cards are absolutely positioned `div`s inside the content layer, so the
//! layer transform moves and scales them together with the raster surface.
//! Everything here only mirrors engine state; geometry decisions are made in
//! [`crate::engine::EngineCore`].

use std::collections::HashMap;
use std::future::Future;

use gloo_timers::future::TimeoutFuture;
use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlAnchorElement, HtmlCanvasElement, HtmlElement};

use crate::doc::{CanvasItem, ItemContent, ItemGeometry, ItemId, MediaKind};
use crate::export::{Bitmap, CaptureOptions, ExportError, ExportHost, ExportStyle};

const CARD_CLASS: &str = "canvas-card";
const HANDLE_CLASS: &str = "canvas-card__resize";
const TEXT_CLASS: &str = "canvas-card__text";
const MEDIA_NOTE_CLASS: &str = "canvas-card__note";

// =============================================================
// Cards
// =============================================================

/// Card elements currently attached to the content layer.
pub struct CardLayer {
    document: Document,
    layer: HtmlElement,
    cards: HashMap<ItemId, HtmlElement>,
}

impl CardLayer {
    /// # Errors
    ///
    /// Returns `Err` if the layer is not attached to a document.
    pub fn new(layer: HtmlElement) -> Result<Self, JsValue> {
        let document = layer
            .owner_document()
            .ok_or_else(|| JsValue::from_str("content layer is not attached to a document"))?;
        Ok(Self { document, layer, cards: HashMap::new() })
    }

    /// Build the element for `item` and append it on top of the layer.
    ///
    /// # Errors
    ///
    /// Returns `Err` if element creation or styling fails.
    pub fn create(&mut self, item: &CanvasItem) -> Result<(), JsValue> {
        let card = self.html_element("div")?;
        card.set_class_name(&format!("{CARD_CLASS} {CARD_CLASS}--{}", kind_class(&item.content)));
        card.set_attribute("data-item-id", &item.id.to_string())?;
        let style = card.style();
        style.set_property("position", "absolute")?;
        style.set_property("z-index", &item.z_index.to_string())?;
        apply_geometry(&card, &item.geometry())?;

        self.fill_content(&card, &item.content)?;

        let handle = self.html_element("div")?;
        handle.set_class_name(HANDLE_CLASS);
        card.append_child(&handle)?;

        self.layer.append_child(&card)?;
        self.cards.insert(item.id, card);
        Ok(())
    }

    fn fill_content(&self, card: &HtmlElement, content: &ItemContent) -> Result<(), JsValue> {
        match content {
            ItemContent::Image { src } => {
                let img = self.html_element("img")?;
                img.set_attribute("src", src)?;
                img.set_attribute("draggable", "false")?;
                img.style().set_property("width", "100%")?;
                img.style().set_property("height", "100%")?;
                img.style().set_property("object-fit", "cover")?;
                img.style().set_property("pointer-events", "none")?;
                card.append_child(&img)?;
            }
            ItemContent::Text { text } => {
                let body = self.html_element("div")?;
                body.set_class_name(TEXT_CLASS);
                body.set_content_editable("true");
                body.set_inner_text(text);
                card.append_child(&body)?;
            }
            ItemContent::Media { media, title, description } => {
                let heading = self.html_element("b")?;
                heading.set_inner_text(&format!("{} {title}", media.icon()));
                let body = self.html_element("div")?;
                body.set_class_name(MEDIA_NOTE_CLASS);
                body.set_inner_text(description);
                card.append_child(&heading)?;
                card.append_child(&body)?;
            }
        }
        Ok(())
    }

    /// Move or resize the element of `id`. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a style property cannot be set.
    pub fn update(&self, id: &ItemId, geometry: &ItemGeometry) -> Result<(), JsValue> {
        match self.cards.get(id) {
            Some(card) => apply_geometry(card, geometry),
            None => Ok(()),
        }
    }

    /// Detach and forget the element of `id`.
    pub fn remove(&mut self, id: &ItemId) {
        if let Some(card) = self.cards.remove(id) {
            card.remove();
        }
    }

    /// Current text of an editable text card, if `id` is one.
    #[must_use]
    pub fn edited_text(&self, id: &ItemId) -> Option<String> {
        let card = self.cards.get(id)?;
        let body = card.query_selector(&format!(".{TEXT_CLASS}")).unwrap_or_default()?;
        match body.dyn_into::<HtmlElement>() {
            Ok(el) => Some(el.inner_text()),
            Err(_) => None,
        }
    }

    fn html_element(&self, tag: &str) -> Result<HtmlElement, JsValue> {
        Ok(self.document.create_element(tag)?.dyn_into::<HtmlElement>()?)
    }
}

fn kind_class(content: &ItemContent) -> &'static str {
    match content {
        ItemContent::Image { .. } => "image",
        ItemContent::Text { .. } => "text",
        ItemContent::Media { media: MediaKind::Music, .. } => "music",
        ItemContent::Media { media: MediaKind::Film, .. } => "film",
    }
}

fn apply_geometry(el: &HtmlElement, geometry: &ItemGeometry) -> Result<(), JsValue> {
    let style = el.style();
    let fields = [
        ("left", geometry.x),
        ("top", geometry.y),
        ("width", geometry.width),
        ("height", geometry.height),
    ];
    for (property, value) in fields {
        if let Some(value) = value {
            style.set_property(property, &format!("{value}px"))?;
        }
    }
    Ok(())
}

// =============================================================
// Export host
// =============================================================

/// Browser implementation of [`ExportHost`].
///
/// `capture` is the page's rasterization function, called as
/// `capture(frame, { backgroundColor, scale })` and expected to resolve to a canvas.
#[derive(Clone)]
pub struct DomExportHost {
    pub frame: HtmlElement,
    pub layer: HtmlElement,
    pub capture: Function,
}

impl DomExportHost {
    fn read(el: &HtmlElement, property: &str) -> String {
        el.style().get_property_value(property).unwrap_or_else(|err| {
            log::warn!("could not read {property}: {err:?}");
            String::new()
        })
    }

    fn write(el: &HtmlElement, property: &str, value: &str) {
        if let Err(err) = el.style().set_property(property, value) {
            log::warn!("could not set {property}: {err:?}");
        }
    }

    fn capture_options(options: &CaptureOptions) -> Result<Object, JsValue> {
        let js = Object::new();
        Reflect::set(&js, &JsValue::from_str("backgroundColor"), &JsValue::from_str(&options.background_color))?;
        Reflect::set(&js, &JsValue::from_str("scale"), &JsValue::from_f64(options.scale))?;
        Ok(js)
    }
}

impl ExportHost for DomExportHost {
    fn style(&self) -> ExportStyle {
        ExportStyle {
            transform: Self::read(&self.layer, "transform"),
            overflow: Self::read(&self.frame, "overflow"),
        }
    }

    fn set_style(&self, style: &ExportStyle) {
        Self::write(&self.layer, "transform", &style.transform);
        Self::write(&self.frame, "overflow", &style.overflow);
    }

    fn settle(&self, ms: u32) -> impl Future<Output = ()> {
        TimeoutFuture::new(ms)
    }

    fn capture(&self, options: &CaptureOptions) -> impl Future<Output = Result<Bitmap, ExportError>> {
        let call = Self::capture_options(options)
            .and_then(|opts| self.capture.call2(&JsValue::NULL, &self.frame, &opts))
            .and_then(|value| value.dyn_into::<Promise>());
        async move {
            let promise = call.map_err(|err| ExportError::Capture(format!("{err:?}")))?;
            let rendered = JsFuture::from(promise)
                .await
                .map_err(|err| ExportError::Capture(format!("{err:?}")))?;
            let canvas = rendered
                .dyn_into::<HtmlCanvasElement>()
                .map_err(|other| ExportError::InvalidBitmap(format!("{other:?}")))?;
            let url = canvas
                .to_data_url_with_type("image/png")
                .map_err(|err| ExportError::InvalidBitmap(format!("{err:?}")))?;
            Bitmap::from_data_url(url)
        }
    }

    fn download(&self, file_name: &str, bitmap: &Bitmap) -> Result<(), ExportError> {
        let fail = |err: JsValue| ExportError::Download(format!("{err:?}"));
        let document = self
            .frame
            .owner_document()
            .ok_or_else(|| ExportError::Download("frame is detached".to_owned()))?;
        let link = document
            .create_element("a")
            .map_err(fail)?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|el| fail(el.into()))?;
        link.set_download(file_name);
        link.set_href(bitmap.data_url());
        link.click();
        Ok(())
    }
}
