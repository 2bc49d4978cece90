//! DOM wiring for the emotion log form.
//!
//! Listeners live as long as the page, so their closures are leaked with
//! `forget` once attached.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlInputElement};

use crate::collapse::{CollapseCommand, CollapseEvent, OPEN_CLASS, SHOWN_CLASS};
use crate::intensity::IntensityLabel;
use crate::selection::{EmotionSelection, button_value, placeholders_needed};

const ACTIVE_CLASS: &str = "active";

#[wasm_bindgen(js_namespace = bootstrap)]
extern "C" {
    /// Collapse plugin of the host widget library.
    type Collapse;

    #[wasm_bindgen(static_method_of = Collapse, js_name = getOrCreateInstance, catch)]
    fn get_or_create_instance(element: &Element, options: &JsValue) -> Result<Collapse, JsValue>;

    #[wasm_bindgen(method)]
    fn show(this: &Collapse);

    #[wasm_bindgen(method)]
    fn hide(this: &Collapse);
}

/// Error raised while mounting the form.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("no document to mount on")]
    NoDocument,
    #[error("unknown log level {0:?}")]
    LogLevel(String),
    #[error("DOM call failed: {0}")]
    Dom(String),
}

impl From<JsValue> for MountError {
    fn from(value: JsValue) -> Self {
        Self::Dom(format!("{value:?}"))
    }
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Wire every interactive part of the emotion log form found in the document.
///
/// # Errors
///
/// Returns `Err` for an unknown `log_level`, a missing document, or a failing
/// DOM call while attaching listeners.
#[wasm_bindgen(js_name = mountEmotionLog)]
pub fn mount_emotion_log(log_level: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    init_logging(log_level.as_deref())?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(MountError::NoDocument)?;
    pad_groups(&document)?;
    wire_dropdowns(&document)?;
    wire_emotions(&document)?;
    wire_group_headers(&document)?;
    wire_collapse_events(&document)?;
    wire_intensity(&document)?;
    log::info!("emotion log mounted");
    Ok(())
}

fn init_logging(raw: Option<&str>) -> Result<(), MountError> {
    let level = match raw {
        None | Some("") => log::Level::Info,
        Some(raw) => raw
            .parse::<log::Level>()
            .map_err(|_| MountError::LogLevel(raw.to_owned()))?,
    };
    if console_log::init_with_level(level).is_err() {
        log::set_max_level(level.to_level_filter());
    }
    Ok(())
}

// =============================================================
// DOM helpers
// =============================================================

fn select_all(document: &Document, selector: &str) -> Result<Vec<Element>, MountError> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_ref::<Element>().cloned())
        .collect())
}

fn on(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> Result<(), MountError> {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

fn set_class(el: &Element, class: &str, present: bool) {
    let list = el.class_list();
    let result = if present { list.add_1(class) } else { list.remove_1(class) };
    if let Err(err) = result {
        log::warn!("could not update class {class:?}: {err:?}");
    }
}

fn find(document: &Document, selector: &str) -> Option<Element> {
    match document.query_selector(selector) {
        Ok(found) => found,
        Err(err) => {
            log::warn!("bad selector {selector:?}: {err:?}");
            None
        }
    }
}

// =============================================================
// Emotion buttons
// =============================================================

fn pad_groups(document: &Document) -> Result<(), MountError> {
    for group in select_all(document, ".group-content")? {
        let count = group.query_selector_all(".emotion-btn")?.length() as usize;
        for _ in 0..placeholders_needed(count) {
            let placeholder = document.create_element("div")?;
            placeholder.set_class_name("placeholder");
            group.append_child(&placeholder)?;
        }
    }
    Ok(())
}

fn wire_emotions(document: &Document) -> Result<(), MountError> {
    let buttons = Rc::new(select_all(document, ".emotion-btn")?);
    let preselected = buttons.iter().position(|button| button.class_list().contains(ACTIVE_CLASS));
    let selection = Rc::new(RefCell::new(EmotionSelection::seeded(preselected)));

    for (index, button) in buttons.iter().enumerate() {
        let buttons = Rc::clone(&buttons);
        let selection = Rc::clone(&selection);
        on(button, "click", move |_| {
            let active = selection.borrow_mut().click(index);
            for other in buttons.iter() {
                set_class(other, ACTIVE_CLASS, false);
            }
            match active.and_then(|i| buttons.get(i)) {
                Some(chosen) => {
                    set_class(chosen, ACTIVE_CLASS, true);
                    let text = chosen.text_content().unwrap_or_default();
                    let value = button_value(chosen.get_attribute("data-value").as_deref(), &text);
                    log::info!("emotion selected: {value}");
                }
                None => log::info!("emotion deselected"),
            }
        })?;
    }
    log::debug!("wired {} emotion buttons", buttons.len());
    Ok(())
}

// =============================================================
// Collapsible groups and dropdowns
// =============================================================

fn wire_group_headers(document: &Document) -> Result<(), MountError> {
    for header in select_all(document, ".group-header")? {
        let document = document.clone();
        let source = header.clone();
        on(&header, "click", move |_| {
            let Some(selector) = source.get_attribute("data-bs-target") else {
                log::debug!("group header without data-bs-target");
                return;
            };
            let Some(section) = find(&document, &selector) else {
                log::debug!("no section for {selector}");
                return;
            };
            toggle_section(&section);
        })?;
    }
    Ok(())
}

fn toggle_section(section: &Element) {
    let command = CollapseCommand::for_click(section.class_list().contains(SHOWN_CLASS));
    let options = Object::new();
    if let Err(err) = Reflect::set(&options, &JsValue::from_str("toggle"), &JsValue::FALSE) {
        log::warn!("could not build collapse options: {err:?}");
        return;
    }
    match Collapse::get_or_create_instance(section, &options) {
        Ok(collapse) => match command {
            CollapseCommand::Show => collapse.show(),
            CollapseCommand::Hide => collapse.hide(),
        },
        Err(err) => log::warn!("collapse library unavailable: {err:?}"),
    }
}

fn wire_collapse_events(document: &Document) -> Result<(), MountError> {
    for section in select_all(document, ".collapse")? {
        for event in CollapseEvent::ALL {
            on(&section, event.name(), move |ev: Event| {
                let header = ev
                    .target()
                    .as_ref()
                    .and_then(|target| target.dyn_ref::<Element>())
                    .and_then(Element::previous_element_sibling);
                if let Some(header) = header {
                    set_class(&header, OPEN_CLASS, event.header_open());
                }
            })?;
        }
    }
    Ok(())
}

fn wire_dropdowns(document: &Document) -> Result<(), MountError> {
    for button in select_all(document, r#"[data-bs-toggle="custom-dropdown"]"#)? {
        let document = document.clone();
        let source = button.clone();
        on(&button, "click", move |_| {
            let Some(selector) = source.get_attribute("data-target") else {
                return;
            };
            if let Some(menu) = find(&document, &selector) {
                if let Err(err) = menu.class_list().toggle(SHOWN_CLASS) {
                    log::warn!("could not toggle {selector}: {err:?}");
                }
            }
        })?;
    }
    Ok(())
}

// =============================================================
// Intensity slider
// =============================================================

fn wire_intensity(document: &Document) -> Result<(), MountError> {
    let slider = document
        .get_element_by_id("intensity")
        .and_then(|el| el.dyn_ref::<HtmlInputElement>().cloned());
    let (Some(slider), Some(label)) = (slider, document.get_element_by_id("intensityLabel")) else {
        log::debug!("no intensity slider on this page");
        return Ok(());
    };

    show_intensity(&label, &slider.value());
    let source = slider.clone();
    on(&slider, "input", move |_| show_intensity(&label, &source.value()))
}

fn show_intensity(label: &Element, raw: &str) {
    let IntensityLabel { text, active } = IntensityLabel::from_raw(raw);
    label.set_text_content(Some(text));
    set_class(label, ACTIVE_CLASS, active);
}
