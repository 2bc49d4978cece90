//! Free-form drawing canvas with floating cards, compiled to WebAssembly.
//!
//! The widget layers a raster surface for brush and eraser strokes under a set
//! of absolutely positioned cards (images, text, media), all inside a content
//! layer that pans and zooms as one. Input handling, camera math and the item
//! store run in the browser-free [`engine::EngineCore`]; [`engine::Engine`]
//! applies the resulting [`engine::Action`]s to the DOM.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`web`] | `wasm-bindgen` entry points and DOM event wiring |
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Card types and the in-memory item store |
//! | [`camera`] | Pan/zoom camera and client-to-content mapping |
//! | [`input`] | Gesture state machine and double-tap tracking |
//! | [`hit`] | Hit-testing against cards and their resize handles |
//! | [`tools`] | Active tool, stroke color and width |
//! | [`surface`] | Raster surfaces: Canvas2D and in-memory RGBA |
//! | [`dom`] | Card elements and the browser export host |
//! | [`export`] | PNG export sequence and its single-flight guard |
//! | [`config`] | Widget configuration parsed from JSON |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod dom;
pub mod engine;
pub mod export;
pub mod hit;
pub mod input;
pub mod surface;
pub mod tools;
pub mod web;
