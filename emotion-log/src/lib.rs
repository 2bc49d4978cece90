//! Form behavior for the emotion tracking log, compiled to WebAssembly.
//!
//! The page calls `mountEmotionLog()` once the DOM is ready. Decisions are made
//! in the browser-free modules; [`web`] only reads and writes the DOM.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`web`] | `wasm-bindgen` entry point and event wiring |
//! | [`selection`] | Single-choice emotion buttons and grid padding |
//! | [`collapse`] | Collapsible group headers and their `open` state |
//! | [`intensity`] | Intensity slider labels |

pub mod collapse;
pub mod intensity;
pub mod selection;
pub mod web;
