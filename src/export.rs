//! PNG export of the composed scene.
//!
//! The frame is flattened by an external rasterizer that works on the live
//! DOM, so the layer transform is neutralized and the frame's overflow opened
//! up for the duration of the capture. Whatever happens, the saved styles are
//! put back before [`export_scene`] returns.
//!
//! The host side (style access, settle delay, rasterizer, download) sits
//! behind [`ExportHost`] so the sequence can run against a mock in tests.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use crate::config::ExportConfig;

/// Error raised while producing or delivering the export.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    /// The rasterization utility rejected.
    #[error("capture failed: {0}")]
    Capture(String),
    /// The rasterizer returned something that is not a PNG data URL.
    #[error("rasterizer returned an unusable bitmap: {0}")]
    InvalidBitmap(String),
    /// The browser download could not be triggered.
    #[error("download failed: {0}")]
    Download(String),
}

/// The two inline styles the export temporarily overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStyle {
    /// Content layer `transform`.
    pub transform: String,
    /// Frame `overflow`.
    pub overflow: String,
}

impl ExportStyle {
    /// Identity transform with nothing clipped.
    #[must_use]
    pub fn neutral() -> Self {
        Self { transform: "none".to_owned(), overflow: "visible".to_owned() }
    }
}

/// Options forwarded to the rasterizer, in its own vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOptions {
    pub background_color: String,
    pub scale: f64,
}

impl From<&ExportConfig> for CaptureOptions {
    fn from(config: &ExportConfig) -> Self {
        Self { background_color: config.background_color.to_hex(), scale: config.scale }
    }
}

/// A flattened PNG, as a `data:image/png` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    data_url: String,
}

impl Bitmap {
    /// Wrap a data URL produced by the rasterizer.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidBitmap`] unless the URL holds PNG data.
    pub fn from_data_url(data_url: String) -> Result<Self, ExportError> {
        if data_url.starts_with("data:image/png") {
            Ok(Self { data_url })
        } else {
            let head: String = data_url.chars().take(32).collect();
            Err(ExportError::InvalidBitmap(head))
        }
    }

    #[must_use]
    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

/// Host services the export sequence needs.
pub trait ExportHost {
    /// Current layer transform and frame overflow.
    fn style(&self) -> ExportStyle;

    /// Overwrite layer transform and frame overflow.
    fn set_style(&self, style: &ExportStyle);

    /// Resolve after `ms` milliseconds so style changes take effect.
    fn settle(&self, ms: u32) -> impl Future<Output = ()>;

    /// Flatten the frame into a bitmap.
    fn capture(&self, options: &CaptureOptions) -> impl Future<Output = Result<Bitmap, ExportError>>;

    /// Hand the bitmap to the user as a file.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Download`] if the browser refused.
    fn download(&self, file_name: &str, bitmap: &Bitmap) -> Result<(), ExportError>;
}

/// How an export request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The PNG was handed to the browser.
    Downloaded,
    /// Another export was still running; nothing was touched.
    Busy,
    /// Capture or download failed; styles were restored.
    Failed(ExportError),
}

/// Single-flight flag shared between the widget and its in-flight export.
#[derive(Debug, Clone, Default)]
pub struct ExportGuard {
    active: Rc<Cell<bool>>,
}

impl ExportGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an export is currently running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Claim the guard. The claim is released when the ticket drops.
    #[must_use]
    pub fn try_begin(&self) -> Option<ExportTicket> {
        if self.active.replace(true) {
            return None;
        }
        Some(ExportTicket { active: Rc::clone(&self.active) })
    }
}

/// Proof that an export holds the guard.
#[derive(Debug)]
pub struct ExportTicket {
    active: Rc<Cell<bool>>,
}

impl Drop for ExportTicket {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

/// Run one export: neutralize, settle, capture, download, restore.
pub async fn export_scene<H: ExportHost>(host: &H, guard: &ExportGuard, config: &ExportConfig) -> ExportOutcome {
    let Some(_ticket) = guard.try_begin() else {
        log::warn!("export already in progress; ignoring request");
        return ExportOutcome::Busy;
    };

    let saved = host.style();
    host.set_style(&ExportStyle::neutral());
    host.settle(config.settle_ms).await;

    let result = capture_and_download(host, config).await;
    host.set_style(&saved);

    match result {
        Ok(()) => {
            log::info!("exported {}", config.file_name);
            ExportOutcome::Downloaded
        }
        Err(err) => {
            log::error!("export failed: {err}");
            ExportOutcome::Failed(err)
        }
    }
}

async fn capture_and_download<H: ExportHost>(host: &H, config: &ExportConfig) -> Result<(), ExportError> {
    let bitmap = host.capture(&CaptureOptions::from(config)).await?;
    host.download(&config.file_name, &bitmap)
}
