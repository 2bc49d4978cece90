use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::executor::block_on;

use super::*;
use crate::camera::Point;
use crate::engine::{Action, EngineCore};
use crate::input::WheelDelta;
use crate::tools::Tool;

// =============================================================
// Helpers
// =============================================================

const PNG_URL: &str = "data:image/png;base64,iVBORw0KGgo=";

/// Returns `Pending` once, then `Ready`, so concurrent exports interleave.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

struct MockHost {
    style: RefCell<ExportStyle>,
    style_log: RefCell<Vec<ExportStyle>>,
    style_at_capture: RefCell<Option<ExportStyle>>,
    capture_result: Result<String, ExportError>,
    capture_options: RefCell<Vec<CaptureOptions>>,
    download_fails: bool,
    downloads: RefCell<Vec<(String, Bitmap)>>,
    settled_ms: RefCell<Vec<u32>>,
}

impl MockHost {
    fn new(capture_result: Result<String, ExportError>) -> Self {
        Self {
            style: RefCell::new(ExportStyle {
                transform: "translate(-12px, -12px) scale(1.12)".into(),
                overflow: "hidden".into(),
            }),
            style_log: RefCell::new(Vec::new()),
            style_at_capture: RefCell::new(None),
            capture_result,
            capture_options: RefCell::new(Vec::new()),
            download_fails: false,
            downloads: RefCell::new(Vec::new()),
            settled_ms: RefCell::new(Vec::new()),
        }
    }

    fn succeeding() -> Self {
        Self::new(Ok(PNG_URL.into()))
    }

    fn rejecting() -> Self {
        Self::new(Err(ExportError::Capture("SecurityError: tainted canvas".into())))
    }
}

impl ExportHost for MockHost {
    fn style(&self) -> ExportStyle {
        self.style.borrow().clone()
    }

    fn set_style(&self, style: &ExportStyle) {
        self.style_log.borrow_mut().push(style.clone());
        *self.style.borrow_mut() = style.clone();
    }

    fn settle(&self, ms: u32) -> impl Future<Output = ()> {
        self.settled_ms.borrow_mut().push(ms);
        YieldOnce(false)
    }

    fn capture(&self, options: &CaptureOptions) -> impl Future<Output = Result<Bitmap, ExportError>> {
        self.capture_options.borrow_mut().push(options.clone());
        *self.style_at_capture.borrow_mut() = Some(self.style());
        let result = self.capture_result.clone().and_then(Bitmap::from_data_url);
        std::future::ready(result)
    }

    fn download(&self, file_name: &str, bitmap: &Bitmap) -> Result<(), ExportError> {
        if self.download_fails {
            return Err(ExportError::Download("blocked".into()));
        }
        self.downloads.borrow_mut().push((file_name.to_owned(), bitmap.clone()));
        Ok(())
    }
}

fn saved_style() -> ExportStyle {
    ExportStyle { transform: "translate(-12px, -12px) scale(1.12)".into(), overflow: "hidden".into() }
}

// =============================================================
// Happy path
// =============================================================

#[test]
fn successful_export_downloads_png_with_configured_name() {
    let host = MockHost::succeeding();
    let guard = ExportGuard::new();
    let outcome = block_on(export_scene(&host, &guard, &ExportConfig::default()));

    assert_eq!(outcome, ExportOutcome::Downloaded);
    let downloads = host.downloads.borrow();
    assert_eq!(downloads.len(), 1);
    assert_eq!(downloads[0].0, "tela-livre.png");
    assert_eq!(downloads[0].1.data_url(), PNG_URL);
}

#[test]
fn capture_runs_with_neutral_style_after_settle() {
    let host = MockHost::succeeding();
    let config = ExportConfig { settle_ms: 25, ..ExportConfig::default() };
    block_on(export_scene(&host, &ExportGuard::new(), &config));

    assert_eq!(*host.settled_ms.borrow(), vec![25]);
    assert_eq!(host.style_at_capture.borrow().clone(), Some(ExportStyle::neutral()));
}

#[test]
fn capture_receives_background_and_scale() {
    let host = MockHost::succeeding();
    let config = ExportConfig { scale: 3.0, ..ExportConfig::default() };
    block_on(export_scene(&host, &ExportGuard::new(), &config));

    assert_eq!(
        *host.capture_options.borrow(),
        vec![CaptureOptions { background_color: "#ffffff".into(), scale: 3.0 }]
    );
}

#[test]
fn styles_are_restored_after_success() {
    let host = MockHost::succeeding();
    block_on(export_scene(&host, &ExportGuard::new(), &ExportConfig::default()));

    assert_eq!(host.style(), saved_style());
    assert_eq!(*host.style_log.borrow(), vec![ExportStyle::neutral(), saved_style()]);
}

// =============================================================
// Failure paths
// =============================================================

#[test]
fn rejected_capture_restores_styles_and_skips_download() {
    let host = MockHost::rejecting();
    let guard = ExportGuard::new();
    let outcome = block_on(export_scene(&host, &guard, &ExportConfig::default()));

    assert!(matches!(outcome, ExportOutcome::Failed(ExportError::Capture(_))));
    assert_eq!(host.style(), saved_style());
    assert!(host.downloads.borrow().is_empty());
    assert!(!guard.is_active());
}

#[test]
fn non_png_bitmap_is_rejected() {
    let host = MockHost::new(Ok("data:image/jpeg;base64,/9j/".into()));
    let outcome = block_on(export_scene(&host, &ExportGuard::new(), &ExportConfig::default()));

    assert!(matches!(outcome, ExportOutcome::Failed(ExportError::InvalidBitmap(_))));
    assert_eq!(host.style(), saved_style());
}

#[test]
fn failed_download_still_restores_styles() {
    let mut host = MockHost::succeeding();
    host.download_fails = true;
    let outcome = block_on(export_scene(&host, &ExportGuard::new(), &ExportConfig::default()));

    assert_eq!(outcome, ExportOutcome::Failed(ExportError::Download("blocked".into())));
    assert_eq!(host.style(), saved_style());
}

// =============================================================
// Guard
// =============================================================

#[test]
fn guard_is_single_flight() {
    let guard = ExportGuard::new();
    let ticket = guard.try_begin();
    assert!(ticket.is_some());
    assert!(guard.is_active());
    assert!(guard.try_begin().is_none());
    drop(ticket);
    assert!(!guard.is_active());
    assert!(guard.try_begin().is_some());
}

#[test]
fn overlapping_export_is_busy_and_touches_nothing() {
    let host = MockHost::succeeding();
    let guard = ExportGuard::new();
    let config = ExportConfig::default();

    let (first, second) = block_on(futures::future::join(
        export_scene(&host, &guard, &config),
        export_scene(&host, &guard, &config),
    ));

    assert_eq!(first, ExportOutcome::Downloaded);
    assert_eq!(second, ExportOutcome::Busy);
    assert_eq!(host.downloads.borrow().len(), 1);
    assert_eq!(*host.style_log.borrow(), vec![ExportStyle::neutral(), saved_style()]);
    assert_eq!(host.style(), saved_style());
}

#[test]
fn guard_clears_after_failure_so_next_export_runs() {
    let host = MockHost::rejecting();
    let guard = ExportGuard::new();
    block_on(export_scene(&host, &guard, &ExportConfig::default()));
    let again = block_on(export_scene(&host, &guard, &ExportConfig::default()));
    assert!(matches!(again, ExportOutcome::Failed(_)));
    assert_eq!(host.capture_options.borrow().len(), 2);
}

// =============================================================
// Export against a live engine
// =============================================================

/// Host whose layer transform follows a live engine; the user drags the
/// background while the capture settles.
struct PanningHost {
    core: RefCell<EngineCore>,
    transform: RefCell<String>,
    overflow: RefCell<String>,
    transform_at_capture: RefCell<Option<String>>,
}

impl PanningHost {
    fn new(core: EngineCore) -> Self {
        Self {
            core: RefCell::new(core),
            transform: RefCell::new(String::new()),
            overflow: RefCell::new("hidden".into()),
            transform_at_capture: RefCell::new(None),
        }
    }

    fn apply(&self, actions: &[Action]) {
        for action in actions {
            if let Action::SetLayerTransform(transform) = action {
                *self.transform.borrow_mut() = transform.clone();
            }
        }
    }
}

impl ExportHost for PanningHost {
    fn style(&self) -> ExportStyle {
        ExportStyle { transform: self.transform.borrow().clone(), overflow: self.overflow.borrow().clone() }
    }

    fn set_style(&self, style: &ExportStyle) {
        *self.transform.borrow_mut() = style.transform.clone();
        *self.overflow.borrow_mut() = style.overflow.clone();
    }

    fn settle(&self, _ms: u32) -> impl Future<Output = ()> {
        let actions = {
            let mut core = self.core.borrow_mut();
            let mut actions = core.on_pointer_down(Point::new(200.0, 200.0));
            actions.extend(core.on_pointer_move(Point::new(250.0, 230.0)));
            actions.extend(core.on_pointer_up());
            actions
        };
        self.apply(&actions);
        std::future::ready(())
    }

    fn capture(&self, _options: &CaptureOptions) -> impl Future<Output = Result<Bitmap, ExportError>> {
        *self.transform_at_capture.borrow_mut() = Some(self.transform.borrow().clone());
        std::future::ready(Bitmap::from_data_url(PNG_URL.into()))
    }

    fn download(&self, _file_name: &str, _bitmap: &Bitmap) -> Result<(), ExportError> {
        Ok(())
    }
}

#[test]
fn pan_during_export_keeps_layer_in_step_with_camera() {
    let mut core = EngineCore::default();
    core.set_tool(Tool::Select);
    let zoomed = core.on_wheel(Point::new(100.0, 100.0), WheelDelta { dx: 0.0, dy: -1.0 });
    let guard = core.export_guard();
    let host = PanningHost::new(core);
    host.apply(&zoomed);
    let before = host.style();

    let outcome = block_on(export_scene(&host, &guard, &ExportConfig::default()));

    assert_eq!(outcome, ExportOutcome::Downloaded);
    assert_eq!(host.transform_at_capture.borrow().as_deref(), Some("none"));
    assert_eq!(host.style(), before);
    assert_eq!(host.style().transform, host.core.borrow().camera().css_transform());
}

// =============================================================
// Bitmap
// =============================================================

#[test]
fn bitmap_error_truncates_long_urls() {
    let long = format!("data:text/plain,{}", "x".repeat(500));
    let Err(ExportError::InvalidBitmap(head)) = Bitmap::from_data_url(long) else {
        panic!("expected InvalidBitmap");
    };
    assert_eq!(head.len(), 32);
}
