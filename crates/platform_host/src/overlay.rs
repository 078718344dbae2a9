//! Overlay rendering contracts: loading indicators, toasts, and alerts.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeSet,
    future::{poll_fn, Future},
    pin::Pin,
    rc::Rc,
    task::{Poll, Waker},
};

use serde::{Deserialize, Serialize};

use crate::{HostCall, HostCallLog};

/// Object-safe boxed future used by [`OverlayRenderer`].
pub type OverlayFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Renderer-issued identifier of one loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(pub u64);

/// Loading indicator presentation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingOptions {
    /// Text shown next to the spinner.
    pub message: String,
    /// Optional style class applied to the indicator.
    pub css_class: Option<String>,
}

/// Toast color/severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastSeverity {
    /// Positive outcome.
    #[default]
    Success,
    /// Failure.
    Danger,
    /// Non-blocking issue.
    Warning,
}

impl ToastSeverity {
    /// Returns the renderer color token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Warning => "warning",
        }
    }
}

/// Toast anchor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastPosition {
    /// Top of the viewport.
    #[default]
    Top,
    /// Vertically centered.
    Middle,
    /// Bottom of the viewport.
    Bottom,
}

/// Toast presentation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastOptions {
    /// Toast text.
    pub message: String,
    /// Toast color.
    pub severity: ToastSeverity,
    /// Time until the toast dismisses itself.
    pub duration_ms: u32,
    /// Anchor position.
    pub position: ToastPosition,
}

/// Alert visual mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertMode {
    /// Material design.
    #[default]
    Md,
    /// iOS design.
    Ios,
}

/// One labeled action of an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertButton {
    /// Button label.
    pub text: String,
    /// Optional role (`cancel`, `destructive`, ...).
    #[serde(default)]
    pub role: Option<String>,
}

impl AlertButton {
    /// Plain button labeled `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role: None,
        }
    }

    /// Button labeled `text` with `role`.
    pub fn with_role(text: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role: Some(role.into()),
        }
    }
}

impl From<&str> for AlertButton {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Alert presentation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertOptions {
    /// Alert text.
    pub message: String,
    /// Actions, in display order. Never empty.
    pub buttons: Vec<AlertButton>,
    /// Visual mode.
    pub mode: AlertMode,
}

/// How an alert was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// The user picked the button at `index`.
    Selected {
        /// Index into [`AlertOptions::buttons`].
        index: usize,
        /// Role of the picked button.
        role: Option<String>,
    },
    /// The alert was dismissed without picking an action (backdrop tap, hardware back).
    Dismissed,
}

/// Host service that renders overlays.
pub trait OverlayRenderer {
    /// Creates (but does not present) a loading indicator.
    fn create_loading<'a>(
        &'a self,
        options: &'a LoadingOptions,
    ) -> OverlayFuture<'a, Result<OverlayHandle, String>>;

    /// Presents a created loading indicator.
    fn present<'a>(&'a self, handle: OverlayHandle) -> OverlayFuture<'a, Result<(), String>>;

    /// Changes the message of a created loading indicator.
    fn set_loading_message<'a>(
        &'a self,
        handle: OverlayHandle,
        message: &'a str,
    ) -> OverlayFuture<'a, Result<(), String>>;

    /// Dismisses and releases a loading indicator.
    fn dismiss<'a>(&'a self, handle: OverlayHandle) -> OverlayFuture<'a, Result<(), String>>;

    /// Presents a self-dismissing toast. Resolves once the toast is shown.
    fn present_toast<'a>(
        &'a self,
        options: &'a ToastOptions,
    ) -> OverlayFuture<'a, Result<(), String>>;

    /// Presents a modal alert. Resolves once the alert is closed.
    fn present_alert<'a>(
        &'a self,
        options: &'a AlertOptions,
    ) -> OverlayFuture<'a, Result<AlertOutcome, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op renderer for headless targets. Alerts resolve as dismissed.
pub struct NoopOverlayRenderer;

impl OverlayRenderer for NoopOverlayRenderer {
    fn create_loading<'a>(
        &'a self,
        _options: &'a LoadingOptions,
    ) -> OverlayFuture<'a, Result<OverlayHandle, String>> {
        Box::pin(async { Ok(OverlayHandle(0)) })
    }

    fn present<'a>(&'a self, _handle: OverlayHandle) -> OverlayFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn set_loading_message<'a>(
        &'a self,
        _handle: OverlayHandle,
        _message: &'a str,
    ) -> OverlayFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn dismiss<'a>(&'a self, _handle: OverlayHandle) -> OverlayFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn present_toast<'a>(
        &'a self,
        _options: &'a ToastOptions,
    ) -> OverlayFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn present_alert<'a>(
        &'a self,
        _options: &'a AlertOptions,
    ) -> OverlayFuture<'a, Result<AlertOutcome, String>> {
        Box::pin(async { Ok(AlertOutcome::Dismissed) })
    }
}

#[derive(Default)]
struct HoldGate {
    held: Cell<bool>,
    wakers: RefCell<Vec<Waker>>,
}

impl HoldGate {
    fn hold(&self) {
        self.held.set(true);
    }

    fn release(&self) {
        self.held.set(false);
        for waker in self.wakers.borrow_mut().drain(..) {
            waker.wake();
        }
    }

    async fn pass(&self) {
        poll_fn(|cx| {
            if self.held.get() {
                self.wakers.borrow_mut().push(cx.waker().clone());
                Poll::Pending
            } else {
                Poll::Ready(())
            }
        })
        .await
    }
}

/// In-memory renderer that tracks which loading indicators are on screen.
///
/// Loading creation, presentation, and message updates can each be held open to exercise calls
/// that interleave with an in-flight renderer call.
#[derive(Clone, Default)]
pub struct MemoryOverlayRenderer {
    log: HostCallLog,
    next_handle: Rc<Cell<u64>>,
    on_screen: Rc<RefCell<BTreeSet<OverlayHandle>>>,
    toasts: Rc<RefCell<Vec<ToastOptions>>>,
    alerts: Rc<RefCell<Vec<AlertOptions>>>,
    alert_choice: Rc<Cell<Option<usize>>>,
    creation: Rc<HoldGate>,
    presentation: Rc<HoldGate>,
    message_updates: Rc<HoldGate>,
}

impl MemoryOverlayRenderer {
    /// Creates a renderer recording into `log`. Alerts resolve with the first button.
    pub fn new(log: HostCallLog) -> Self {
        Self {
            log,
            alert_choice: Rc::new(Cell::new(Some(0))),
            ..Self::default()
        }
    }

    /// Sets which button the simulated user picks on alerts; `None` dismisses the alert.
    pub fn answer_alerts_with(&self, choice: Option<usize>) {
        self.alert_choice.set(choice);
    }

    /// Suspends every `create_loading` call until [`Self::release_creation`] is called.
    pub fn hold_creation(&self) {
        self.creation.hold();
    }

    /// Resumes suspended `create_loading` calls.
    pub fn release_creation(&self) {
        self.creation.release();
    }

    /// Suspends every `present` call until [`Self::release_presentation`] is called.
    pub fn hold_presentation(&self) {
        self.presentation.hold();
    }

    /// Resumes suspended `present` calls.
    pub fn release_presentation(&self) {
        self.presentation.release();
    }

    /// Suspends every `set_loading_message` call until [`Self::release_message_updates`] is
    /// called.
    pub fn hold_message_updates(&self) {
        self.message_updates.hold();
    }

    /// Resumes suspended `set_loading_message` calls.
    pub fn release_message_updates(&self) {
        self.message_updates.release();
    }

    /// Returns loading indicators that are presented and not dismissed.
    pub fn on_screen(&self) -> Vec<OverlayHandle> {
        self.on_screen.borrow().iter().copied().collect()
    }

    /// Returns every toast presented so far.
    pub fn toasts(&self) -> Vec<ToastOptions> {
        self.toasts.borrow().clone()
    }

    /// Returns every alert presented so far.
    pub fn alerts(&self) -> Vec<AlertOptions> {
        self.alerts.borrow().clone()
    }
}

impl OverlayRenderer for MemoryOverlayRenderer {
    fn create_loading<'a>(
        &'a self,
        options: &'a LoadingOptions,
    ) -> OverlayFuture<'a, Result<OverlayHandle, String>> {
        Box::pin(async move {
            self.creation.pass().await;
            self.log
                .record(HostCall::CreateLoading(options.message.clone()))?;
            let handle = OverlayHandle(self.next_handle.get() + 1);
            self.next_handle.set(handle.0);
            Ok(handle)
        })
    }

    fn present<'a>(&'a self, handle: OverlayHandle) -> OverlayFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.presentation.pass().await;
            self.log.record(HostCall::PresentLoading(handle))?;
            self.on_screen.borrow_mut().insert(handle);
            Ok(())
        })
    }

    fn set_loading_message<'a>(
        &'a self,
        handle: OverlayHandle,
        message: &'a str,
    ) -> OverlayFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.message_updates.pass().await;
            self.log
                .record(HostCall::SetLoadingMessage(handle, message.to_string()))
        })
    }

    fn dismiss<'a>(&'a self, handle: OverlayHandle) -> OverlayFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.log.record(HostCall::DismissLoading(handle))?;
            self.on_screen.borrow_mut().remove(&handle);
            Ok(())
        })
    }

    fn present_toast<'a>(
        &'a self,
        options: &'a ToastOptions,
    ) -> OverlayFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.log
                .record(HostCall::PresentToast(options.message.clone()))?;
            self.toasts.borrow_mut().push(options.clone());
            Ok(())
        })
    }

    fn present_alert<'a>(
        &'a self,
        options: &'a AlertOptions,
    ) -> OverlayFuture<'a, Result<AlertOutcome, String>> {
        Box::pin(async move {
            self.log
                .record(HostCall::PresentAlert(options.message.clone()))?;
            self.alerts.borrow_mut().push(options.clone());
            Ok(match self.alert_choice.get() {
                Some(index) if index < options.buttons.len() => AlertOutcome::Selected {
                    index,
                    role: options.buttons[index].role.clone(),
                },
                _ => AlertOutcome::Dismissed,
            })
        })
    }
}
