//! Exclusive loading indicator plus fire-and-forget toasts and alerts.

use std::{cell::RefCell, rc::Rc};

use leptos::logging;
use platform_host::{
    AlertButton, AlertOptions, AlertOutcome, LoadingOptions, OverlayHandle, OverlayRenderer,
    ToastOptions, ToastSeverity,
};

use crate::{
    config::{AlertConfig, LoadingConfig, LoadingPolicy, ToastConfig},
    ShellError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadingSlot {
    Idle,
    // Creation or presentation is in flight; no live handle yet.
    Pending {
        message: String,
        dismiss_requested: bool,
    },
    Live(OverlayHandle),
}

enum Claim {
    Fresh,
    Pending,
    Live(OverlayHandle),
}

/// Owner of the single process-wide loading indicator.
///
/// At most one loading handle is live at any time. The slot is claimed synchronously before the
/// first renderer call, so interleaved `show_loading`/`dismiss_loading` calls never create a
/// second indicator or lose a dismissal. Toasts and alerts never touch the loading slot.
pub struct OverlayService {
    renderer: Rc<dyn OverlayRenderer>,
    loading: LoadingConfig,
    toast: ToastConfig,
    alert: AlertConfig,
    slot: RefCell<LoadingSlot>,
}

impl OverlayService {
    /// Creates the service over `renderer`.
    pub fn new(
        renderer: Rc<dyn OverlayRenderer>,
        loading: LoadingConfig,
        toast: ToastConfig,
        alert: AlertConfig,
    ) -> Self {
        Self {
            renderer,
            loading,
            toast,
            alert,
            slot: RefCell::new(LoadingSlot::Idle),
        }
    }

    /// Returns the live loading handle, if one is presented.
    pub fn live_handle(&self) -> Option<OverlayHandle> {
        match *self.slot.borrow() {
            LoadingSlot::Live(handle) => Some(handle),
            _ => None,
        }
    }

    /// Returns whether a loading indicator is live or being created.
    pub fn is_loading(&self) -> bool {
        !matches!(*self.slot.borrow(), LoadingSlot::Idle)
    }

    /// Presents the loading indicator with `message`, or the configured default message.
    ///
    /// # Errors
    ///
    /// See [`OverlayService::show_loading_with`].
    pub async fn show_loading(&self, message: Option<&str>) -> Result<(), ShellError> {
        let options = LoadingOptions {
            message: message.unwrap_or(&self.loading.default_message).to_string(),
            css_class: self.loading.css_class.clone(),
        };
        self.show_loading_with(options).await
    }

    /// Presents a blocking loading indicator.
    ///
    /// When an indicator is already active, the configured [`LoadingPolicy`] decides: `Replace`
    /// retargets the active indicator to the new message, `Reject` fails.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::LoadingAlreadyActive`] under the reject policy, or
    /// [`ShellError::Host`] when the renderer fails.
    pub async fn show_loading_with(&self, options: LoadingOptions) -> Result<(), ShellError> {
        match self.claim(&options.message)? {
            Claim::Pending => return Ok(()),
            Claim::Live(handle) => {
                return self
                    .renderer
                    .set_loading_message(handle, &options.message)
                    .await
                    .map_err(ShellError::host("overlay.set_loading_message"));
            }
            Claim::Fresh => {}
        }

        let handle = match self.renderer.create_loading(&options).await {
            Ok(handle) => handle,
            Err(reason) => {
                *self.slot.borrow_mut() = LoadingSlot::Idle;
                return Err(ShellError::host("overlay.create_loading")(reason));
            }
        };

        // The slot stays `Pending` until the indicator is presented with its latest message.
        let mut shown = options.message;
        let mut presented = false;
        loop {
            let (message, dismiss_requested) = match &*self.slot.borrow() {
                LoadingSlot::Pending {
                    message,
                    dismiss_requested,
                } => (message.clone(), *dismiss_requested),
                _ => (shown.clone(), false),
            };
            if dismiss_requested {
                *self.slot.borrow_mut() = LoadingSlot::Idle;
                self.release(handle).await;
                return Ok(());
            }
            if message != shown {
                if let Err(reason) = self.renderer.set_loading_message(handle, &message).await {
                    logging::warn!("loading message update failed: {reason}");
                }
                shown = message;
                continue;
            }
            if presented {
                break;
            }
            if let Err(reason) = self.renderer.present(handle).await {
                *self.slot.borrow_mut() = LoadingSlot::Idle;
                self.release(handle).await;
                return Err(ShellError::host("overlay.present")(reason));
            }
            presented = true;
        }

        *self.slot.borrow_mut() = LoadingSlot::Live(handle);
        Ok(())
    }

    /// Dismisses the live loading indicator. Never fails; a no-op when nothing is shown.
    ///
    /// A dismissal that arrives while the indicator is still being created is applied as soon as
    /// the handle exists.
    pub async fn dismiss_loading(&self) {
        let previous = std::mem::replace(&mut *self.slot.borrow_mut(), LoadingSlot::Idle);
        match previous {
            LoadingSlot::Idle => {}
            LoadingSlot::Pending { message, .. } => {
                *self.slot.borrow_mut() = LoadingSlot::Pending {
                    message,
                    dismiss_requested: true,
                };
            }
            LoadingSlot::Live(handle) => self.release(handle).await,
        }
    }

    /// Shows a toast that dismisses itself after the configured duration.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Host`] when the renderer fails.
    pub async fn show_toast(
        &self,
        message: &str,
        severity: ToastSeverity,
    ) -> Result<(), ShellError> {
        let options = ToastOptions {
            message: message.to_string(),
            severity,
            duration_ms: self.toast.duration_ms,
            position: self.toast.position,
        };
        self.renderer
            .present_toast(&options)
            .await
            .map_err(ShellError::host("overlay.present_toast"))
    }

    /// Shows a modal alert and resolves once it closes. Empty `buttons` yields a single
    /// acknowledgement button.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Host`] when the renderer fails.
    pub async fn show_alert(
        &self,
        message: &str,
        buttons: Vec<AlertButton>,
    ) -> Result<AlertOutcome, ShellError> {
        let buttons = if buttons.is_empty() {
            vec![AlertButton::new(self.alert.default_button.clone())]
        } else {
            buttons
        };
        let options = AlertOptions {
            message: message.to_string(),
            buttons,
            mode: self.alert.mode,
        };
        self.renderer
            .present_alert(&options)
            .await
            .map_err(ShellError::host("overlay.present_alert"))
    }

    fn claim(&self, message: &str) -> Result<Claim, ShellError> {
        let mut slot = self.slot.borrow_mut();
        if *slot == LoadingSlot::Idle {
            *slot = LoadingSlot::Pending {
                message: message.to_string(),
                dismiss_requested: false,
            };
            return Ok(Claim::Fresh);
        }

        if self.loading.policy == LoadingPolicy::Reject {
            return Err(ShellError::LoadingAlreadyActive);
        }
        debug_assert!(
            !self.loading.strict,
            "show_loading called while a loading indicator is active"
        );
        logging::debug_warn!("show_loading while a loading indicator is active; retargeting it");

        match &mut *slot {
            LoadingSlot::Pending {
                message: pending,
                dismiss_requested,
            } => {
                *pending = message.to_string();
                *dismiss_requested = false;
                Ok(Claim::Pending)
            }
            LoadingSlot::Live(handle) => Ok(Claim::Live(*handle)),
            LoadingSlot::Idle => Ok(Claim::Fresh),
        }
    }

    async fn release(&self, handle: OverlayHandle) {
        if let Err(reason) = self.renderer.dismiss(handle).await {
            logging::warn!("loading dismiss failed: {reason}");
        }
    }
}
