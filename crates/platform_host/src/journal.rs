//! Shared host-call journal used by the in-memory capability adapters.
//!
//! Every `Memory*` adapter in this crate records the host operations it receives into a
//! [`HostCallLog`]. Cloning the log shares the same journal, so one log can be handed to every
//! adapter in a [`crate::HostServices`] bundle and then inspected for call order and counts.

use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use crate::{OverlayHandle, PushEvent, StatusBarStyle, ThemePalette};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One host capability invocation observed by an in-memory adapter.
pub enum HostCall {
    /// `PlatformService::ready` was awaited.
    PlatformReady,
    /// A theme palette was applied.
    ApplyPalette(ThemePalette),
    /// Status-bar overlay mode changed.
    SetOverlaysWebView(bool),
    /// Status-bar style changed.
    SetStatusBarStyle(StatusBarStyle),
    /// Edge-to-edge compatibility shim was disabled.
    DisableEdgeToEdge,
    /// A push listener was attached.
    AddListener(PushEvent),
    /// Notification permission status was read.
    CheckPermissions,
    /// The user-facing notification consent prompt was shown.
    RequestPermissions,
    /// The device was enrolled for push delivery.
    Register,
    /// Delivered notifications were listed.
    DeliveredNotifications,
    /// Delivered notifications were cleared.
    RemoveAllDelivered,
    /// A back-button handler was installed with the given priority.
    OnBackButton(i32),
    /// A router-change handler was installed.
    OnRouteChange,
    /// A connectivity handler was installed.
    OnNetworkStatusChange,
    /// The navigation stack was popped.
    NavigateBack,
    /// The app was sent to the background.
    MinimizeApp,
    /// A loading indicator was created with the given message.
    CreateLoading(String),
    /// A loading indicator was presented.
    PresentLoading(OverlayHandle),
    /// A live loading indicator was retargeted to a new message.
    SetLoadingMessage(OverlayHandle, String),
    /// A loading indicator was dismissed.
    DismissLoading(OverlayHandle),
    /// A toast was presented with the given message.
    PresentToast(String),
    /// An alert was presented with the given message.
    PresentAlert(String),
}

impl HostCall {
    /// Returns a stable operation name used for diagnostics and failure injection.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::PlatformReady => "platform.ready",
            Self::ApplyPalette(_) => "theme.apply_palette",
            Self::SetOverlaysWebView(_) => "status_bar.set_overlays_web_view",
            Self::SetStatusBarStyle(_) => "status_bar.set_style",
            Self::DisableEdgeToEdge => "edge_to_edge.disable",
            Self::AddListener(event) => match event {
                PushEvent::Registration => "push.add_listener.registration",
                PushEvent::RegistrationError => "push.add_listener.registrationError",
                PushEvent::NotificationReceived => "push.add_listener.pushNotificationReceived",
                PushEvent::NotificationActionPerformed => {
                    "push.add_listener.pushNotificationActionPerformed"
                }
            },
            Self::CheckPermissions => "push.check_permissions",
            Self::RequestPermissions => "push.request_permissions",
            Self::Register => "push.register",
            Self::DeliveredNotifications => "push.delivered_notifications",
            Self::RemoveAllDelivered => "push.remove_all_delivered",
            Self::OnBackButton(_) => "navigation.on_back_button",
            Self::OnRouteChange => "navigation.on_route_change",
            Self::OnNetworkStatusChange => "connectivity.on_status_change",
            Self::NavigateBack => "navigation.navigate_back",
            Self::MinimizeApp => "navigation.minimize_app",
            Self::CreateLoading(_) => "overlay.create_loading",
            Self::PresentLoading(_) => "overlay.present",
            Self::SetLoadingMessage(..) => "overlay.set_loading_message",
            Self::DismissLoading(_) => "overlay.dismiss",
            Self::PresentToast(_) => "overlay.present_toast",
            Self::PresentAlert(_) => "overlay.present_alert",
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Shared, clonable journal of host calls with per-operation failure injection.
pub struct HostCallLog {
    calls: Rc<RefCell<Vec<HostCall>>>,
    failing: Rc<RefCell<BTreeSet<&'static str>>>,
}

impl HostCallLog {
    /// Records an infallible host call.
    pub fn note(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }

    /// Records a fallible host call and reports the injected failure for its operation, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when [`HostCallLog::fail_operation`] was called for this operation.
    pub fn record(&self, call: HostCall) -> Result<(), String> {
        let operation = call.operation();
        self.note(call);
        if self.failing.borrow().contains(operation) {
            return Err(format!("{operation} failed"));
        }
        Ok(())
    }

    /// Makes every subsequent call of `operation` fail.
    pub fn fail_operation(&self, operation: &'static str) {
        self.failing.borrow_mut().insert(operation);
    }

    /// Clears an injected failure for `operation`.
    pub fn heal_operation(&self, operation: &'static str) {
        self.failing.borrow_mut().remove(operation);
    }

    /// Returns a snapshot of every recorded call in order.
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    /// Counts recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    /// Returns the index of the first recorded call equal to `call`.
    pub fn position(&self, call: &HostCall) -> Option<usize> {
        self.calls.borrow().iter().position(|recorded| recorded == call)
    }

    /// Drops every recorded call while keeping injected failures.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_journal() {
        let log = HostCallLog::default();
        let other = log.clone();

        other.note(HostCall::PlatformReady);
        log.note(HostCall::Register);

        assert_eq!(log.calls(), vec![HostCall::PlatformReady, HostCall::Register]);
        assert_eq!(other.position(&HostCall::Register), Some(1));
    }

    #[test]
    fn injected_failures_still_record_the_attempt() {
        let log = HostCallLog::default();
        log.fail_operation("push.register");

        let err = log.record(HostCall::Register).expect_err("register fails");
        assert_eq!(err, "push.register failed");
        assert_eq!(log.count(|call| *call == HostCall::Register), 1);

        log.heal_operation("push.register");
        log.record(HostCall::Register).expect("register heals");
    }
}
