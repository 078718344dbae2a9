//! Push listener registration, device enrollment, and notification-center pass-throughs.

use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use leptos::logging;
use platform_host::{
    NotificationAction, PushEvent, PushListener, PushNotification, PushNotificationService,
    PushPayload, PushToken,
};

use crate::{PermissionGate, ReadyToken, ShellError};

/// External collaborator receiving push events after they are logged.
///
/// The device token is handed over here; this crate never transmits it anywhere. Every method
/// defaults to doing nothing.
pub trait PushEventSink {
    /// Receives the delivery token issued after enrollment.
    fn on_token(&self, _token: &PushToken) {}

    /// Receives an enrollment failure.
    fn on_registration_error(&self, _error: &str) {}

    /// Receives a notification that arrived in the foreground.
    fn on_notification(&self, _notification: &PushNotification) {}

    /// Receives a user action on a notification.
    fn on_action(&self, _action: &NotificationAction) {}
}

#[derive(Debug, Clone, Copy, Default)]
/// Sink that only relies on the registry's logging.
pub struct NoopPushEventSink;

impl PushEventSink for NoopPushEventSink {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Outcome of one [`ListenerRegistry::attach_all`] call.
pub struct AttachReport {
    /// Events attached by this call.
    pub attached: Vec<PushEvent>,
    /// Events skipped because a listener was already attached.
    pub skipped: Vec<PushEvent>,
    /// One [`ShellError::ListenerAttachFailure`] per event that failed to attach.
    pub failures: Vec<ShellError>,
}

impl AttachReport {
    /// Returns whether no attachment failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owner of the push listener set and the enrollment flow.
///
/// Each push event gets at most one listener for the process lifetime.
pub struct ListenerRegistry {
    push: Rc<dyn PushNotificationService>,
    gate: PermissionGate,
    sink: Rc<dyn PushEventSink>,
    attached: RefCell<BTreeSet<PushEvent>>,
}

impl ListenerRegistry {
    /// Creates a registry over the host push channel forwarding events to `sink`.
    pub fn new(push: Rc<dyn PushNotificationService>, sink: Rc<dyn PushEventSink>) -> Self {
        Self {
            gate: PermissionGate::new(push.clone()),
            push,
            sink,
            attached: RefCell::new(BTreeSet::new()),
        }
    }

    /// Permission gate guarding enrollment.
    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    /// Returns whether a listener is attached (or being attached) for `event`.
    pub fn is_attached(&self, event: PushEvent) -> bool {
        self.attached.borrow().contains(&event)
    }

    /// Attaches one listener per push event.
    ///
    /// Events that already have a listener are skipped, so repeated calls never duplicate
    /// delivery; events whose attachment failed earlier are retried. A failing event never stops
    /// the remaining attachments.
    pub async fn attach_all(&self, _ready: &ReadyToken) -> AttachReport {
        let mut report = AttachReport::default();
        for event in PushEvent::ALL {
            // Claimed before the await so an interleaved call cannot attach the same event.
            if !self.attached.borrow_mut().insert(event) {
                report.skipped.push(event);
                continue;
            }
            match self.push.add_listener(event, self.listener()).await {
                Ok(_) => report.attached.push(event),
                Err(reason) => {
                    self.attached.borrow_mut().remove(&event);
                    logging::warn!("attaching push listener `{event}` failed: {reason}");
                    report
                        .failures
                        .push(ShellError::ListenerAttachFailure { event, reason });
                }
            }
        }
        report
    }

    /// Confirms consent and enrolls the device for push delivery.
    ///
    /// The token arrives later through the [`PushEvent::Registration`] listener.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::PermissionDenied`] without enrolling when consent is missing, or
    /// [`ShellError::Host`] when the host check, prompt, or enrollment fails.
    pub async fn request_registration(&self) -> Result<(), ShellError> {
        self.gate.ensure_granted().await?;
        self.push
            .register()
            .await
            .map_err(ShellError::host("push.register"))
    }

    /// Lists notifications currently shown in the notification center.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Host`] when the host listing fails.
    pub async fn list_delivered(&self) -> Result<Vec<PushNotification>, ShellError> {
        let delivered = self
            .push
            .delivered_notifications()
            .await
            .map_err(ShellError::host("push.delivered_notifications"))?;
        logging::log!("delivered notifications: {}", delivered.len());
        Ok(delivered)
    }

    /// Clears the notification center.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Host`] when the host clear fails.
    pub async fn clear_delivered(&self) -> Result<(), ShellError> {
        self.push
            .remove_all_delivered()
            .await
            .map_err(ShellError::host("push.remove_all_delivered"))
    }

    fn listener(&self) -> PushListener {
        let sink = self.sink.clone();
        Rc::new(move |payload| dispatch(sink.as_ref(), payload))
    }
}

fn dispatch(sink: &dyn PushEventSink, payload: PushPayload) {
    match payload {
        PushPayload::Registration(token) => {
            logging::log!("push registration token: {}", token.value);
            sink.on_token(&token);
        }
        PushPayload::RegistrationError(error) => {
            logging::error!("push registration error: {error}");
            sink.on_registration_error(&error);
        }
        PushPayload::NotificationReceived(notification) => {
            logging::log!("push notification received: {}", notification.id);
            sink.on_notification(&notification);
        }
        PushPayload::NotificationActionPerformed(action) => {
            logging::log!(
                "push notification action performed: {} on {}",
                action.action_id,
                action.notification.id
            );
            sink.on_action(&action);
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{
        HostCall, HostCallLog, MemoryPushNotificationService, NoopPlatformService,
        PermissionStatus,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        tokens: RefCell<Vec<String>>,
        notifications: RefCell<Vec<String>>,
        actions: RefCell<Vec<String>>,
    }

    impl PushEventSink for RecordingSink {
        fn on_token(&self, token: &PushToken) {
            self.tokens.borrow_mut().push(token.value.clone());
        }

        fn on_notification(&self, notification: &PushNotification) {
            self.notifications.borrow_mut().push(notification.id.clone());
        }

        fn on_action(&self, action: &NotificationAction) {
            self.actions.borrow_mut().push(action.action_id.clone());
        }
    }

    struct Fixture {
        log: HostCallLog,
        push: MemoryPushNotificationService,
        sink: Rc<RecordingSink>,
        registry: ListenerRegistry,
    }

    fn fixture(permission: PermissionStatus, answer: PermissionStatus) -> Fixture {
        let log = HostCallLog::default();
        let push = MemoryPushNotificationService::new(log.clone(), permission, answer);
        let sink = Rc::new(RecordingSink::default());
        let registry = ListenerRegistry::new(Rc::new(push.clone()), sink.clone());
        Fixture {
            log,
            push,
            sink,
            registry,
        }
    }

    fn ready() -> ReadyToken {
        block_on(ReadyToken::wait(&NoopPlatformService))
    }

    #[test]
    fn attach_all_registers_one_listener_per_event() {
        let fx = fixture(PermissionStatus::Granted, PermissionStatus::Granted);

        let report = block_on(fx.registry.attach_all(&ready()));

        assert_eq!(report.attached, PushEvent::ALL.to_vec());
        assert!(report.is_clean());
        for event in PushEvent::ALL {
            assert_eq!(fx.push.listener_count(event), 1);
        }
    }

    #[test]
    fn second_attach_all_is_a_no_op() {
        let fx = fixture(PermissionStatus::Granted, PermissionStatus::Granted);
        let token = ready();

        block_on(fx.registry.attach_all(&token));
        let second = block_on(fx.registry.attach_all(&token));

        assert!(second.attached.is_empty());
        assert_eq!(second.skipped, PushEvent::ALL.to_vec());
        for event in PushEvent::ALL {
            assert_eq!(fx.push.listener_count(event), 1);
        }
    }

    #[test]
    fn one_failing_listener_does_not_block_the_rest_and_is_retried() {
        let fx = fixture(PermissionStatus::Granted, PermissionStatus::Granted);
        fx.log
            .fail_operation("push.add_listener.pushNotificationReceived");
        let token = ready();

        let report = block_on(fx.registry.attach_all(&token));

        assert_eq!(
            report.attached,
            vec![
                PushEvent::Registration,
                PushEvent::RegistrationError,
                PushEvent::NotificationActionPerformed,
            ]
        );
        assert!(matches!(
            report.failures.as_slice(),
            [ShellError::ListenerAttachFailure {
                event: PushEvent::NotificationReceived,
                ..
            }]
        ));
        assert!(!fx.registry.is_attached(PushEvent::NotificationReceived));

        fx.log
            .heal_operation("push.add_listener.pushNotificationReceived");
        let retry = block_on(fx.registry.attach_all(&token));

        assert_eq!(retry.attached, vec![PushEvent::NotificationReceived]);
        assert_eq!(fx.push.listener_count(PushEvent::NotificationReceived), 1);
        assert_eq!(fx.push.listener_count(PushEvent::Registration), 1);
    }

    #[test]
    fn listeners_forward_payloads_to_the_sink() {
        let fx = fixture(PermissionStatus::Granted, PermissionStatus::Granted);
        block_on(fx.registry.attach_all(&ready()));

        fx.push.deliver(PushNotification {
            id: "n-1".to_string(),
            ..PushNotification::default()
        });
        fx.push
            .emit(PushPayload::NotificationActionPerformed(NotificationAction {
                action_id: "tap".to_string(),
                input_value: None,
                notification: PushNotification::default(),
            }));

        assert_eq!(*fx.sink.notifications.borrow(), vec!["n-1".to_string()]);
        assert_eq!(*fx.sink.actions.borrow(), vec!["tap".to_string()]);
    }

    #[test]
    fn accepted_prompt_enrolls_exactly_once_and_delivers_token() {
        let fx = fixture(PermissionStatus::Prompt, PermissionStatus::Granted);
        block_on(fx.registry.attach_all(&ready()));

        block_on(fx.registry.request_registration()).expect("registration");

        assert_eq!(fx.log.count(|call| *call == HostCall::Register), 1);
        assert_eq!(
            *fx.sink.tokens.borrow(),
            vec!["memory-device-token".to_string()]
        );
    }

    #[test]
    fn denied_permission_never_enrolls() {
        let fx = fixture(PermissionStatus::Denied, PermissionStatus::Granted);

        let err = block_on(fx.registry.request_registration()).expect_err("denied");

        assert_eq!(
            err,
            ShellError::PermissionDenied {
                capability: "notifications"
            }
        );
        assert_eq!(fx.log.count(|call| *call == HostCall::Register), 0);
        assert_eq!(fx.log.count(|call| *call == HostCall::RequestPermissions), 0);
    }

    #[test]
    fn delivered_pass_throughs_reflect_host_state() {
        let fx = fixture(PermissionStatus::Granted, PermissionStatus::Granted);
        fx.push.deliver(PushNotification {
            id: "a".to_string(),
            ..PushNotification::default()
        });

        let listed = block_on(fx.registry.list_delivered()).expect("list");
        assert_eq!(listed.len(), 1);
        block_on(fx.registry.clear_delivered()).expect("clear");
        assert!(block_on(fx.registry.list_delivered())
            .expect("list")
            .is_empty());
    }
}
