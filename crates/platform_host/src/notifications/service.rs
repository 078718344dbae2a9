//! Push-notification service contracts and adapters.

use std::{
    cell::{Cell, RefCell},
    future::Future,
    pin::Pin,
    rc::Rc,
};

use super::types::{
    ListenerHandle, PermissionStatus, PushEvent, PushListener, PushNotification, PushPayload,
    PushToken,
};
use crate::{HostCall, HostCallLog};

/// Object-safe boxed future used by [`PushNotificationService`].
pub type NotificationFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for the push-notification channel.
pub trait PushNotificationService {
    /// Attaches `listener` to `event`. Attaching twice delivers every event twice.
    fn add_listener<'a>(
        &'a self,
        event: PushEvent,
        listener: PushListener,
    ) -> NotificationFuture<'a, Result<ListenerHandle, String>>;

    /// Reads the current notification permission without prompting.
    fn check_permissions<'a>(&'a self) -> NotificationFuture<'a, Result<PermissionStatus, String>>;

    /// Shows the consent prompt and returns the resulting permission.
    fn request_permissions<'a>(
        &'a self,
    ) -> NotificationFuture<'a, Result<PermissionStatus, String>>;

    /// Enrolls the device for push delivery. The token arrives on [`PushEvent::Registration`].
    fn register<'a>(&'a self) -> NotificationFuture<'a, Result<(), String>>;

    /// Lists notifications currently shown in the system notification center.
    fn delivered_notifications<'a>(
        &'a self,
    ) -> NotificationFuture<'a, Result<Vec<PushNotification>, String>>;

    /// Removes every delivered notification from the system notification center.
    fn remove_all_delivered<'a>(&'a self) -> NotificationFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op push service for targets without a push channel. Permission is always denied.
pub struct NoopPushNotificationService;

impl PushNotificationService for NoopPushNotificationService {
    fn add_listener<'a>(
        &'a self,
        _event: PushEvent,
        _listener: PushListener,
    ) -> NotificationFuture<'a, Result<ListenerHandle, String>> {
        Box::pin(async { Ok(ListenerHandle(0)) })
    }

    fn check_permissions<'a>(&'a self) -> NotificationFuture<'a, Result<PermissionStatus, String>> {
        Box::pin(async { Ok(PermissionStatus::Denied) })
    }

    fn request_permissions<'a>(
        &'a self,
    ) -> NotificationFuture<'a, Result<PermissionStatus, String>> {
        Box::pin(async { Ok(PermissionStatus::Denied) })
    }

    fn register<'a>(&'a self) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delivered_notifications<'a>(
        &'a self,
    ) -> NotificationFuture<'a, Result<Vec<PushNotification>, String>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn remove_all_delivered<'a>(&'a self) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

/// In-memory push channel with a scripted permission flow.
///
/// `register` emits a [`PushEvent::Registration`] token to attached listeners, mirroring the
/// native channel.
#[derive(Clone)]
pub struct MemoryPushNotificationService {
    log: HostCallLog,
    permission: Rc<Cell<PermissionStatus>>,
    prompt_answer: Rc<Cell<PermissionStatus>>,
    listeners: Rc<RefCell<Vec<(PushEvent, PushListener)>>>,
    delivered: Rc<RefCell<Vec<PushNotification>>>,
    next_handle: Rc<Cell<u64>>,
}

impl MemoryPushNotificationService {
    /// Creates a push channel whose permission starts at `permission` and whose consent prompt
    /// answers `prompt_answer`.
    pub fn new(
        log: HostCallLog,
        permission: PermissionStatus,
        prompt_answer: PermissionStatus,
    ) -> Self {
        Self {
            log,
            permission: Rc::new(Cell::new(permission)),
            prompt_answer: Rc::new(Cell::new(prompt_answer)),
            listeners: Rc::default(),
            delivered: Rc::default(),
            next_handle: Rc::new(Cell::new(1)),
        }
    }

    /// Returns the permission currently held by the host.
    pub fn permission(&self) -> PermissionStatus {
        self.permission.get()
    }

    /// Overrides the host permission, as if changed from system settings.
    pub fn set_permission(&self, permission: PermissionStatus) {
        self.permission.set(permission);
    }

    /// Returns how many listeners are attached to `event`.
    pub fn listener_count(&self, event: PushEvent) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(attached, _)| *attached == event)
            .count()
    }

    /// Delivers `payload` to every listener attached to its event and returns the delivery count.
    pub fn emit(&self, payload: PushPayload) -> usize {
        let event = payload.event();
        let targets: Vec<PushListener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(attached, _)| *attached == event)
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in &targets {
            listener(payload.clone());
        }
        targets.len()
    }

    /// Adds `notification` to the notification center and emits it to foreground listeners.
    pub fn deliver(&self, notification: PushNotification) -> usize {
        self.delivered.borrow_mut().push(notification.clone());
        self.emit(PushPayload::NotificationReceived(notification))
    }
}

impl PushNotificationService for MemoryPushNotificationService {
    fn add_listener<'a>(
        &'a self,
        event: PushEvent,
        listener: PushListener,
    ) -> NotificationFuture<'a, Result<ListenerHandle, String>> {
        Box::pin(async move {
            self.log.record(HostCall::AddListener(event))?;
            self.listeners.borrow_mut().push((event, listener));
            let handle = self.next_handle.get();
            self.next_handle.set(handle + 1);
            Ok(ListenerHandle(handle))
        })
    }

    fn check_permissions<'a>(&'a self) -> NotificationFuture<'a, Result<PermissionStatus, String>> {
        Box::pin(async move {
            self.log.record(HostCall::CheckPermissions)?;
            Ok(self.permission.get())
        })
    }

    fn request_permissions<'a>(
        &'a self,
    ) -> NotificationFuture<'a, Result<PermissionStatus, String>> {
        Box::pin(async move {
            self.log.record(HostCall::RequestPermissions)?;
            if matches!(
                self.permission.get(),
                PermissionStatus::Prompt | PermissionStatus::PromptWithRationale
            ) {
                self.permission.set(self.prompt_answer.get());
            }
            Ok(self.permission.get())
        })
    }

    fn register<'a>(&'a self) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.log.record(HostCall::Register)?;
            self.emit(PushPayload::Registration(PushToken {
                value: "memory-device-token".to_string(),
            }));
            Ok(())
        })
    }

    fn delivered_notifications<'a>(
        &'a self,
    ) -> NotificationFuture<'a, Result<Vec<PushNotification>, String>> {
        Box::pin(async move {
            self.log.record(HostCall::DeliveredNotifications)?;
            Ok(self.delivered.borrow().clone())
        })
    }

    fn remove_all_delivered<'a>(&'a self) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.log.record(HostCall::RemoveAllDelivered)?;
            self.delivered.borrow_mut().clear();
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    fn counting_listener(counter: &Rc<Cell<usize>>) -> PushListener {
        let counter = counter.clone();
        Rc::new(move |_payload| counter.set(counter.get() + 1))
    }

    #[test]
    fn memory_push_prompt_applies_scripted_answer_once() {
        let log = HostCallLog::default();
        let push = MemoryPushNotificationService::new(
            log.clone(),
            PermissionStatus::Prompt,
            PermissionStatus::Granted,
        );

        assert_eq!(
            block_on(push.request_permissions()).expect("request"),
            PermissionStatus::Granted
        );
        push.set_permission(PermissionStatus::Denied);
        assert_eq!(
            block_on(push.request_permissions()).expect("request"),
            PermissionStatus::Denied
        );
    }

    #[test]
    fn memory_push_register_emits_token_to_registration_listeners() {
        let push = MemoryPushNotificationService::new(
            HostCallLog::default(),
            PermissionStatus::Granted,
            PermissionStatus::Granted,
        );
        let tokens = Rc::new(Cell::new(0));
        let received = Rc::new(Cell::new(0));

        block_on(push.add_listener(PushEvent::Registration, counting_listener(&tokens)))
            .expect("attach registration");
        block_on(push.add_listener(PushEvent::NotificationReceived, counting_listener(&received)))
            .expect("attach received");
        block_on(push.register()).expect("register");

        assert_eq!(tokens.get(), 1);
        assert_eq!(received.get(), 0);
        assert_eq!(push.listener_count(PushEvent::Registration), 1);
    }

    #[test]
    fn memory_push_delivered_list_and_clear() {
        let push = MemoryPushNotificationService::new(
            HostCallLog::default(),
            PermissionStatus::Granted,
            PermissionStatus::Granted,
        );
        push.deliver(PushNotification {
            id: "1".to_string(),
            ..PushNotification::default()
        });

        assert_eq!(block_on(push.delivered_notifications()).expect("list").len(), 1);
        block_on(push.remove_all_delivered()).expect("clear");
        assert!(block_on(push.delivered_notifications())
            .expect("list")
            .is_empty());
    }

    #[test]
    fn noop_push_service_denies_and_is_empty() {
        let push = NoopPushNotificationService;
        let push_obj: &dyn PushNotificationService = &push;
        assert_eq!(
            block_on(push_obj.check_permissions()).expect("check"),
            PermissionStatus::Denied
        );
        assert!(block_on(push_obj.delivered_notifications())
            .expect("list")
            .is_empty());
        block_on(push_obj.remove_all_delivered()).expect("clear");
    }
}
