//! Push-notification domain contracts and lightweight test adapters.

mod service;
mod types;

pub use service::{
    MemoryPushNotificationService, NoopPushNotificationService, NotificationFuture,
    PushNotificationService,
};
pub use types::{
    ListenerHandle, NotificationAction, PermissionStatus, PushEvent, PushListener,
    PushNotification, PushPayload, PushToken,
};
