//! Push-notification models shared by host adapters and the shell core.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed set of push channel events a listener can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PushEvent {
    /// Device enrollment produced a delivery token.
    Registration,
    /// Device enrollment failed.
    RegistrationError,
    /// A notification arrived while the app was in the foreground.
    NotificationReceived,
    /// The user tapped or acted on a notification.
    NotificationActionPerformed,
}

impl PushEvent {
    /// Every push event, in attachment order.
    pub const ALL: [Self; 4] = [
        Self::Registration,
        Self::RegistrationError,
        Self::NotificationReceived,
        Self::NotificationActionPerformed,
    ];

    /// Returns the host channel event name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::RegistrationError => "registrationError",
            Self::NotificationReceived => "pushNotificationReceived",
            Self::NotificationActionPerformed => "pushNotificationActionPerformed",
        }
    }
}

impl std::fmt::Display for PushEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification permission as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionStatus {
    /// The user has not been asked yet.
    Prompt,
    /// The user has not been asked yet and the host wants a rationale shown first.
    PromptWithRationale,
    /// The user allowed notifications.
    Granted,
    /// The user declined notifications.
    Denied,
}

/// Delivery token issued to this device by the push backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushToken {
    /// Opaque token value.
    pub value: String,
}

/// Push notification payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushNotification {
    /// Host-assigned notification id.
    pub id: String,
    /// Optional title.
    #[serde(default)]
    pub title: Option<String>,
    /// Optional body text.
    #[serde(default)]
    pub body: Option<String>,
    /// Arbitrary data attached by the sender.
    #[serde(default)]
    pub data: Value,
}

/// User action performed on a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAction {
    /// Action identifier (`tap` for the default action).
    pub action_id: String,
    /// Text entered by the user for input actions.
    #[serde(default)]
    pub input_value: Option<String>,
    /// Notification the action was performed on.
    pub notification: PushNotification,
}

/// Event payload delivered to a [`PushListener`].
#[derive(Debug, Clone, PartialEq)]
pub enum PushPayload {
    /// Payload of [`PushEvent::Registration`].
    Registration(PushToken),
    /// Payload of [`PushEvent::RegistrationError`].
    RegistrationError(String),
    /// Payload of [`PushEvent::NotificationReceived`].
    NotificationReceived(PushNotification),
    /// Payload of [`PushEvent::NotificationActionPerformed`].
    NotificationActionPerformed(NotificationAction),
}

impl PushPayload {
    /// Returns the event this payload belongs to.
    pub const fn event(&self) -> PushEvent {
        match self {
            Self::Registration(_) => PushEvent::Registration,
            Self::RegistrationError(_) => PushEvent::RegistrationError,
            Self::NotificationReceived(_) => PushEvent::NotificationReceived,
            Self::NotificationActionPerformed(_) => PushEvent::NotificationActionPerformed,
        }
    }
}

/// Callback invoked by the host for one push event.
pub type PushListener = Rc<dyn Fn(PushPayload)>;

/// Host-issued identifier for an attached listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);
