//! Error taxonomy for the shell core.

use platform_host::PushEvent;
use thiserror::Error;

use crate::startup::StartupStep;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures surfaced by the shell core.
///
/// Only [`ShellError::PermissionDenied`] is a hard failure for its caller. Listener, device-chrome,
/// and observer failures are isolated per step and collected into reports.
pub enum ShellError {
    /// The user declined a capability that was requested. Not retried within the session.
    #[error("{capability} permission denied")]
    PermissionDenied {
        /// Capability that was declined.
        capability: &'static str,
    },
    /// One push listener type could not be attached.
    #[error("attaching `{event}` listener failed: {reason}")]
    ListenerAttachFailure {
        /// Event whose listener failed.
        event: PushEvent,
        /// Host error text.
        reason: String,
    },
    /// A status-bar or edge-to-edge call failed.
    #[error("device chrome step `{step}` failed: {reason}")]
    DeviceChromeConfigFailure {
        /// Device-chrome step that failed.
        step: StartupStep,
        /// Host error text.
        reason: String,
    },
    /// A back-button or observer installation step failed.
    #[error("startup step `{step}` failed: {reason}")]
    StartupStepFailure {
        /// Step that failed.
        step: StartupStep,
        /// Host error text.
        reason: String,
    },
    /// `show_loading` was called while a loading indicator was active under the reject policy.
    #[error("a loading indicator is already active")]
    LoadingAlreadyActive,
    /// `run` was called on an orchestrator that already started.
    #[error("startup already ran")]
    StartupAlreadyRan,
    /// Any other host capability failure.
    #[error("{operation} failed: {reason}")]
    Host {
        /// Host operation name.
        operation: &'static str,
        /// Host error text.
        reason: String,
    },
    /// Shell configuration could not be parsed.
    #[error("invalid shell config: {0}")]
    InvalidConfig(String),
}

impl ShellError {
    /// Returns a mapper turning a host error string into [`ShellError::Host`] for `operation`.
    pub fn host(operation: &'static str) -> impl FnOnce(String) -> Self {
        move |reason| Self::Host { operation, reason }
    }
}
