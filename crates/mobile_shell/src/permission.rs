//! Notification permission state machine.

use std::{cell::Cell, rc::Rc};

use platform_host::{PermissionStatus, PushNotificationService};

use crate::ShellError;

const NOTIFICATIONS: &str = "notifications";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Session view of the notification permission.
pub enum PermissionState {
    /// Not observed yet.
    #[default]
    Unknown,
    /// The user can still be asked.
    Prompt,
    /// The user allowed the capability.
    Granted,
    /// The user declined the capability.
    Denied,
}

impl PermissionState {
    /// Maps a host permission report.
    pub const fn from_status(status: PermissionStatus) -> Self {
        match status {
            PermissionStatus::Prompt | PermissionStatus::PromptWithRationale => Self::Prompt,
            PermissionStatus::Granted => Self::Granted,
            PermissionStatus::Denied => Self::Denied,
        }
    }

    /// Returns whether the user already decided.
    pub const fn is_decided(self) -> bool {
        matches!(self, Self::Granted | Self::Denied)
    }

    // Once decided, the session never falls back to an undecided state.
    const fn settle(self, observed: Self) -> Self {
        if self.is_decided() && !observed.is_decided() {
            self
        } else {
            observed
        }
    }
}

/// Gate that checks and requests notification consent without redundant prompts.
pub struct PermissionGate {
    push: Rc<dyn PushNotificationService>,
    state: Cell<PermissionState>,
}

impl PermissionGate {
    /// Creates a gate over the host push channel.
    pub fn new(push: Rc<dyn PushNotificationService>) -> Self {
        Self {
            push,
            state: Cell::new(PermissionState::Unknown),
        }
    }

    /// Returns the last state observed this session without calling the host.
    pub fn last_known(&self) -> PermissionState {
        self.state.get()
    }

    /// Reads the current permission. Never prompts.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Host`] when the host cannot report the permission.
    pub async fn check(&self) -> Result<PermissionState, ShellError> {
        let status = self
            .push
            .check_permissions()
            .await
            .map_err(ShellError::host("push.check_permissions"))?;
        Ok(self.observe(PermissionState::from_status(status)))
    }

    /// Prompts the user only while the permission is undecided; otherwise returns the decision.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Host`] when the host check or prompt fails.
    pub async fn request(&self) -> Result<PermissionState, ShellError> {
        let current = self.check().await?;
        if current.is_decided() {
            return Ok(current);
        }
        self.prompt().await
    }

    /// Makes sure the user granted notifications, prompting at most once.
    ///
    /// Callers must go through this before enrolling the device for push delivery.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::PermissionDenied`] when the resulting state is not granted, or
    /// [`ShellError::Host`] when the host check or prompt fails.
    pub async fn ensure_granted(&self) -> Result<PermissionState, ShellError> {
        let mut state = self.check().await?;
        if !state.is_decided() {
            state = self.prompt().await?;
        }
        if state != PermissionState::Granted {
            return Err(ShellError::PermissionDenied {
                capability: NOTIFICATIONS,
            });
        }
        Ok(state)
    }

    async fn prompt(&self) -> Result<PermissionState, ShellError> {
        let status = self
            .push
            .request_permissions()
            .await
            .map_err(ShellError::host("push.request_permissions"))?;
        Ok(self.observe(PermissionState::from_status(status)))
    }

    fn observe(&self, observed: PermissionState) -> PermissionState {
        let next = self.state.get().settle(observed);
        self.state.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{HostCall, HostCallLog, MemoryPushNotificationService};
    use pretty_assertions::assert_eq;

    use super::*;

    fn gate(
        permission: PermissionStatus,
        answer: PermissionStatus,
    ) -> (PermissionGate, MemoryPushNotificationService, HostCallLog) {
        let log = HostCallLog::default();
        let push = MemoryPushNotificationService::new(log.clone(), permission, answer);
        (PermissionGate::new(Rc::new(push.clone())), push, log)
    }

    fn prompts(log: &HostCallLog) -> usize {
        log.count(|call| *call == HostCall::RequestPermissions)
    }

    #[test]
    fn check_is_read_only() {
        let (gate, _, log) = gate(PermissionStatus::Prompt, PermissionStatus::Granted);

        assert_eq!(block_on(gate.check()).expect("check"), PermissionState::Prompt);
        assert_eq!(prompts(&log), 0);
    }

    #[test]
    fn ensure_granted_prompts_exactly_once_from_prompt() {
        let (gate, _, log) = gate(
            PermissionStatus::PromptWithRationale,
            PermissionStatus::Granted,
        );

        assert_eq!(
            block_on(gate.ensure_granted()).expect("granted"),
            PermissionState::Granted
        );
        assert_eq!(prompts(&log), 1);
    }

    #[test]
    fn ensure_granted_never_prompts_when_decided() {
        for (status, expected_ok) in [
            (PermissionStatus::Granted, true),
            (PermissionStatus::Denied, false),
        ] {
            let (gate, _, log) = gate(status, PermissionStatus::Granted);
            let result = block_on(gate.ensure_granted());

            assert_eq!(result.is_ok(), expected_ok);
            assert_eq!(prompts(&log), 0);
        }
    }

    #[test]
    fn declined_prompt_fails_with_permission_denied() {
        let (gate, _, _) = gate(PermissionStatus::Prompt, PermissionStatus::Denied);

        assert_eq!(
            block_on(gate.ensure_granted()),
            Err(ShellError::PermissionDenied {
                capability: "notifications"
            })
        );
        assert_eq!(gate.last_known(), PermissionState::Denied);
    }

    #[test]
    fn request_returns_existing_decision_without_prompting() {
        let (gate, _, log) = gate(PermissionStatus::Denied, PermissionStatus::Granted);

        assert_eq!(block_on(gate.request()).expect("request"), PermissionState::Denied);
        assert_eq!(prompts(&log), 0);
    }

    #[test]
    fn request_from_prompt_asks_the_user_exactly_once() {
        let (gate, _, log) = gate(PermissionStatus::Prompt, PermissionStatus::Granted);

        assert_eq!(block_on(gate.request()).expect("request"), PermissionState::Granted);
        assert_eq!(block_on(gate.request()).expect("repeat"), PermissionState::Granted);
        assert_eq!(prompts(&log), 1);
        assert_eq!(gate.last_known(), PermissionState::Granted);
    }

    #[test]
    fn decided_state_never_regresses_to_undecided() {
        let (gate, push, log) = gate(PermissionStatus::Prompt, PermissionStatus::Denied);
        block_on(gate.ensure_granted()).expect_err("denied");

        push.set_permission(PermissionStatus::Prompt);

        assert_eq!(block_on(gate.check()).expect("check"), PermissionState::Denied);
        block_on(gate.ensure_granted()).expect_err("still denied");
        assert_eq!(prompts(&log), 1);
    }

    #[test]
    fn host_failure_surfaces_as_host_error() {
        let (gate, _, log) = gate(PermissionStatus::Prompt, PermissionStatus::Granted);
        log.fail_operation("push.check_permissions");

        assert!(matches!(
            block_on(gate.check()),
            Err(ShellError::Host {
                operation: "push.check_permissions",
                ..
            })
        ));
        assert_eq!(gate.last_known(), PermissionState::Unknown);
    }
}
