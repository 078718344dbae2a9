//! Connectivity contracts.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{HostCall, HostCallLog};

/// Network status snapshot reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    /// Whether any network is reachable.
    pub connected: bool,
    /// Host connection type token (`wifi`, `cellular`, `none`, `unknown`).
    pub connection_type: String,
}

impl NetworkStatus {
    /// Reachable network of `connection_type`.
    pub fn online(connection_type: &str) -> Self {
        Self {
            connected: true,
            connection_type: connection_type.to_string(),
        }
    }

    /// No reachable network.
    pub fn offline() -> Self {
        Self {
            connected: false,
            connection_type: "none".to_string(),
        }
    }
}

/// Handler invoked for every host network status event.
pub type NetworkStatusHandler = Rc<dyn Fn(&NetworkStatus)>;

/// Host service for network reachability.
pub trait ConnectivityService {
    /// Returns the current network status.
    fn current_status(&self) -> NetworkStatus;

    /// Installs `handler` for every status event for the process lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error when the host has no connectivity event source.
    fn on_status_change(&self, handler: NetworkStatusHandler) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op connectivity service that always reports an unknown online network.
pub struct NoopConnectivityService;

impl ConnectivityService for NoopConnectivityService {
    fn current_status(&self) -> NetworkStatus {
        NetworkStatus::online("unknown")
    }

    fn on_status_change(&self, _handler: NetworkStatusHandler) -> Result<(), String> {
        Ok(())
    }
}

/// In-memory connectivity source with scriptable status events.
#[derive(Clone)]
pub struct MemoryConnectivityService {
    log: HostCallLog,
    status: Rc<RefCell<NetworkStatus>>,
    handlers: Rc<RefCell<Vec<NetworkStatusHandler>>>,
}

impl MemoryConnectivityService {
    /// Creates a connectivity source starting at `status`.
    pub fn new(log: HostCallLog, status: NetworkStatus) -> Self {
        Self {
            log,
            status: Rc::new(RefCell::new(status)),
            handlers: Rc::default(),
        }
    }

    /// Sets the host status and emits it to every handler, even when unchanged.
    pub fn set_status(&self, status: NetworkStatus) {
        *self.status.borrow_mut() = status.clone();
        let handlers: Vec<NetworkStatusHandler> = self.handlers.borrow().clone();
        for handler in &handlers {
            handler(&status);
        }
    }

    /// Returns the number of installed handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl ConnectivityService for MemoryConnectivityService {
    fn current_status(&self) -> NetworkStatus {
        self.status.borrow().clone()
    }

    fn on_status_change(&self, handler: NetworkStatusHandler) -> Result<(), String> {
        self.log.record(HostCall::OnNetworkStatusChange)?;
        self.handlers.borrow_mut().push(handler);
        Ok(())
    }
}
