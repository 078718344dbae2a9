//! Long-lived router and connectivity observers.

use std::{cell::Cell, rc::Rc};

use leptos::logging;
use platform_host::{ConnectivityService, NavigationService, NetworkStatus, RouteChange};

use crate::{startup::StartupStep, ReadyToken, ShellError};

/// Subscriber notified on every completed navigation.
pub type RouteObserver = Rc<dyn Fn(&RouteChange)>;

/// Subscriber notified on every online/offline transition.
pub type ConnectivitySubscriber = Rc<dyn Fn(&NetworkStatus)>;

/// Logs every navigation and forwards it to `observer`.
///
/// # Errors
///
/// Returns [`ShellError::StartupStepFailure`] when the router event stream is unavailable.
pub fn install_route_monitor(
    navigation: &dyn NavigationService,
    observer: Option<RouteObserver>,
    _ready: &ReadyToken,
) -> Result<(), ShellError> {
    navigation
        .on_route_change(Rc::new(move |change: &RouteChange| {
            logging::log!("navigated to {} (#{})", change.url, change.id);
            if let Some(observer) = &observer {
                observer(change);
            }
        }))
        .map_err(|reason| ShellError::StartupStepFailure {
            step: StartupStep::RouteMonitor,
            reason,
        })
}

/// Tracks reachability and notifies `subscriber` only when it flips between online and offline.
///
/// The host's status at install time is the baseline, so an initial report that matches it is
/// not a transition.
///
/// # Errors
///
/// Returns [`ShellError::StartupStepFailure`] when the connectivity event source is unavailable.
pub fn install_connectivity_monitor(
    connectivity: &dyn ConnectivityService,
    subscriber: Option<ConnectivitySubscriber>,
    _ready: &ReadyToken,
) -> Result<(), ShellError> {
    let online = Rc::new(Cell::new(connectivity.current_status().connected));
    connectivity
        .on_status_change(Rc::new(move |status: &NetworkStatus| {
            if online.replace(status.connected) == status.connected {
                return;
            }
            if status.connected {
                logging::log!("network online ({})", status.connection_type);
            } else {
                logging::warn!("network offline");
            }
            if let Some(subscriber) = &subscriber {
                subscriber(status);
            }
        }))
        .map_err(|reason| ShellError::StartupStepFailure {
            step: StartupStep::ConnectivityMonitor,
            reason,
        })
}
