//! Platform-ready startup pipeline.

use std::{cell::Cell, rc::Rc};

use leptos::logging;
use platform_host::{HostServices, PlatformKind};

use crate::{
    back_button::install_back_button,
    observers::{
        install_connectivity_monitor, install_route_monitor, ConnectivitySubscriber, RouteObserver,
    },
    AttachReport, ListenerRegistry, PushEventSink, ReadyToken, ShellConfig, ShellError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One step of the startup pipeline.
pub enum StartupStep {
    /// Apply the default palette.
    ApplyTheme,
    /// iOS: let the status bar overlay the web content.
    StatusBarOverlay,
    /// iOS/Android: set the status-bar style.
    StatusBarStyle,
    /// iOS: disable the edge-to-edge shim.
    DisableEdgeToEdge,
    /// Attach the push listener set.
    AttachListeners,
    /// Install the hardware back-button interceptor.
    BackButton,
    /// Start router-change observation.
    RouteMonitor,
    /// Start connectivity observation.
    ConnectivityMonitor,
}

impl StartupStep {
    /// Returns a stable step name for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplyTheme => "apply-theme",
            Self::StatusBarOverlay => "status-bar-overlay",
            Self::StatusBarStyle => "status-bar-style",
            Self::DisableEdgeToEdge => "disable-edge-to-edge",
            Self::AttachListeners => "attach-listeners",
            Self::BackButton => "back-button",
            Self::RouteMonitor => "route-monitor",
            Self::ConnectivityMonitor => "connectivity-monitor",
        }
    }
}

impl std::fmt::Display for StartupStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Ordered outcome of one startup run.
pub struct StartupReport {
    /// Platform kind decided at readiness.
    pub platform: PlatformKind,
    /// Steps that succeeded, in execution order.
    pub completed: Vec<StartupStep>,
    /// Every isolated failure, in execution order.
    pub failures: Vec<ShellError>,
    /// Push listener attachment details.
    pub listeners: AttachReport,
}

impl StartupReport {
    fn new(platform: PlatformKind) -> Self {
        Self {
            platform,
            completed: Vec::new(),
            failures: Vec::new(),
            listeners: AttachReport::default(),
        }
    }

    /// Returns whether every step succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_chrome(&mut self, step: StartupStep, result: Result<(), String>) {
        match result {
            Ok(()) => self.completed.push(step),
            Err(reason) => {
                logging::warn!("device chrome step `{step}` failed: {reason}");
                self.failures
                    .push(ShellError::DeviceChromeConfigFailure { step, reason });
            }
        }
    }

    fn record_step(&mut self, step: StartupStep, result: Result<(), ShellError>) {
        match result {
            Ok(()) => self.completed.push(step),
            Err(err) => {
                logging::warn!("startup step `{step}` failed: {err}");
                self.failures.push(err);
            }
        }
    }
}

/// Root sequencer of the shell.
///
/// [`StartupOrchestrator::run`] waits for platform readiness, then applies the theme, configures
/// device chrome for the platform, attaches push listeners, and finally installs the back-button
/// interceptor and the router and connectivity observers. Every step is its own failure domain.
pub struct StartupOrchestrator {
    host: HostServices,
    config: ShellConfig,
    listeners: Rc<ListenerRegistry>,
    route_observer: Option<RouteObserver>,
    connectivity_subscriber: Option<ConnectivitySubscriber>,
    started: Cell<bool>,
}

impl StartupOrchestrator {
    /// Creates an orchestrator over the host bundle. Push events are forwarded to `sink`.
    ///
    /// The listener registry is built on the bundle's own push service.
    pub fn new(host: HostServices, config: ShellConfig, sink: Rc<dyn PushEventSink>) -> Self {
        let listeners = Rc::new(ListenerRegistry::new(host.push.clone(), sink));
        Self {
            host,
            config,
            listeners,
            route_observer: None,
            connectivity_subscriber: None,
            started: Cell::new(false),
        }
    }

    /// Listener registry shared with code that enrolls the device or reads delivered notifications.
    pub fn listeners(&self) -> Rc<ListenerRegistry> {
        self.listeners.clone()
    }

    /// Forwards every completed navigation to `observer`.
    pub fn with_route_observer(mut self, observer: RouteObserver) -> Self {
        self.route_observer = Some(observer);
        self
    }

    /// Forwards every online/offline transition to `subscriber`.
    pub fn with_connectivity_subscriber(mut self, subscriber: ConnectivitySubscriber) -> Self {
        self.connectivity_subscriber = Some(subscriber);
        self
    }

    /// Runs the startup pipeline once.
    ///
    /// Suspends until the platform is ready; if it never becomes ready this never resolves and no
    /// step runs. Step failures are logged and collected in the report, never aborting the run.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::StartupAlreadyRan`] when called a second time.
    pub async fn run(&self) -> Result<StartupReport, ShellError> {
        if self.started.replace(true) {
            return Err(ShellError::StartupAlreadyRan);
        }

        let ready = ReadyToken::wait(self.host.platform.as_ref()).await;
        let mut report = StartupReport::new(ready.platform_kind());

        self.host.theme.apply_palette(self.config.theme);
        report.completed.push(StartupStep::ApplyTheme);

        self.configure_device_chrome(&ready, &mut report).await;

        let listeners = self.listeners.attach_all(&ready).await;
        if listeners.is_clean() {
            report.completed.push(StartupStep::AttachListeners);
        }
        report.failures.extend(listeners.failures.iter().cloned());
        report.listeners = listeners;

        report.record_step(
            StartupStep::BackButton,
            install_back_button(
                self.host.navigation.clone(),
                &self.config.back_button,
                &ready,
            ),
        );
        report.record_step(
            StartupStep::RouteMonitor,
            install_route_monitor(
                self.host.navigation.as_ref(),
                self.route_observer.clone(),
                &ready,
            ),
        );
        report.record_step(
            StartupStep::ConnectivityMonitor,
            install_connectivity_monitor(
                self.host.connectivity.as_ref(),
                self.connectivity_subscriber.clone(),
                &ready,
            ),
        );

        logging::log!(
            "startup finished on {}: {} steps completed, {} failed",
            report.platform.as_str(),
            report.completed.len(),
            report.failures.len()
        );
        Ok(report)
    }

    async fn configure_device_chrome(&self, ready: &ReadyToken, report: &mut StartupReport) {
        let style = self.config.status_bar_style;
        match ready.platform_kind() {
            PlatformKind::Ios => {
                let overlay = self.host.status_bar.set_overlays_web_view(true).await;
                report.record_chrome(StartupStep::StatusBarOverlay, overlay);
                let styled = self.host.status_bar.set_style(style).await;
                report.record_chrome(StartupStep::StatusBarStyle, styled);
                let edge = self.host.edge_to_edge.disable().await;
                report.record_chrome(StartupStep::DisableEdgeToEdge, edge);
            }
            PlatformKind::Android => {
                let styled = self.host.status_bar.set_style(style).await;
                report.record_chrome(StartupStep::StatusBarStyle, styled);
            }
            PlatformKind::Web => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::{executor::block_on, future::pending, FutureExt};
    use platform_host::{
        HostCall, MemoryHost, PermissionStatus, PlatformFuture, PlatformService, PushEvent,
        StatusBarStyle, ThemePalette,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::NoopPushEventSink;

    fn memory_host(kind: PlatformKind) -> MemoryHost {
        MemoryHost::new(kind, PermissionStatus::Granted, PermissionStatus::Granted)
    }

    fn orchestrator(host: &MemoryHost) -> StartupOrchestrator {
        StartupOrchestrator::new(
            host.services(),
            ShellConfig::default(),
            Rc::new(NoopPushEventSink),
        )
    }

    fn chrome_calls(host: &MemoryHost) -> Vec<HostCall> {
        host.log
            .calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    HostCall::SetOverlaysWebView(_)
                        | HostCall::SetStatusBarStyle(_)
                        | HostCall::DisableEdgeToEdge
                )
            })
            .collect()
    }

    #[test]
    fn each_platform_runs_only_its_chrome_branch() {
        let cases = [
            (
                PlatformKind::Ios,
                vec![
                    HostCall::SetOverlaysWebView(true),
                    HostCall::SetStatusBarStyle(StatusBarStyle::Dark),
                    HostCall::DisableEdgeToEdge,
                ],
            ),
            (
                PlatformKind::Android,
                vec![HostCall::SetStatusBarStyle(StatusBarStyle::Dark)],
            ),
            (PlatformKind::Web, Vec::new()),
        ];

        for (kind, expected) in cases {
            let host = memory_host(kind);
            let report = block_on(orchestrator(&host).run()).expect("run");

            assert_eq!(report.platform, kind);
            assert_eq!(chrome_calls(&host), expected);
            assert!(report.is_clean());
        }
    }

    #[test]
    fn theme_is_applied_right_after_readiness() {
        let host = memory_host(PlatformKind::Web);
        block_on(orchestrator(&host).run()).expect("run");

        let calls = host.log.calls();
        assert_eq!(calls[0], HostCall::PlatformReady);
        assert_eq!(calls[1], HostCall::ApplyPalette(ThemePalette::Dark));
    }

    #[test]
    fn failing_chrome_step_does_not_block_siblings_or_pipeline() {
        let host = memory_host(PlatformKind::Ios);
        host.log.fail_operation("status_bar.set_overlays_web_view");

        let report = block_on(orchestrator(&host).run()).expect("run");

        assert_eq!(
            report.failures,
            vec![ShellError::DeviceChromeConfigFailure {
                step: StartupStep::StatusBarOverlay,
                reason: "status_bar.set_overlays_web_view failed".to_string(),
            }]
        );
        assert_eq!(
            report.completed,
            vec![
                StartupStep::ApplyTheme,
                StartupStep::StatusBarStyle,
                StartupStep::DisableEdgeToEdge,
                StartupStep::AttachListeners,
                StartupStep::BackButton,
                StartupStep::RouteMonitor,
                StartupStep::ConnectivityMonitor,
            ]
        );
    }

    #[test]
    fn listener_and_observer_failures_are_isolated() {
        let host = memory_host(PlatformKind::Android);
        host.log.fail_operation("push.add_listener.registration");
        host.log.fail_operation("navigation.on_route_change");

        let report = block_on(orchestrator(&host).run()).expect("run");

        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.listeners.attached.len(), 3);
        assert!(!report.completed.contains(&StartupStep::AttachListeners));
        assert!(!report.completed.contains(&StartupStep::RouteMonitor));
        assert!(report.completed.contains(&StartupStep::BackButton));
        assert!(report.completed.contains(&StartupStep::ConnectivityMonitor));
        assert_eq!(host.connectivity.handler_count(), 1);
    }

    #[test]
    fn second_run_is_refused() {
        let host = memory_host(PlatformKind::Web);
        let orchestrator = orchestrator(&host);

        block_on(orchestrator.run()).expect("first run");
        assert_eq!(
            block_on(orchestrator.run()),
            Err(ShellError::StartupAlreadyRan)
        );
        assert_eq!(host.navigation.back_handler_count(), 1);
    }

    struct NeverReady;

    impl PlatformService for NeverReady {
        fn platform_kind(&self) -> PlatformKind {
            PlatformKind::Ios
        }

        fn ready<'a>(&'a self) -> PlatformFuture<'a, ()> {
            Box::pin(pending())
        }
    }

    #[test]
    fn platform_that_never_becomes_ready_suspends_before_any_step() {
        let host = memory_host(PlatformKind::Ios);
        let mut services = host.services();
        services.platform = Rc::new(NeverReady);
        let orchestrator =
            StartupOrchestrator::new(services, ShellConfig::default(), Rc::new(NoopPushEventSink));

        assert!(orchestrator.run().now_or_never().is_none());
        assert!(host.log.calls().is_empty());
    }

    #[test]
    fn listener_registry_uses_the_bundled_push_service() {
        let host = MemoryHost::new(
            PlatformKind::Android,
            PermissionStatus::Prompt,
            PermissionStatus::Granted,
        );
        let orchestrator = orchestrator(&host);

        block_on(orchestrator.run()).expect("run");
        block_on(orchestrator.listeners().request_registration()).expect("registration");

        for event in PushEvent::ALL {
            assert_eq!(host.push.listener_count(event), 1);
        }
        assert_eq!(host.log.count(|call| *call == HostCall::Register), 1);
    }
}
