//! Host service bundle handed to the shell core at construction time.

use std::rc::Rc;

use crate::{
    ConnectivityService, EdgeToEdgeService, HostCallLog, MemoryConnectivityService,
    MemoryNavigationService, MemoryOverlayRenderer, MemoryPlatformService,
    MemoryPushNotificationService, MemoryStatusBarService, MemoryThemeService, NavigationService,
    NetworkStatus, NoopConnectivityService, NoopNavigationService, NoopOverlayRenderer,
    NoopPlatformService, NoopPushNotificationService, NoopStatusBarService, NoopThemeService,
    OverlayRenderer, PermissionStatus, PlatformKind, PlatformService, PushNotificationService,
    StatusBarService, ThemeService,
};

/// Runtime-selected capability bundle injected into the shell core.
///
/// Adapter selection happens before this bundle is built. The bundle lives for the whole process.
#[derive(Clone)]
pub struct HostServices {
    /// Platform identity and readiness.
    pub platform: Rc<dyn PlatformService>,
    /// Document palette.
    pub theme: Rc<dyn ThemeService>,
    /// Native status bar.
    pub status_bar: Rc<dyn StatusBarService>,
    /// Edge-to-edge compatibility shim.
    pub edge_to_edge: Rc<dyn EdgeToEdgeService>,
    /// Push-notification channel.
    pub push: Rc<dyn PushNotificationService>,
    /// Router and hardware back button.
    pub navigation: Rc<dyn NavigationService>,
    /// Network reachability.
    pub connectivity: Rc<dyn ConnectivityService>,
    /// Overlay renderer.
    pub overlays: Rc<dyn OverlayRenderer>,
}

impl HostServices {
    /// Bundle of no-op adapters for headless targets.
    pub fn noop() -> Self {
        Self {
            platform: Rc::new(NoopPlatformService),
            theme: Rc::new(NoopThemeService),
            status_bar: Rc::new(NoopStatusBarService),
            edge_to_edge: Rc::new(NoopStatusBarService),
            push: Rc::new(NoopPushNotificationService),
            navigation: Rc::new(NoopNavigationService),
            connectivity: Rc::new(NoopConnectivityService),
            overlays: Rc::new(NoopOverlayRenderer),
        }
    }
}

/// In-memory host whose adapters share one [`HostCallLog`].
///
/// The concrete adapters stay reachable for scripting host events (back-button presses,
/// navigation, connectivity changes, push deliveries) while [`MemoryHost::services`] hands the
/// same adapters to the shell core.
#[derive(Clone)]
pub struct MemoryHost {
    /// Shared call journal.
    pub log: HostCallLog,
    /// Platform adapter.
    pub platform: MemoryPlatformService,
    /// Theme adapter.
    pub theme: MemoryThemeService,
    /// Status-bar and edge-to-edge adapter.
    pub status_bar: MemoryStatusBarService,
    /// Push channel adapter.
    pub push: MemoryPushNotificationService,
    /// Router adapter.
    pub navigation: MemoryNavigationService,
    /// Connectivity adapter.
    pub connectivity: MemoryConnectivityService,
    /// Overlay renderer adapter.
    pub overlays: MemoryOverlayRenderer,
}

impl MemoryHost {
    /// Creates an online host of `kind` at `/home` whose notification permission starts at
    /// `permission` and whose consent prompt answers `prompt_answer`.
    pub fn new(
        kind: PlatformKind,
        permission: PermissionStatus,
        prompt_answer: PermissionStatus,
    ) -> Self {
        let log = HostCallLog::default();
        Self {
            platform: MemoryPlatformService::new(kind, log.clone()),
            theme: MemoryThemeService::new(log.clone()),
            status_bar: MemoryStatusBarService::new(log.clone()),
            push: MemoryPushNotificationService::new(log.clone(), permission, prompt_answer),
            navigation: MemoryNavigationService::new(log.clone(), "/home"),
            connectivity: MemoryConnectivityService::new(
                log.clone(),
                NetworkStatus::online("wifi"),
            ),
            overlays: MemoryOverlayRenderer::new(log.clone()),
            log,
        }
    }

    /// Builds a [`HostServices`] bundle over the same adapters.
    pub fn services(&self) -> HostServices {
        HostServices {
            platform: Rc::new(self.platform.clone()),
            theme: Rc::new(self.theme.clone()),
            status_bar: Rc::new(self.status_bar.clone()),
            edge_to_edge: Rc::new(self.status_bar.clone()),
            push: Rc::new(self.push.clone()),
            navigation: Rc::new(self.navigation.clone()),
            connectivity: Rc::new(self.connectivity.clone()),
            overlays: Rc::new(self.overlays.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::HostCall;

    #[test]
    fn memory_host_services_share_adapters_and_log() {
        let host = MemoryHost::new(
            PlatformKind::Android,
            PermissionStatus::Granted,
            PermissionStatus::Granted,
        );
        let services = host.services();

        block_on(services.platform.ready());
        services.navigation.navigate_back().expect_err("root");
        host.navigation.navigate("/orders");

        assert_eq!(services.platform.platform_kind(), PlatformKind::Android);
        assert!(services.navigation.can_go_back());
        assert_eq!(
            host.log.calls(),
            vec![HostCall::PlatformReady, HostCall::NavigateBack]
        );
    }

    #[test]
    fn noop_services_report_web_platform() {
        let services = HostServices::noop();
        block_on(services.platform.ready());
        assert_eq!(services.platform.platform_kind(), PlatformKind::Web);
        assert!(services.connectivity.current_status().connected);
    }
}
