//! Typed host capability contracts for the mobile application shell.
//!
//! This crate is the API-first boundary between the shell core and the native bridges. It exposes
//! the capability traits the core calls through (platform readiness, theme, status bar, push
//! notifications, navigation, connectivity, overlay rendering), the shared models those traits
//! exchange, `Noop*` adapters for targets without a capability, and `Memory*` adapters that record
//! every call into a shared [`HostCallLog`].
//!
//! All async methods return non-`Send` boxed futures: the host runs one cooperative event loop.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod connectivity;
pub mod host;
pub mod journal;
pub mod navigation;
pub mod notifications;
pub mod overlay;
pub mod platform;
pub mod status_bar;
pub mod theme;

pub use connectivity::{
    ConnectivityService, MemoryConnectivityService, NetworkStatus, NetworkStatusHandler,
    NoopConnectivityService,
};
pub use host::{HostServices, MemoryHost};
pub use journal::{HostCall, HostCallLog};
pub use navigation::{
    BackButtonHandler, MemoryNavigationService, NavigationService, NoopNavigationService,
    RouteChange, RouteChangeHandler,
};
pub use notifications::{
    ListenerHandle, MemoryPushNotificationService, NoopPushNotificationService,
    NotificationAction, NotificationFuture, PermissionStatus, PushEvent, PushListener,
    PushNotification, PushNotificationService, PushPayload, PushToken,
};
pub use overlay::{
    AlertButton, AlertMode, AlertOptions, AlertOutcome, LoadingOptions, MemoryOverlayRenderer,
    NoopOverlayRenderer, OverlayFuture, OverlayHandle, OverlayRenderer, ToastOptions,
    ToastPosition, ToastSeverity,
};
pub use platform::{
    MemoryPlatformService, NoopPlatformService, PlatformFuture, PlatformKind, PlatformService,
};
pub use status_bar::{
    EdgeToEdgeService, MemoryStatusBarService, NoopStatusBarService, StatusBarFuture,
    StatusBarService, StatusBarStyle,
};
pub use theme::{MemoryThemeService, NoopThemeService, ThemePalette, ThemeService};
