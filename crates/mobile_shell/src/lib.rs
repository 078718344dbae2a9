//! Mobile application shell core.
//!
//! The shell waits for platform readiness, then configures the document theme and device chrome,
//! wires push-notification listeners behind a permission gate, installs the hardware back-button
//! interceptor, and keeps router and connectivity observers alive. [`OverlayService`] owns the
//! single loading indicator plus toasts and alerts. Every host interaction goes through the
//! capability traits of [`platform_host`], so the core runs unchanged against native bridges or
//! the in-memory adapters.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod back_button;
pub mod config;
pub mod error;
pub mod observers;
pub mod overlay;
pub mod permission;
pub mod push;
pub mod ready;
pub mod startup;

pub use back_button::{decide_back_action, handle_back_press, install_back_button, BackAction};
pub use config::{
    AlertConfig, BackButtonConfig, LoadingConfig, LoadingPolicy, ShellConfig, ToastConfig,
    DEFAULT_BACK_BUTTON_PRIORITY, DEFAULT_TOAST_DURATION_MS,
};
pub use error::ShellError;
pub use observers::{
    install_connectivity_monitor, install_route_monitor, ConnectivitySubscriber, RouteObserver,
};
pub use overlay::OverlayService;
pub use permission::{PermissionGate, PermissionState};
pub use push::{AttachReport, ListenerRegistry, NoopPushEventSink, PushEventSink};
pub use ready::ReadyToken;
pub use startup::{StartupOrchestrator, StartupReport, StartupStep};
