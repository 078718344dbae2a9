//! Device-chrome contracts: status bar and the edge-to-edge compatibility shim.

use std::{future::Future, pin::Pin};

use serde::{Deserialize, Serialize};

use crate::{HostCall, HostCallLog};

/// Object-safe boxed future used by [`StatusBarService`] and [`EdgeToEdgeService`].
pub type StatusBarFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Status-bar content style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBarStyle {
    /// Light text for dark backgrounds.
    #[default]
    Dark,
    /// Dark text for light backgrounds.
    Light,
    /// Platform default.
    Default,
}

/// Host service for the native status bar.
pub trait StatusBarService {
    /// Sets whether the status bar overlays the web content.
    fn set_overlays_web_view<'a>(
        &'a self,
        overlay: bool,
    ) -> StatusBarFuture<'a, Result<(), String>>;

    /// Sets the status-bar style.
    fn set_style<'a>(&'a self, style: StatusBarStyle) -> StatusBarFuture<'a, Result<(), String>>;
}

/// Host service for the edge-to-edge compatibility shim.
pub trait EdgeToEdgeService {
    /// Disables the shim so the web content owns the safe areas.
    fn disable<'a>(&'a self) -> StatusBarFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op device-chrome adapter for hosts without a status bar.
pub struct NoopStatusBarService;

impl StatusBarService for NoopStatusBarService {
    fn set_overlays_web_view<'a>(
        &'a self,
        _overlay: bool,
    ) -> StatusBarFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn set_style<'a>(&'a self, _style: StatusBarStyle) -> StatusBarFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

impl EdgeToEdgeService for NoopStatusBarService {
    fn disable<'a>(&'a self) -> StatusBarFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory device-chrome adapter recording into a [`HostCallLog`].
pub struct MemoryStatusBarService {
    log: HostCallLog,
}

impl MemoryStatusBarService {
    /// Creates a device-chrome adapter recording into `log`.
    pub fn new(log: HostCallLog) -> Self {
        Self { log }
    }
}

impl StatusBarService for MemoryStatusBarService {
    fn set_overlays_web_view<'a>(
        &'a self,
        overlay: bool,
    ) -> StatusBarFuture<'a, Result<(), String>> {
        Box::pin(async move { self.log.record(HostCall::SetOverlaysWebView(overlay)) })
    }

    fn set_style<'a>(&'a self, style: StatusBarStyle) -> StatusBarFuture<'a, Result<(), String>> {
        Box::pin(async move { self.log.record(HostCall::SetStatusBarStyle(style)) })
    }
}

impl EdgeToEdgeService for MemoryStatusBarService {
    fn disable<'a>(&'a self) -> StatusBarFuture<'a, Result<(), String>> {
        Box::pin(async move { self.log.record(HostCall::DisableEdgeToEdge) })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn memory_status_bar_records_and_fails_per_operation() {
        let log = HostCallLog::default();
        log.fail_operation("status_bar.set_style");
        let chrome = MemoryStatusBarService::new(log.clone());

        block_on(chrome.set_overlays_web_view(true)).expect("overlay");
        block_on(chrome.set_style(StatusBarStyle::Dark)).expect_err("style fails");
        block_on(EdgeToEdgeService::disable(&chrome)).expect("disable");

        assert_eq!(
            log.calls(),
            vec![
                HostCall::SetOverlaysWebView(true),
                HostCall::SetStatusBarStyle(StatusBarStyle::Dark),
                HostCall::DisableEdgeToEdge,
            ]
        );
    }

    #[test]
    fn noop_status_bar_is_successful() {
        let chrome = NoopStatusBarService;
        block_on(chrome.set_overlays_web_view(false)).expect("overlay");
        block_on(chrome.set_style(StatusBarStyle::Light)).expect("style");
        block_on(EdgeToEdgeService::disable(&chrome)).expect("disable");
    }
}
