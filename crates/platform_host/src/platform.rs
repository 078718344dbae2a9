//! Platform identity and readiness contracts.

use std::{future::Future, pin::Pin};

use serde::{Deserialize, Serialize};

use crate::{HostCall, HostCallLog};

/// Object-safe boxed future used by [`PlatformService`].
pub type PlatformFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host operating environment, decided once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Native iOS shell.
    Ios,
    /// Native Android shell.
    Android,
    /// Browser or any other host without native device chrome.
    Web,
}

impl PlatformKind {
    /// Returns the stable host token for this platform.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Web => "web",
        }
    }

    /// Maps a host platform token to a [`PlatformKind`].
    ///
    /// Unknown tokens are treated as [`Self::Web`].
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "ios" => Self::Ios,
            "android" => Self::Android,
            _ => Self::Web,
        }
    }

    /// Returns whether the platform exposes native device chrome.
    pub const fn is_native(self) -> bool {
        matches!(self, Self::Ios | Self::Android)
    }
}

/// Host service describing the running platform and its one-time readiness signal.
pub trait PlatformService {
    /// Returns the platform kind. Hosts must report the same value for the process lifetime.
    fn platform_kind(&self) -> PlatformKind;

    /// Resolves once the native capability bridges are callable.
    ///
    /// There is no timeout; a host that never becomes ready never resolves.
    fn ready<'a>(&'a self) -> PlatformFuture<'a, ()>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Browser-like platform that is ready immediately.
pub struct NoopPlatformService;

impl PlatformService for NoopPlatformService {
    fn platform_kind(&self) -> PlatformKind {
        PlatformKind::Web
    }

    fn ready<'a>(&'a self) -> PlatformFuture<'a, ()> {
        Box::pin(async {})
    }
}

#[derive(Debug, Clone)]
/// In-memory platform with a fixed kind that records readiness waits.
pub struct MemoryPlatformService {
    kind: PlatformKind,
    log: HostCallLog,
}

impl MemoryPlatformService {
    /// Creates a platform of `kind` recording into `log`.
    pub fn new(kind: PlatformKind, log: HostCallLog) -> Self {
        Self { kind, log }
    }
}

impl PlatformService for MemoryPlatformService {
    fn platform_kind(&self) -> PlatformKind {
        self.kind
    }

    fn ready<'a>(&'a self) -> PlatformFuture<'a, ()> {
        Box::pin(async move { self.log.note(HostCall::PlatformReady) })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn platform_tokens_map_to_closed_kinds() {
        assert_eq!(PlatformKind::from_token("ios"), PlatformKind::Ios);
        assert_eq!(PlatformKind::from_token(" Android "), PlatformKind::Android);
        assert_eq!(PlatformKind::from_token("electron"), PlatformKind::Web);
        assert_eq!(PlatformKind::from_token(""), PlatformKind::Web);
        assert!(PlatformKind::Ios.is_native());
        assert!(!PlatformKind::Web.is_native());
    }

    #[test]
    fn platform_kind_serializes_as_host_token() {
        let json = serde_json::to_string(&PlatformKind::Android).expect("serialize");
        assert_eq!(json, "\"android\"");
        assert_eq!(PlatformKind::Android.as_str(), "android");
    }

    #[test]
    fn memory_platform_records_ready_wait() {
        let log = HostCallLog::default();
        let platform = MemoryPlatformService::new(PlatformKind::Ios, log.clone());
        let platform_obj: &dyn PlatformService = &platform;

        block_on(platform_obj.ready());

        assert_eq!(platform_obj.platform_kind(), PlatformKind::Ios);
        assert_eq!(log.calls(), vec![HostCall::PlatformReady]);
    }
}
