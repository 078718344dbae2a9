//! Platform readiness proof.

use platform_host::{PlatformKind, PlatformService};

/// Proof that the host reported readiness, carrying the platform kind decided at that moment.
///
/// The only constructor awaits [`PlatformService::ready`], so every operation that takes a
/// `&ReadyToken` can only run after the native bridges are callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyToken {
    platform: PlatformKind,
}

impl ReadyToken {
    /// Suspends until `platform` is ready. Never resolves if the host never becomes ready.
    pub async fn wait(platform: &dyn PlatformService) -> Self {
        platform.ready().await;
        Self {
            platform: platform.platform_kind(),
        }
    }

    /// Platform kind for the rest of the process.
    pub const fn platform_kind(&self) -> PlatformKind {
        self.platform
    }
}
