//! Shell configuration with defaults for every field.

use platform_host::{AlertMode, StatusBarStyle, ThemePalette, ToastPosition};
use serde::{Deserialize, Serialize};

use crate::ShellError;

/// Auto-dismiss delay of toasts.
pub const DEFAULT_TOAST_DURATION_MS: u32 = 2000;
/// Back-button interceptor priority.
pub const DEFAULT_BACK_BUTTON_PRIORITY: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Top-level shell configuration.
pub struct ShellConfig {
    /// Palette applied right after platform readiness.
    pub theme: ThemePalette,
    /// Status-bar style applied on native platforms.
    pub status_bar_style: StatusBarStyle,
    /// Loading indicator settings.
    pub loading: LoadingConfig,
    /// Toast settings.
    pub toast: ToastConfig,
    /// Alert settings.
    pub alert: AlertConfig,
    /// Hardware back-button settings.
    pub back_button: BackButtonConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            theme: ThemePalette::Dark,
            status_bar_style: StatusBarStyle::Dark,
            loading: LoadingConfig::default(),
            toast: ToastConfig::default(),
            alert: AlertConfig::default(),
            back_button: BackButtonConfig::default(),
        }
    }
}

impl ShellConfig {
    /// Parses a configuration document. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::InvalidConfig`] when `raw` is not a valid configuration document.
    pub fn from_json(raw: &str) -> Result<Self, ShellError> {
        serde_json::from_str(raw).map_err(|err| ShellError::InvalidConfig(err.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// What `show_loading` does when a loading indicator is already active.
pub enum LoadingPolicy {
    /// Retarget the active indicator to the new message.
    #[default]
    Replace,
    /// Fail with [`ShellError::LoadingAlreadyActive`].
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Loading indicator settings.
pub struct LoadingConfig {
    /// Message used when the caller passes none.
    pub default_message: String,
    /// Style class applied to every loading indicator.
    pub css_class: Option<String>,
    /// Duplicate-presentation policy.
    pub policy: LoadingPolicy,
    /// Panic in debug builds when `show_loading` runs over an active indicator.
    pub strict: bool,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            default_message: "Loading...".to_string(),
            css_class: Some("custom-loading".to_string()),
            policy: LoadingPolicy::Replace,
            strict: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Toast settings.
pub struct ToastConfig {
    /// Time until a toast dismisses itself.
    pub duration_ms: u32,
    /// Anchor position.
    pub position: ToastPosition,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_TOAST_DURATION_MS,
            position: ToastPosition::Top,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Alert settings.
pub struct AlertConfig {
    /// Label of the acknowledgement button used when the caller passes no actions.
    pub default_button: String,
    /// Visual mode.
    pub mode: AlertMode,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            default_button: "OK".to_string(),
            mode: AlertMode::Md,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Hardware back-button settings.
pub struct BackButtonConfig {
    /// Interceptor priority; higher runs first.
    pub priority: i32,
    /// URLs treated as the navigation root, where back minimizes the app.
    pub root_urls: Vec<String>,
}

impl Default for BackButtonConfig {
    fn default() -> Self {
        Self {
            priority: DEFAULT_BACK_BUTTON_PRIORITY,
            root_urls: vec!["/home".to_string()],
        }
    }
}
