//! Hardware back-button interception.

use std::rc::Rc;

use leptos::logging;
use platform_host::NavigationService;

use crate::{config::BackButtonConfig, startup::StartupStep, ReadyToken, ShellError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What a back-button press does.
pub enum BackAction {
    /// Pop one navigation entry.
    NavigateBack,
    /// At the navigation root: send the app to the background.
    MinimizeApp,
}

/// Decides the back action from the navigation depth and the active URL.
pub fn decide_back_action(
    can_go_back: bool,
    current_url: &str,
    root_urls: &[String],
) -> BackAction {
    let at_root = root_urls.iter().any(|root| root == current_url);
    if can_go_back && !at_root {
        BackAction::NavigateBack
    } else {
        BackAction::MinimizeApp
    }
}

/// Handles one back-button press and returns the action taken. Host failures are logged.
pub fn handle_back_press(navigation: &dyn NavigationService, root_urls: &[String]) -> BackAction {
    let action = decide_back_action(
        navigation.can_go_back(),
        &navigation.current_url(),
        root_urls,
    );
    let result = match action {
        BackAction::NavigateBack => navigation.navigate_back(),
        BackAction::MinimizeApp => navigation.minimize_app(),
    };
    if let Err(err) = result {
        logging::warn!("back button {action:?} failed: {err}");
    }
    action
}

/// Installs the back-button interceptor for the process lifetime.
///
/// # Errors
///
/// Returns [`ShellError::StartupStepFailure`] when the host has no back-button event source.
pub fn install_back_button(
    navigation: Rc<dyn NavigationService>,
    config: &BackButtonConfig,
    _ready: &ReadyToken,
) -> Result<(), ShellError> {
    let root_urls = config.root_urls.clone();
    let handler_navigation = navigation.clone();
    navigation
        .on_back_button(
            config.priority,
            Rc::new(move || {
                handle_back_press(handler_navigation.as_ref(), &root_urls);
            }),
        )
        .map_err(|reason| ShellError::StartupStepFailure {
            step: StartupStep::BackButton,
            reason,
        })
}
