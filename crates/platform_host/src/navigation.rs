//! Navigation contracts: hardware back button, router events, and app backgrounding.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{HostCall, HostCallLog};

/// One completed navigation reported by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    /// Monotonic navigation id assigned by the router.
    pub id: u64,
    /// URL the router navigated to.
    pub url: String,
}

/// Handler invoked when the hardware back button is pressed.
pub type BackButtonHandler = Rc<dyn Fn()>;

/// Handler invoked for every completed navigation.
pub type RouteChangeHandler = Rc<dyn Fn(&RouteChange)>;

/// Host service for the router and the hardware back button.
///
/// Handlers stay installed for the process lifetime.
pub trait NavigationService {
    /// Returns whether the navigation stack has an entry to go back to.
    fn can_go_back(&self) -> bool;

    /// Returns the URL of the active route.
    fn current_url(&self) -> String;

    /// Pops one navigation entry.
    ///
    /// # Errors
    ///
    /// Returns an error when the host router rejects the navigation.
    fn navigate_back(&self) -> Result<(), String>;

    /// Sends the app to the background (the platform default action at the navigation root).
    ///
    /// # Errors
    ///
    /// Returns an error when the host does not support backgrounding.
    fn minimize_app(&self) -> Result<(), String>;

    /// Installs `handler` as the back-button interceptor with `priority`.
    ///
    /// # Errors
    ///
    /// Returns an error when the host has no back-button event source.
    fn on_back_button(&self, priority: i32, handler: BackButtonHandler) -> Result<(), String>;

    /// Installs `handler` for every completed navigation.
    ///
    /// # Errors
    ///
    /// Returns an error when the router event stream is unavailable.
    fn on_route_change(&self, handler: RouteChangeHandler) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op navigation service for headless targets.
pub struct NoopNavigationService;

impl NavigationService for NoopNavigationService {
    fn can_go_back(&self) -> bool {
        false
    }

    fn current_url(&self) -> String {
        "/".to_string()
    }

    fn navigate_back(&self) -> Result<(), String> {
        Ok(())
    }

    fn minimize_app(&self) -> Result<(), String> {
        Ok(())
    }

    fn on_back_button(&self, _priority: i32, _handler: BackButtonHandler) -> Result<(), String> {
        Ok(())
    }

    fn on_route_change(&self, _handler: RouteChangeHandler) -> Result<(), String> {
        Ok(())
    }
}

/// In-memory router with a URL stack and scriptable back-button/navigation events.
#[derive(Clone)]
pub struct MemoryNavigationService {
    log: HostCallLog,
    stack: Rc<RefCell<Vec<String>>>,
    next_id: Rc<Cell<u64>>,
    back_handlers: Rc<RefCell<Vec<(i32, BackButtonHandler)>>>,
    route_handlers: Rc<RefCell<Vec<RouteChangeHandler>>>,
}

impl MemoryNavigationService {
    /// Creates a router positioned at `root_url`.
    pub fn new(log: HostCallLog, root_url: &str) -> Self {
        Self {
            log,
            stack: Rc::new(RefCell::new(vec![root_url.to_string()])),
            next_id: Rc::new(Cell::new(1)),
            back_handlers: Rc::default(),
            route_handlers: Rc::default(),
        }
    }

    /// Pushes `url` and emits a [`RouteChange`] to route handlers.
    pub fn navigate(&self, url: &str) {
        self.stack.borrow_mut().push(url.to_string());
        self.emit_route_change(url);
    }

    /// Simulates a hardware back-button press. Only the highest-priority handler runs.
    ///
    /// Returns whether a handler consumed the press.
    pub fn press_back_button(&self) -> bool {
        let handler = self
            .back_handlers
            .borrow()
            .iter()
            .max_by_key(|(priority, _)| *priority)
            .map(|(_, handler)| handler.clone());
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// Returns the number of installed back-button handlers.
    pub fn back_handler_count(&self) -> usize {
        self.back_handlers.borrow().len()
    }

    /// Returns the number of installed route handlers.
    pub fn route_handler_count(&self) -> usize {
        self.route_handlers.borrow().len()
    }

    /// Returns the navigation stack depth.
    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }

    fn emit_route_change(&self, url: &str) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let change = RouteChange {
            id,
            url: url.to_string(),
        };
        let handlers: Vec<RouteChangeHandler> = self.route_handlers.borrow().clone();
        for handler in &handlers {
            handler(&change);
        }
    }
}

impl NavigationService for MemoryNavigationService {
    fn can_go_back(&self) -> bool {
        self.stack.borrow().len() > 1
    }

    fn current_url(&self) -> String {
        self.stack.borrow().last().cloned().unwrap_or_default()
    }

    fn navigate_back(&self) -> Result<(), String> {
        self.log.record(HostCall::NavigateBack)?;
        let url = {
            let mut stack = self.stack.borrow_mut();
            if stack.len() <= 1 {
                return Err("navigation stack is at its root".to_string());
            }
            stack.pop();
            stack.last().cloned().unwrap_or_default()
        };
        self.emit_route_change(&url);
        Ok(())
    }

    fn minimize_app(&self) -> Result<(), String> {
        self.log.record(HostCall::MinimizeApp)
    }

    fn on_back_button(&self, priority: i32, handler: BackButtonHandler) -> Result<(), String> {
        self.log.record(HostCall::OnBackButton(priority))?;
        self.back_handlers.borrow_mut().push((priority, handler));
        Ok(())
    }

    fn on_route_change(&self, handler: RouteChangeHandler) -> Result<(), String> {
        self.log.record(HostCall::OnRouteChange)?;
        self.route_handlers.borrow_mut().push(handler);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_navigation_tracks_stack_and_emits_route_changes() {
        let nav = MemoryNavigationService::new(HostCallLog::default(), "/home");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        nav.on_route_change(Rc::new(move |change: &RouteChange| {
            sink.borrow_mut().push(change.url.clone())
        }))
        .expect("route handler");

        assert!(!nav.can_go_back());
        nav.navigate("/orders");
        assert!(nav.can_go_back());
        assert_eq!(nav.current_url(), "/orders");
        nav.navigate_back().expect("back");

        assert_eq!(nav.current_url(), "/home");
        assert_eq!(*seen.borrow(), vec!["/orders".to_string(), "/home".to_string()]);
        nav.navigate_back().expect_err("root cannot go back");
    }

    #[test]
    fn back_button_press_runs_highest_priority_handler() {
        let nav = MemoryNavigationService::new(HostCallLog::default(), "/home");
        let winner = Rc::new(Cell::new(0));
        for priority in [0, 10, 5] {
            let winner = winner.clone();
            nav.on_back_button(priority, Rc::new(move || winner.set(priority)))
                .expect("back handler");
        }

        assert!(nav.press_back_button());
        assert_eq!(winner.get(), 10);
        assert!(!MemoryNavigationService::new(HostCallLog::default(), "/").press_back_button());
    }
}
