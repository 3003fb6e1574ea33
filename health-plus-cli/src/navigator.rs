use std::sync::Mutex;

use health_plus_core::{Navigator, Route};

/// Navigator for a terminal session.
///
/// There is no page to switch, so navigating records where the user was
/// sent and tells them what to do next.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    current: Mutex<Option<Route>>,
}

impl TerminalNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last route navigated to, if any.
    pub fn current(&self) -> Option<Route> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn notice(route: &Route) -> Option<&'static str> {
        match route {
            Route::Login => Some("You are signed out. Run `hplus auth login` to sign in."),
            Route::Signup => Some("Run `hplus auth register` to create an account."),
            _ => None,
        }
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: &Route) {
        tracing::debug!(%route, "Navigating");
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = Some(route.clone());

        if let Some(notice) = Self::notice(route) {
            eprintln!("{}", notice);
        }
    }
}
