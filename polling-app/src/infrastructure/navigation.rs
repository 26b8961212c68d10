use crate::domain::{Access, Route};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub route: Route,
    /// Location to restore after signing in, best effort.
    pub return_to: Option<Route>,
}

/// Observable current-route cell shared by the HTTP client, the stores and
/// whatever front end renders the views.
#[derive(Clone)]
pub struct Navigator {
    state: Arc<watch::Sender<NavState>>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (tx, _rx) = watch::channel(NavState {
            route: initial,
            return_to: None,
        });
        Self {
            state: Arc::new(tx),
        }
    }

    pub fn current(&self) -> Route {
        self.state.borrow().route.clone()
    }

    pub fn return_to(&self) -> Option<Route> {
        self.state.borrow().return_to.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NavState> {
        self.state.subscribe()
    }

    pub fn go(&self, route: Route) {
        tracing::debug!("Navigating to {}", route);
        self.state.send_modify(|s| s.route = route);
    }

    pub fn redirect(&self, to: Route, from: Option<Route>) {
        tracing::debug!("Redirecting to {} (from {:?})", to, from.as_ref().map(Route::path));
        self.state.send_modify(|s| {
            s.route = to;
            if from.is_some() {
                s.return_to = from;
            }
        });
    }

    /// Forced navigation to the login view after the session was revoked.
    pub fn force_login(&self) {
        let current = self.current();
        let from = match current.access() {
            Some(Access::Protected) | Some(Access::AdminOnly) => Some(current),
            _ => None,
        };
        self.redirect(Route::Login, from);
    }

    pub fn take_return_to(&self) -> Option<Route> {
        let mut taken = None;
        self.state.send_modify(|s| taken = s.return_to.take());
        taken
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PollId;

    #[test]
    fn test_force_login_remembers_protected_location() {
        let nav = Navigator::new(Route::EditPoll(PollId(4)));
        nav.force_login();
        assert_eq!(nav.current(), Route::Login);
        assert_eq!(nav.take_return_to(), Some(Route::EditPoll(PollId(4))));
        assert_eq!(nav.return_to(), None);
    }

    #[test]
    fn test_force_login_from_public_route_keeps_no_return() {
        let nav = Navigator::new(Route::Signup);
        nav.force_login();
        assert_eq!(nav.current(), Route::Login);
        assert_eq!(nav.return_to(), None);
    }

    #[test]
    fn test_subscribers_observe_changes() {
        let nav = Navigator::default();
        let rx = nav.subscribe();
        nav.go(Route::Polls);
        assert_eq!(rx.borrow().route, Route::Polls);
    }
}
