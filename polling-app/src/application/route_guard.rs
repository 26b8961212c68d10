use super::{AuthSnapshot, AuthStore};
use crate::domain::{Access, Route, ROLE_ADMIN};
use crate::infrastructure::navigation::Navigator;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect { to: Route, from: Option<Route> },
}

/// Decides where a navigation to `requested` may go.
pub fn evaluate(auth: &AuthSnapshot, requested: &Route) -> GuardDecision {
    let is_admin = auth.role_id == Some(ROLE_ADMIN);

    match (requested.access(), auth.is_authenticated) {
        // Unknown paths fall back to login, which sends signed-in users on.
        (None, false) => GuardDecision::Redirect {
            to: Route::Login,
            from: None,
        },
        (None, true) => GuardDecision::Redirect {
            to: Route::LANDING,
            from: None,
        },
        (Some(Access::PublicOnly), false) => GuardDecision::Allow,
        (Some(Access::PublicOnly), true) => GuardDecision::Redirect {
            to: Route::LANDING,
            from: Some(requested.clone()),
        },
        (Some(Access::Protected | Access::AdminOnly), false) => GuardDecision::Redirect {
            to: Route::Login,
            from: Some(requested.clone()),
        },
        (Some(Access::AdminOnly), true) if !is_admin => GuardDecision::Redirect {
            to: Route::LANDING,
            from: None,
        },
        (Some(Access::Protected | Access::AdminOnly), true) => GuardDecision::Allow,
    }
}

/// Runs every navigation through [`evaluate`] against the auth store.
#[derive(Clone)]
pub struct RouteGuard {
    auth: Arc<AuthStore>,
    navigator: Navigator,
}

impl RouteGuard {
    pub fn new(auth: Arc<AuthStore>, navigator: Navigator) -> Self {
        Self { auth, navigator }
    }

    pub fn check(&self, requested: &Route) -> GuardDecision {
        evaluate(&self.auth.snapshot(), requested)
    }

    /// Applies the decision and returns the route actually reached.
    pub fn navigate(&self, requested: Route) -> Route {
        match self.check(&requested) {
            GuardDecision::Allow => {
                self.navigator.go(requested.clone());
                requested
            }
            GuardDecision::Redirect { to, from } => {
                tracing::debug!("Guard redirected {} to {}", requested, to);
                // Only remember where to return when the redirect is to login.
                let from = if to == Route::Login { from } else { None };
                self.navigator.redirect(to.clone(), from);
                to
            }
        }
    }
}
