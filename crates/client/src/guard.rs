//! Navigation guard.
//!
//! Each application describes its routes by implementing [`Route`]. The
//! [`NavigationGuard`] reads the session before every transition and decides
//! whether to proceed, redirect, or deny. The decision is advisory; the
//! backend enforces authorization on its own.

use std::fmt::Display;

use crate::session::{AuthState, Session};

/// What a route requires of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone.
    Public,
    /// Any logged-in user.
    Authenticated,
    /// Logged-in users with the admin role.
    Admin,
}

impl Access {
    /// Whether `state` satisfies this requirement.
    #[must_use]
    pub const fn permits(self, state: AuthState) -> bool {
        match self {
            Self::Public => true,
            Self::Authenticated => state.is_authenticated(),
            Self::Admin => matches!(state, AuthState::AuthenticatedAdmin),
        }
    }
}

/// A route table.
pub trait Route: Clone + PartialEq + Display + Sized {
    /// Notice shown when a logged-in user lacks the role a route needs.
    const DENIAL_NOTICE: &'static str = "Regular users cannot access the admin system";

    /// Resolve a path. Unknown paths map to a not-found route.
    fn from_path(path: &str) -> Self;

    /// Canonical path of this route.
    fn path(&self) -> String;

    fn access(&self) -> Access;

    /// Where unauthenticated or denied navigation ends up.
    fn login() -> Self;

    /// Where an authenticated user lands after login.
    fn landing() -> Self;

    /// Whether an authenticated user should be sent on to the landing route
    /// instead of seeing this one.
    fn redirects_when_authenticated(&self) -> bool {
        *self == Self::login()
    }
}

/// Why navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    NotAuthenticated,
    AlreadyAuthenticated,
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision<R> {
    /// Navigation may continue to the route.
    Proceed(R),
    /// Navigation continues elsewhere; the session is untouched.
    Redirect { to: R, reason: RedirectReason },
    /// Authenticated but not authorized: the session has been cleared and
    /// the notice should be shown to the user.
    Deny { to: R, notice: &'static str },
}

impl<R: Route> GuardDecision<R> {
    /// The route navigation actually ends on.
    #[must_use]
    pub const fn destination(&self) -> &R {
        match self {
            Self::Proceed(to) | Self::Redirect { to, .. } | Self::Deny { to, .. } => to,
        }
    }

    #[must_use]
    pub const fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed(_))
    }
}

impl<R: Route> Display for GuardDecision<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Proceed(to) => write!(f, "proceed to {to}"),
            Self::Redirect {
                to,
                reason: RedirectReason::NotAuthenticated,
            } => write!(f, "redirect to {to} (login required)"),
            Self::Redirect {
                to,
                reason: RedirectReason::AlreadyAuthenticated,
            } => write!(f, "redirect to {to} (already logged in)"),
            Self::Deny { to, notice } => write!(f, "denied: {notice}; redirect to {to}"),
        }
    }
}

/// Route guard bound to a session.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    session: Session,
}

impl NavigationGuard {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Decide a transition to a raw path.
    pub fn navigate<R: Route>(&self, path: &str) -> GuardDecision<R> {
        self.check(R::from_path(path))
    }

    /// Decide a transition to `target`.
    ///
    /// Denial clears every session key before returning.
    pub fn check<R: Route>(&self, target: R) -> GuardDecision<R> {
        let state = self.session.auth_state();

        if target.access().permits(state) {
            let landing = R::landing();
            if state.is_authenticated()
                && target.redirects_when_authenticated()
                && landing.access().permits(state)
            {
                return GuardDecision::Redirect {
                    to: landing,
                    reason: RedirectReason::AlreadyAuthenticated,
                };
            }
            return GuardDecision::Proceed(target);
        }

        if !state.is_authenticated() {
            tracing::debug!(route = %target, "Navigation requires login");
            return GuardDecision::Redirect {
                to: R::login(),
                reason: RedirectReason::NotAuthenticated,
            };
        }

        tracing::warn!(
            route = %target,
            username = self.session.username().as_deref().unwrap_or(""),
            "Non-admin user attempted to enter an admin route"
        );
        if let Err(e) = self.session.clear() {
            tracing::error!(error = %e, "Failed to clear session after denied navigation");
        }
        GuardDecision::Deny {
            to: R::login(),
            notice: R::DENIAL_NOTICE,
        }
    }
}
