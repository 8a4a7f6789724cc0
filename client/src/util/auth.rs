//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every guarded route applies the same decision, so the rule lives here as a
//! pure function and `ProtectedRoute` only renders its result.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::state::auth::AuthState;

/// Where anonymous visitors of a guarded route are sent.
pub const UNAUTH_ENTRY_ROUTE: &str = "/";

/// What a guarded route should do for the current auth state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Auth not settled: show a placeholder, do not redirect.
    Loading,
    /// Signed out: redirect without rendering the guarded subtree.
    Redirect(&'static str),
    /// Signed in: render the guarded subtree unmodified.
    Render,
}

#[must_use]
pub fn guard_decision(state: &AuthState) -> GuardDecision {
    match state {
        AuthState::Unknown => GuardDecision::Loading,
        AuthState::Anonymous => GuardDecision::Redirect(UNAUTH_ENTRY_ROUTE),
        AuthState::Authenticated(_) => GuardDecision::Render,
    }
}
