//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering. [`AuthProvider`] is built once at the app
//! root and injected; nothing else mutates auth state.
//!
//! DESIGN
//! ======
//! The initial session fetch and the auth service's notification stream race
//! each other. Every state-setting event therefore carries a ticket from
//! [`SessionStore::issue_ticket`]: the initial fetch takes its ticket when the
//! request is issued, a notification takes one when it arrives. An event is
//! applied only if its ticket is newer than the last applied one, so a slow
//! fetch response cannot overwrite a fresher notification.
//!
//! Settled events can only ever be `Anonymous` or `Authenticated`; `Unknown`
//! is the constructor state and is never written back.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};

use crate::net::auth_client::{AuthBackend, AuthEvent, AuthFailure, AuthSubscription, SignUpOutcome};
use crate::net::retry::{RetryPolicy, with_retry};
use crate::net::types::{Identity, Session};

/// The application's belief about who is signed in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Not yet determined (initial fetch in flight).
    #[default]
    Unknown,
    Anonymous,
    Authenticated(Identity),
}

impl AuthState {
    #[must_use]
    pub fn from_session(session: Option<&Session>) -> Self {
        match session {
            Some(session) => Self::Authenticated(session.identity.clone()),
            None => Self::Anonymous,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Unknown | Self::Anonymous => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// Ordering stamp for state-setting events.
pub type Ticket = u64;

type Observer = Rc<dyn Fn(&AuthState)>;

struct StoreInner {
    state: AuthState,
    next_ticket: Ticket,
    last_applied: Option<Ticket>,
    next_observer: u64,
    observers: Vec<(u64, Observer)>,
}

// =============================================================================
// SESSION STORE
// =============================================================================

/// Single source of truth for [`AuthState`], with observer subscriptions.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                state: AuthState::Unknown,
                next_ticket: 1,
                last_applied: None,
                next_observer: 0,
                observers: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner.borrow().state.clone()
    }

    /// Reserve the next ticket. Tickets are strictly increasing.
    pub fn issue_ticket(&self) -> Ticket {
        let mut inner = self.inner.borrow_mut();
        let ticket = inner.next_ticket;
        inner.next_ticket += 1;
        ticket
    }

    /// Settle the state from a session (or its absence) stamped with `ticket`.
    ///
    /// Returns `false` when the event is stale and was discarded.
    pub fn apply(&self, ticket: Ticket, session: Option<&Session>) -> bool {
        let next = AuthState::from_session(session);
        let observers = {
            let mut inner = self.inner.borrow_mut();
            if inner.last_applied.is_some_and(|last| ticket <= last) {
                return false;
            }
            inner.last_applied = Some(ticket);
            if inner.state == next {
                return true;
            }
            inner.state = next.clone();
            inner.observers.iter().map(|(_, o)| o.clone()).collect::<Vec<_>>()
        };
        for observer in observers {
            observer(&next);
        }
        true
    }

    /// Observe every state change until the guard is dropped.
    pub fn subscribe(&self, observer: impl Fn(&AuthState) + 'static) -> StoreSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_observer;
        inner.next_observer += 1;
        inner.observers.push((id, Rc::new(observer)));
        StoreSubscription { inner: Rc::downgrade(&self.inner), id }
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }
}

/// Scoped observer registration on a [`SessionStore`].
#[must_use = "dropping the subscription immediately stops observation"]
pub struct StoreSubscription {
    inner: Weak<RefCell<StoreInner>>,
    id: u64,
}

impl Drop for StoreSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().observers.retain(|(id, _)| *id != self.id);
        }
    }
}

// =============================================================================
// AUTH PROVIDER
// =============================================================================

/// Handles produced by [`AuthProvider::mount`].
pub struct Mount {
    /// Keeps the lifecycle alive; drop it on unmount.
    pub lifecycle: MountLifecycle,
    /// Initial session fetch. Already stamped, so it may be polled at any time.
    pub initial_fetch: Pin<Box<dyn Future<Output = ()>>>,
}

/// Scoped mount of the session lifecycle.
///
/// Dropping it releases the notification listener and turns a still pending
/// initial fetch into a no-op.
#[must_use = "dropping the lifecycle immediately unmounts the provider"]
pub struct MountLifecycle {
    _subscription: AuthSubscription,
    mounted: Rc<Cell<bool>>,
}

impl MountLifecycle {
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }
}

impl Drop for MountLifecycle {
    fn drop(&mut self) {
        self.mounted.set(false);
    }
}

/// Exposes the session store and the credential operations.
#[derive(Clone)]
pub struct AuthProvider {
    store: SessionStore,
    backend: Rc<dyn AuthBackend>,
    retry: RetryPolicy,
}

impl AuthProvider {
    pub fn new(backend: Rc<dyn AuthBackend>) -> Self {
        Self { store: SessionStore::new(), backend, retry: RetryPolicy::default() }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.store.state()
    }

    /// Bearer token for calls made on the user's behalf.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.backend.access_token()
    }

    /// Start the session lifecycle.
    ///
    /// Stamps the initial fetch, then registers for notifications. The caller
    /// drives `initial_fetch` and keeps `lifecycle` alive for as long as the
    /// provider is mounted. `on_retry` hears about fetch retries.
    pub fn mount(&self, on_retry: impl Fn(u32) + 'static) -> Mount {
        let fetch_ticket = self.store.issue_ticket();

        let store = self.store.clone();
        let subscription = self.backend.on_auth_state_change(Rc::new(move |event: &AuthEvent| {
            let ticket = store.issue_ticket();
            store.apply(ticket, event.session.as_ref());
        }));

        let mounted = Rc::new(Cell::new(true));

        let store = self.store.clone();
        let backend = self.backend.clone();
        let retry = self.retry;
        let still_mounted = mounted.clone();
        let on_retry = {
            let still_mounted = mounted.clone();
            move |attempt| {
                if still_mounted.get() {
                    on_retry(attempt);
                }
            }
        };
        let initial_fetch: Pin<Box<dyn Future<Output = ()>>> = Box::pin(async move {
            let session = with_retry(retry, || backend.current_session(), on_retry).await;
            if !still_mounted.get() {
                leptos::logging::log!("initial session fetch settled after unmount; ignored");
                return;
            }
            let session = session.unwrap_or_else(|e| {
                leptos::logging::warn!("initial session fetch failed: {e}");
                None
            });
            if !store.apply(fetch_ticket, session.as_ref()) {
                leptos::logging::log!("initial session superseded by a newer notification");
            }
        });

        Mount { lifecycle: MountLifecycle { _subscription: subscription, mounted }, initial_fetch }
    }

    /// Sign in with email and password.
    ///
    /// State changes arrive through the notification stream, not from this
    /// call's return value.
    ///
    /// # Errors
    ///
    /// Returns the service's [`AuthFailure`] unchanged.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthFailure> {
        self.backend.sign_in_with_password(email, password).await.map(|_| ())
    }

    /// Create an account. A blank display name is sent as none.
    ///
    /// # Errors
    ///
    /// Returns the service's [`AuthFailure`] unchanged.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<SignUpOutcome, AuthFailure> {
        let display_name = display_name.map(str::trim).filter(|n| !n.is_empty());
        self.backend.sign_up(email, password, display_name).await
    }

    /// # Errors
    ///
    /// Returns the service's [`AuthFailure`] unchanged.
    pub async fn sign_out(&self) -> Result<(), AuthFailure> {
        self.backend.sign_out().await
    }
}
