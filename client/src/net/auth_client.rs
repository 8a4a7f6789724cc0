//! Remote auth service adapter.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth service owns credentials, tokens, and session storage. This module
//! is the only place that talks to it. Everything above it sees the
//! [`AuthBackend`] trait: fetch the current session, subscribe to auth-state
//! notifications, and the three credential operations.
//!
//! Client-side (hydrate): [`SupabaseAuth`] speaks the GoTrue REST API via
//! `gloo-net`, keeps the session in `localStorage`, and refreshes it on a
//! browser timer shortly before the access token expires.
//! Server-side (SSR): [`UnavailableAuth`] answers every call with a failure,
//! since sessions only exist in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is flattened into [`AuthFailure`], a message the UI can show
//! verbatim. Bad credentials, duplicate accounts, and network errors all share
//! that shape.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "auth_client_test.rs"]
mod auth_client_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use async_trait::async_trait;

use super::types::Session;

pub(crate) const SIGN_IN_FALLBACK: &str = "Invalid email or password";
pub(crate) const SIGN_UP_FALLBACK: &str = "Error creating account";
#[cfg(any(test, feature = "hydrate"))]
pub(crate) const SIGN_OUT_FALLBACK: &str = "Failed to sign out";

// =============================================================================
// RESULT TYPES
// =============================================================================

/// A rejected auth operation, carrying a human-readable reason.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub message: String,
}

impl AuthFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// What a successful sign-up produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account exists but no session is granted until the user confirms
    /// their email out-of-band.
    ConfirmationRequired,
    /// The service auto-confirmed and issued a session immediately.
    SignedIn,
}

/// Why an auth-state notification was emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEventKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// One push notification from the auth service. The session fully describes
/// the new state; `None` means signed out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub session: Option<Session>,
}

impl AuthEvent {
    #[must_use]
    pub fn signed_in(session: Session) -> Self {
        Self { kind: AuthEventKind::SignedIn, session: Some(session) }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { kind: AuthEventKind::SignedOut, session: None }
    }
}

pub type AuthCallback = Rc<dyn Fn(&AuthEvent)>;

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// Operations consumed from the remote auth service.
///
/// `?Send`: the browser runtime is single-threaded and the futures hold
/// `Rc`/JS handles.
#[async_trait(?Send)]
pub trait AuthBackend {
    /// Fetch the current session, `None` when signed out or expired.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthFailure`] when the service cannot be reached.
    async fn current_session(&self) -> Result<Option<Session>, AuthFailure>;

    /// Register a listener for auth-state notifications. Notifications are
    /// delivered in emission order until the returned guard is dropped.
    fn on_auth_state_change(&self, callback: AuthCallback) -> AuthSubscription;

    /// Bearer token of the in-memory session, if any.
    fn access_token(&self) -> Option<String>;

    /// # Errors
    ///
    /// Returns an [`AuthFailure`] on bad credentials or transport failure.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthFailure>;

    /// # Errors
    ///
    /// Returns an [`AuthFailure`] on duplicate accounts, weak passwords, or
    /// transport failure.
    async fn sign_up(&self, email: &str, password: &str, display_name: Option<&str>)
    -> Result<SignUpOutcome, AuthFailure>;

    /// # Errors
    ///
    /// Returns an [`AuthFailure`] when the service rejects the request.
    async fn sign_out(&self) -> Result<(), AuthFailure>;
}

// =============================================================================
// LISTENER REGISTRY
// =============================================================================

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, AuthCallback)>,
}

/// Ordered set of auth-state listeners shared by backend implementations.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Listeners>>,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener; it stays registered until the guard is dropped.
    pub fn register(&self, callback: AuthCallback) -> AuthSubscription {
        let mut listeners = self.inner.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, callback));
        AuthSubscription { registry: Rc::downgrade(&self.inner), id }
    }

    /// Deliver `event` to every listener in registration order.
    ///
    /// Listeners registered during delivery hear the next event, not this
    /// one. A listener released during delivery is not called again.
    pub fn emit(&self, event: &AuthEvent) {
        let snapshot: Vec<(u64, AuthCallback)> = self.inner.borrow().entries.clone();
        for (id, callback) in snapshot {
            if self.contains(id) {
                callback(event);
            }
        }
    }

    fn contains(&self, id: u64) -> bool {
        self.inner.borrow().entries.iter().any(|(entry, _)| *entry == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scoped listener registration. Dropping it releases the listener.
#[must_use = "dropping the subscription immediately unregisters the listener"]
pub struct AuthSubscription {
    registry: Weak<RefCell<Listeners>>,
    id: u64,
}

impl AuthSubscription {
    /// Release the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

// =============================================================================
// ERROR BODIES
// =============================================================================

/// Extract the most specific message from an auth-service error body.
///
/// GoTrue has used `error_description`, `msg`, `message`, and `error` across
/// versions; the first non-empty one wins.
pub(crate) fn auth_error_message(body: &str, fallback: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback.to_owned();
    };
    ["error_description", "msg", "message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map_or_else(|| fallback.to_owned(), ToOwned::to_owned)
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn token_endpoint(base_url: &str, grant_type: &str) -> String {
    format!("{base_url}/auth/v1/token?grant_type={grant_type}")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn signup_body(email: &str, password: &str, display_name: Option<&str>) -> serde_json::Value {
    let mut body = serde_json::json!({ "email": email, "password": password });
    if let Some(name) = display_name.map(str::trim).filter(|n| !n.is_empty()) {
        body["data"] = serde_json::json!({ "full_name": name });
    }
    body
}

// =============================================================================
// SERVER-SIDE STUB
// =============================================================================

/// Backend used while rendering on the server: there is no browser session,
/// so nothing is ever authenticated and every operation fails.
#[derive(Default)]
pub struct UnavailableAuth {
    registry: ListenerRegistry,
}

const UNAVAILABLE: &str = "authentication is only available in the browser";

#[async_trait(?Send)]
impl AuthBackend for UnavailableAuth {
    async fn current_session(&self) -> Result<Option<Session>, AuthFailure> {
        Ok(None)
    }

    fn on_auth_state_change(&self, callback: AuthCallback) -> AuthSubscription {
        self.registry.register(callback)
    }

    fn access_token(&self) -> Option<String> {
        None
    }

    async fn sign_in_with_password(&self, _email: &str, _password: &str) -> Result<Session, AuthFailure> {
        Err(AuthFailure::new(UNAVAILABLE))
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _display_name: Option<&str>,
    ) -> Result<SignUpOutcome, AuthFailure> {
        Err(AuthFailure::new(UNAVAILABLE))
    }

    async fn sign_out(&self) -> Result<(), AuthFailure> {
        Err(AuthFailure::new(UNAVAILABLE))
    }
}

// =============================================================================
// SESSION TIMING
// =============================================================================

/// Refresh this long before the access token expires.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) const REFRESH_MARGIN_SECS: i64 = 60;

/// Milliseconds to wait before refreshing a session expiring at `expires_at`.
/// Clamped to what a browser timer accepts.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn refresh_delay_ms(expires_at: i64, now_secs: i64) -> u32 {
    let secs = expires_at.saturating_sub(now_secs).saturating_sub(REFRESH_MARGIN_SECS).max(0);
    let ms = secs.saturating_mul(1000).min(i64::from(i32::MAX));
    u32::try_from(ms).unwrap_or(0)
}

/// Access token of `session` unless it has expired.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn live_access_token(session: Option<&Session>, now_secs: i64) -> Option<String> {
    session.filter(|s| !s.is_expired(now_secs)).map(|s| s.access_token.clone())
}

// =============================================================================
// GOTRUE CLIENT (browser)
// =============================================================================

#[cfg(feature = "hydrate")]
const STORAGE_KEY: &str = "veltic.auth.session";

#[cfg(feature = "hydrate")]
struct GoTrue {
    base_url: String,
    anon_key: String,
    registry: ListenerRegistry,
    session: RefCell<Option<Session>>,
    /// Pending refresh for the current session; dropping it cancels.
    refresh_timer: RefCell<Option<gloo_timers::callback::Timeout>>,
}

/// Browser client for the GoTrue auth API.
///
/// Sessions are refreshed shortly before they expire. A failed refresh
/// signs the user out through the notification stream.
#[cfg(feature = "hydrate")]
pub struct SupabaseAuth {
    inner: Rc<GoTrue>,
}

#[cfg(feature = "hydrate")]
fn now_secs() -> i64 {
    #[allow(clippy::cast_possible_truncation)]
    let secs = (js_sys::Date::now() / 1000.0) as i64;
    secs
}

#[cfg(feature = "hydrate")]
impl GoTrue {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }

    fn load_stored() -> Option<Session> {
        let raw = Self::storage()?.get_item(STORAGE_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    /// Replace the session, persist it, and reschedule the refresh timer.
    fn store(this: &Rc<Self>, session: Option<&Session>) {
        this.session.replace(session.cloned());
        let timer = session.map(|s| {
            let weak = Rc::downgrade(this);
            gloo_timers::callback::Timeout::new(refresh_delay_ms(s.expires_at, now_secs()), move || {
                wasm_bindgen_futures::spawn_local(Self::auto_refresh(weak));
            })
        });
        // Replacing drops, and so cancels, the previous timer.
        this.refresh_timer.replace(timer);

        let Some(storage) = Self::storage() else {
            return;
        };
        match session.and_then(|s| serde_json::to_string(s).ok()) {
            Some(raw) => {
                let _ = storage.set_item(STORAGE_KEY, &raw);
            }
            None => {
                let _ = storage.remove_item(STORAGE_KEY);
            }
        }
    }

    async fn auto_refresh(this: Weak<Self>) {
        let Some(this) = this.upgrade() else {
            return;
        };
        let Some(refresh_token) = this.session.borrow().as_ref().map(|s| s.refresh_token.clone()) else {
            return;
        };
        let refreshed = if refresh_token.is_empty() {
            Err(AuthFailure::new("Session expired"))
        } else {
            this.refresh(&refresh_token).await
        };
        match refreshed {
            Ok(session) => {
                Self::store(&this, Some(&session));
                this.registry.emit(&AuthEvent { kind: AuthEventKind::TokenRefreshed, session: Some(session) });
            }
            Err(e) => {
                log::warn!("session refresh failed, signing out: {e}");
                Self::store(&this, None);
                this.registry.emit(&AuthEvent::signed_out());
            }
        }
    }

    async fn post_token(&self, grant_type: &str, body: &serde_json::Value, fallback: &str) -> Result<Session, AuthFailure> {
        let resp = gloo_net::http::Request::post(&token_endpoint(&self.base_url, grant_type))
            .header("apikey", &self.anon_key)
            .json(body)
            .map_err(|e| AuthFailure::new(e.to_string()))?
            .send()
            .await
            .map_err(|e| AuthFailure::new(e.to_string()))?;
        let text = resp.text().await.map_err(|e| AuthFailure::new(e.to_string()))?;
        if !resp.ok() {
            return Err(AuthFailure::new(auth_error_message(&text, fallback)));
        }
        let dto: super::types::SessionDto =
            serde_json::from_str(&text).map_err(|_| AuthFailure::new(fallback))?;
        Session::from_dto(dto, now_secs()).map_err(|e| AuthFailure::new(e.to_string()))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthFailure> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        self.post_token("refresh_token", &body, "Session expired").await
    }
}

#[cfg(feature = "hydrate")]
impl SupabaseAuth {
    #[must_use]
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            inner: Rc::new(GoTrue {
                base_url: base_url.trim_end_matches('/').to_owned(),
                anon_key: anon_key.to_owned(),
                registry: ListenerRegistry::new(),
                session: RefCell::new(None),
                refresh_timer: RefCell::new(None),
            }),
        }
    }
}

#[cfg(feature = "hydrate")]
#[async_trait(?Send)]
impl AuthBackend for SupabaseAuth {
    async fn current_session(&self) -> Result<Option<Session>, AuthFailure> {
        let inner = &self.inner;
        let Some(stored) = inner.session.borrow().clone().or_else(GoTrue::load_stored) else {
            return Ok(None);
        };
        if !stored.is_expired(now_secs()) {
            GoTrue::store(inner, Some(&stored));
            return Ok(Some(stored));
        }
        if stored.refresh_token.is_empty() {
            GoTrue::store(inner, None);
            return Ok(None);
        }
        match inner.refresh(&stored.refresh_token).await {
            Ok(session) => {
                GoTrue::store(inner, Some(&session));
                inner.registry.emit(&AuthEvent { kind: AuthEventKind::TokenRefreshed, session: Some(session.clone()) });
                Ok(Some(session))
            }
            Err(e) => {
                log::warn!("session refresh failed: {e}");
                GoTrue::store(inner, None);
                Ok(None)
            }
        }
    }

    fn on_auth_state_change(&self, callback: AuthCallback) -> AuthSubscription {
        self.inner.registry.register(callback)
    }

    fn access_token(&self) -> Option<String> {
        live_access_token(self.inner.session.borrow().as_ref(), now_secs())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthFailure> {
        let body = serde_json::json!({ "email": email, "password": password });
        let session = self.inner.post_token("password", &body, SIGN_IN_FALLBACK).await?;
        GoTrue::store(&self.inner, Some(&session));
        self.inner.registry.emit(&AuthEvent::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<SignUpOutcome, AuthFailure> {
        let inner = &self.inner;
        let url = format!("{}/auth/v1/signup", inner.base_url);
        let resp = gloo_net::http::Request::post(&url)
            .header("apikey", &inner.anon_key)
            .json(&signup_body(email, password, display_name))
            .map_err(|e| AuthFailure::new(e.to_string()))?
            .send()
            .await
            .map_err(|e| AuthFailure::new(e.to_string()))?;
        let text = resp.text().await.map_err(|e| AuthFailure::new(e.to_string()))?;
        if !resp.ok() {
            return Err(AuthFailure::new(auth_error_message(&text, SIGN_UP_FALLBACK)));
        }
        let dto: super::types::SessionDto = serde_json::from_str(&text).unwrap_or_default();
        match Session::from_dto(dto, now_secs()) {
            Ok(session) => {
                GoTrue::store(inner, Some(&session));
                inner.registry.emit(&AuthEvent::signed_in(session));
                Ok(SignUpOutcome::SignedIn)
            }
            Err(_) => Ok(SignUpOutcome::ConfirmationRequired),
        }
    }

    async fn sign_out(&self) -> Result<(), AuthFailure> {
        let inner = &self.inner;
        let token = self.access_token();
        // The local session is dropped regardless of what the service answers.
        GoTrue::store(inner, None);
        inner.registry.emit(&AuthEvent::signed_out());

        let Some(token) = token else {
            return Ok(());
        };
        let url = format!("{}/auth/v1/logout", inner.base_url);
        let resp = gloo_net::http::Request::post(&url)
            .header("apikey", &inner.anon_key)
            .header("Authorization", &format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| AuthFailure::new(e.to_string()))?;
        if resp.ok() || resp.status() == 401 {
            return Ok(());
        }
        let text = resp.text().await.unwrap_or_default();
        Err(AuthFailure::new(auth_error_message(&text, SIGN_OUT_FALLBACK)))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
