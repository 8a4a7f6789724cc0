//! Header bar for the signed-in views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Shows primary navigation plus the current user, and owns the sign-out
//! action. Auth state changes arrive through the session store, so sign-out
//! only navigates once the service call returns.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::Services;
use crate::components::toaster::push_toast;
use crate::state::auth::AuthState;
use crate::state::toast::{ToastKind, ToastState};
use crate::util::collab::display_name;

#[component]
pub fn TopNav() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = expect_context::<Services>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let navigate = use_navigate();
    let busy = RwSignal::new(false);

    let user_name = move || auth.get().identity().map(display_name).unwrap_or_default();

    let on_sign_out = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        let provider = services.auth.get_value();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match provider.sign_out().await {
                Ok(()) => navigate("/", NavigateOptions::default()),
                Err(e) => push_toast(toasts, ToastKind::Error, e.message),
            }
            busy.set(false);
        });
    };

    view! {
        <header class="top-nav">
            <a class="top-nav__brand" href="/">"Veltic"</a>
            <nav class="top-nav__links">
                <a href="/dashboard">"Dashboard"</a>
                <a href="/analytics">"Analytics"</a>
                <a href="/plans">"Plans"</a>
            </nav>
            <span class="top-nav__spacer"></span>
            <span class="top-nav__user">{user_name}</span>
            <button class="top-nav__sign-out" on:click=on_sign_out disabled=move || busy.get()>
                "Sign out"
            </button>
        </header>
    }
}
