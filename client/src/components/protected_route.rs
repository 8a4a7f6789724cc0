//! Route guard wrapper for authenticated pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps the guarded subtree of `/dashboard`, `/analytics`, and `/plans`.
//! The decision itself is [`guard_decision`]; this component only renders it
//! and performs the redirect.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::AuthRetry;
use crate::state::auth::AuthState;
use crate::util::auth::{GuardDecision, guard_decision};

#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let retry = expect_context::<AuthRetry>();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| guard_decision(&auth.get()));

    Effect::new(move || {
        if let GuardDecision::Redirect(to) = decision.get() {
            navigate(to, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let placeholder = move || match (decision.get(), retry.0.get()) {
        (GuardDecision::Redirect(_), _) => "Redirecting...".to_owned(),
        (_, Some(attempt)) => format!("Retrying (attempt {attempt})…"),
        _ => "Loading...".to_owned(),
    };

    view! {
        <Show
            when=move || decision.get() == GuardDecision::Render
            fallback=move || view! { <div class="route-placeholder">{placeholder}</div> }
        >
            {children()}
        </Show>
    }
}
