//! Email + password sign-in page.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::Services;
use crate::components::toaster::push_toast;
use crate::state::toast::{ToastKind, ToastState};

pub const LOGIN_SUCCESS: &str = "Login successful! Welcome back.";
pub const PASSWORD_RESET_INFO: &str = "Password reset functionality coming soon!";

/// Trimmed email plus password, or the message to show inline.
pub(crate) fn validate_login(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let services = expect_context::<Services>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) = match validate_login(&email.get(), &password.get()) {
            Ok(input) => input,
            Err(message) => {
                error.set(Some(message.to_owned()));
                return;
            }
        };
        busy.set(true);
        error.set(None);

        let provider = services.auth.get_value();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match provider.sign_in(&email_value, &password_value).await {
                Ok(()) => {
                    push_toast(toasts, ToastKind::Success, LOGIN_SUCCESS);
                    navigate("/dashboard", NavigateOptions::default());
                }
                Err(e) => {
                    error.set(Some(e.message.clone()));
                    push_toast(toasts, ToastKind::Error, e.message);
                }
            }
            busy.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign in to your account"</h1>
                <form class="auth-form" on:submit=on_submit>
                    <label class="auth-label" for="email">"Email"</label>
                    <input
                        id="email"
                        class="auth-input"
                        type="email"
                        placeholder="name@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                        disabled=move || busy.get()
                    />
                    <div class="auth-label-row">
                        <label class="auth-label" for="password">"Password"</label>
                        <a
                            href="#"
                            class="auth-link auth-link--small"
                            on:click=move |ev| {
                                ev.prevent_default();
                                push_toast(toasts, ToastKind::Info, PASSWORD_RESET_INFO);
                            }
                        >
                            "Forgot password?"
                        </a>
                    </div>
                    <input
                        id="password"
                        class="auth-input"
                        type="password"
                        placeholder="Enter your password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                        disabled=move || busy.get()
                    />
                    <Show when=move || error.get().is_some()>
                        <p class="auth-error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <p class="auth-footer">"Don't have an account? " <a class="auth-link" href="/signup">"Sign up"</a></p>
            </div>
        </div>
    }
}
