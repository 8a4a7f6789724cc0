//! Account creation page.
//!
//! The auth service normally requires email confirmation, so a successful
//! sign-up sends the user back to the login page rather than into the app.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::Services;
use crate::components::toaster::push_toast;
use crate::net::auth_client::SignUpOutcome;
use crate::state::toast::{ToastKind, ToastState};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const SIGNUP_CONFIRM: &str =
    "Account created successfully! Please check your email to confirm your registration.";
pub const SIGNUP_SIGNED_IN: &str = "Account created successfully!";
/// Delay before leaving the page so the confirmation toast can be read.
pub const REDIRECT_DELAY_MS: u64 = 1_500;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SignupInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

pub(crate) fn validate_signup(full_name: &str, email: &str, password: &str) -> Result<SignupInput, &'static str> {
    let full_name = full_name.trim();
    let email = email.trim();
    if full_name.is_empty() {
        return Err("Enter your full name.");
    }
    if email.is_empty() {
        return Err("Enter your email.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    Ok(SignupInput { full_name: full_name.to_owned(), email: email.to_owned(), password: password.to_owned() })
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let services = expect_context::<Services>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let navigate = use_navigate();

    let full_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let input = match validate_signup(&full_name.get(), &email.get(), &password.get()) {
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
            match provider.sign_up(&input.email, &input.password, Some(&input.full_name)).await {
                Ok(SignUpOutcome::ConfirmationRequired) => {
                    push_toast(toasts, ToastKind::Success, SIGNUP_CONFIRM);
                    #[cfg(feature = "hydrate")]
                    gloo_timers::future::sleep(std::time::Duration::from_millis(REDIRECT_DELAY_MS)).await;
                    navigate("/login", NavigateOptions::default());
                }
                Ok(SignUpOutcome::SignedIn) => {
                    push_toast(toasts, ToastKind::Success, SIGNUP_SIGNED_IN);
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
                <h1>"Create an account"</h1>
                <form class="auth-form" on:submit=on_submit>
                    <label class="auth-label" for="full-name">"Full Name"</label>
                    <input
                        id="full-name"
                        class="auth-input"
                        type="text"
                        placeholder="John Doe"
                        prop:value=move || full_name.get()
                        on:input=move |ev| full_name.set(event_target_value(&ev))
                        disabled=move || busy.get()
                    />
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
                    <label class="auth-label" for="password">"Password"</label>
                    <input
                        id="password"
                        class="auth-input"
                        type="password"
                        placeholder="Create a password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                        disabled=move || busy.get()
                    />
                    <p class="auth-hint">"Password must be at least 6 characters"</p>
                    <Show when=move || error.get().is_some()>
                        <p class="auth-error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating account..." } else { "Create account" }}
                    </button>
                </form>
                <p class="auth-footer">"Already have an account? " <a class="auth-link" href="/login">"Sign in"</a></p>
            </div>
        </div>
    }
}
