//! Dismissible banner for data-fetch failures.

use leptos::prelude::*;

#[component]
pub fn ErrorBanner(#[prop(into)] message: Signal<Option<String>>, on_dismiss: Callback<()>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some()>
            <div class="error-banner" role="alert">
                <span class="error-banner__text">{move || message.get().unwrap_or_default()}</span>
                <button class="error-banner__dismiss" aria-label="Dismiss" on:click=move |_| on_dismiss.run(())>
                    "×"
                </button>
            </div>
        </Show>
    }
}
