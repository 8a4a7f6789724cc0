//! Landing page after the billing provider's hosted checkout.

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

#[component]
pub fn SuccessPage() -> impl IntoView {
    let query = use_query_map();
    let session_id = move || query.with(|q| q.get("session_id"));

    view! {
        <div class="success-page">
            <div class="success-card">
                <h1>"Payment successful!"</h1>
                <p>"Thank you for subscribing. Your premium features are now available."</p>
                <Show when=move || session_id().is_some()>
                    <p class="success-card__ref">"Reference: " {move || session_id().unwrap_or_default()}</p>
                </Show>
                <a class="success-card__cta" href="/dashboard">"Go to dashboard"</a>
            </div>
        </div>
    }
}
