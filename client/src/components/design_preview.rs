//! Internal design-preview overlay, enabled by the `DESIGN_PREVIEW` flag.
//!
//! Lists every route with its guard so designers can jump between screens.

use leptos::prelude::*;

use crate::config::AppConfig;
use crate::state::auth::AuthState;

pub static PREVIEW_ROUTES: [(&str, &str, bool); 7] = [
    ("/", "Landing", false),
    ("/login", "Sign in", false),
    ("/signup", "Sign up", false),
    ("/dashboard", "Dashboard", true),
    ("/analytics", "Analytics", true),
    ("/plans", "Plans", true),
    ("/success", "Checkout success", false),
];

#[component]
pub fn DesignPreview() -> impl IntoView {
    let config = expect_context::<AppConfig>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let open = RwSignal::new(false);

    let auth_label = move || match auth.get() {
        AuthState::Unknown => "unknown",
        AuthState::Anonymous => "anonymous",
        AuthState::Authenticated(_) => "authenticated",
    };

    view! {
        <Show when=move || config.design_preview>
            <aside class="design-preview" class:design-preview--open=move || open.get()>
                <button class="design-preview__toggle" on:click=move |_| open.update(|o| *o = !*o)>
                    "Preview"
                </button>
                <Show when=move || open.get()>
                    <p class="design-preview__state">"auth: " {auth_label}</p>
                    <ul class="design-preview__routes">
                        {PREVIEW_ROUTES
                            .iter()
                            .map(|&(path, label, guarded)| {
                                view! {
                                    <li>
                                        <a href=path>{label}</a>
                                        {guarded.then(|| view! { <span class="design-preview__guard">" (guarded)"</span> })}
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                </Show>
            </aside>
        </Show>
    }
}
