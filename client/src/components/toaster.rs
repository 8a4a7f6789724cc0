//! Toast stack rendered once at the app root.

use leptos::prelude::*;

use crate::state::toast::{TOAST_TTL_MS, ToastKind, ToastState};

/// Queue a toast and schedule its removal.
///
/// Takes the signal rather than reading context so it can be called from
/// inside spawned tasks.
pub fn push_toast(toasts: RwSignal<ToastState>, kind: ToastKind, message: impl Into<String>) {
    let message = message.into();
    let mut id = 0;
    toasts.update(|t| id = t.push(kind, message));

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::sleep(std::time::Duration::from_millis(TOAST_TTL_MS)).await;
        toasts.update(|t| t.dismiss(id));
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = (id, TOAST_TTL_MS);
}

#[component]
pub fn Toaster() -> impl IntoView {
    let toasts = expect_context::<RwSignal<ToastState>>();

    view! {
        <div class="toaster" aria-live="polite">
            <For
                each=move || toasts.get().toasts
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div
                            class=format!("toast {}", toast.kind.css_modifier())
                            on:click=move |_| toasts.update(|t| t.dismiss(id))
                        >
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
