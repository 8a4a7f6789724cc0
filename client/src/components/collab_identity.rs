//! Hand-off of user and document to the collaboration SDK.
//!
//! Both components render nothing. They wait on [`CollabReady`], which the
//! app root flips once the SDK client has been initialized.

use leptos::prelude::*;

use crate::state::auth::AuthState;
use crate::util::collab::{CollabUser, DOCUMENT_ID, identify, set_document};

/// Whether the collaboration SDK client is initialized.
#[derive(Clone, Copy)]
pub struct CollabReady(pub RwSignal<bool>);

/// Identifies the signed-in user. Mounted inside every guarded route.
#[component]
pub fn CollabIdentity() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let ready = expect_context::<CollabReady>();

    // Re-identify only when the identity itself changes.
    let user = Memo::new(move |_| auth.get().identity().map(CollabUser::from_identity));

    Effect::new(move || {
        let Some(user) = user.get() else {
            return;
        };
        if !ready.0.get() {
            return;
        }
        match identify(&user) {
            Ok(outcome) => leptos::logging::log!("collaboration identify for {}: {outcome:?}", user.name),
            Err(e) => leptos::logging::warn!("collaboration identify failed: {e}"),
        }
    });
}

/// Attaches the page's presence and comments to the shared document.
#[component]
pub fn CollabDocument(name: &'static str) -> impl IntoView {
    let ready = expect_context::<CollabReady>();

    Effect::new(move || {
        if !ready.0.get() {
            return;
        }
        if let Err(e) = set_document(DOCUMENT_ID, name) {
            leptos::logging::warn!("collaboration set_document failed: {e}");
        }
    });
}
