//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Builds the auth provider and billing API once, bridges the session store
//! into an `RwSignal<AuthState>`, and mounts the session lifecycle in the
//! browser. On the server the provider is never mounted, so SSR always
//! renders the `Unknown` state and hydration starts from the same place.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::collab_identity::{CollabIdentity, CollabReady};
use crate::components::design_preview::DesignPreview;
use crate::components::protected_route::ProtectedRoute;
use crate::components::toaster::Toaster;
use crate::config::AppConfig;
use crate::net::api::{BillingApi, HttpBillingApi};
use crate::net::auth_client::{AuthBackend, UnavailableAuth};
use crate::pages::{
    analytics::AnalyticsPage, dashboard::DashboardPage, home::HomePage, login::LoginPage, plans::PlansPage,
    signup::SignupPage, success::SuccessPage,
};
use crate::state::auth::{AuthProvider, AuthState};
use crate::state::toast::ToastState;
use crate::util::collab::SDK_URL;

/// Single-threaded collaborators, shared through context as arena handles.
#[derive(Clone, Copy)]
pub struct Services {
    pub auth: StoredValue<AuthProvider, LocalStorage>,
    pub billing: StoredValue<Rc<dyn BillingApi>, LocalStorage>,
}

/// Upcoming attempt number while the initial session fetch is retrying.
#[derive(Clone, Copy)]
pub struct AuthRetry(pub RwSignal<Option<u32>>);

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    let collab_enabled = !AppConfig::from_build_env().velt_api_key.is_empty();
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
                {collab_enabled.then(|| view! { <script src=SDK_URL defer=true></script> })}
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

fn auth_backend(config: &AppConfig) -> Rc<dyn AuthBackend> {
    #[cfg(feature = "hydrate")]
    {
        if config.has_auth_service() {
            return Rc::new(crate::net::auth_client::SupabaseAuth::new(
                &config.supabase_url,
                &config.supabase_anon_key,
            ));
        }
        leptos::logging::warn!("SUPABASE_URL / SUPABASE_ANON_KEY not set; sign-in is disabled");
    }
    #[cfg(not(feature = "hydrate"))]
    let _ = config;
    Rc::new(UnavailableAuth::default())
}

/// Root application component.
///
/// Provides all shared state contexts and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AppConfig::from_build_env();
    let provider = AuthProvider::new(auth_backend(&config));
    let billing: Rc<dyn BillingApi> = Rc::new(HttpBillingApi::new(config.clone(), provider.clone()));

    let auth = RwSignal::new(AuthState::default());
    let retry = RwSignal::new(None::<u32>);
    let toasts = RwSignal::new(ToastState::default());
    let collab_ready = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    {
        let observer = provider.store().subscribe(move |state: &AuthState| {
            auth.set(state.clone());
            if !state.is_loading() {
                retry.set(None);
            }
        });
        let mount = provider.mount(move |attempt| retry.set(Some(attempt)));
        leptos::task::spawn_local(mount.initial_fetch);

        // Dropping both guards unmounts the lifecycle and the observer.
        let guards = StoredValue::new_local(Some((observer, mount.lifecycle)));
        on_cleanup(move || guards.set_value(None));

        let api_key = config.velt_api_key.clone();
        leptos::task::spawn_local(async move {
            use crate::util::collab::CollabOutcome;

            match crate::util::collab::init(&api_key).await {
                Ok(CollabOutcome::Applied) => collab_ready.set(true),
                Ok(CollabOutcome::SdkMissing) => leptos::logging::log!("collaboration SDK not loaded"),
                Err(e) => leptos::logging::warn!("collaboration init failed: {e}"),
            }
        });
    }

    provide_context(Services {
        auth: StoredValue::new_local(provider),
        billing: StoredValue::new_local(billing),
    });
    provide_context(AuthRetry(retry));
    provide_context(CollabReady(collab_ready));
    provide_context(auth);
    provide_context(toasts);
    provide_context(config);

    view! {
        <Stylesheet id="leptos" href="/pkg/veltic.css"/>
        <Title text="Veltic"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=HomePage/>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("signup") view=SignupPage/>
                <Route path=StaticSegment("dashboard") view=|| guarded(DashboardPage)/>
                <Route path=StaticSegment("analytics") view=|| guarded(AnalyticsPage)/>
                <Route path=StaticSegment("plans") view=|| guarded(PlansPage)/>
                <Route path=StaticSegment("success") view=SuccessPage/>
            </Routes>
            <DesignPreview/>
        </Router>
        <Toaster/>
    }
}

/// Wrap a page in the route guard and the collaboration identity handoff.
fn guarded<V: IntoView + 'static>(page: fn() -> V) -> impl IntoView {
    view! {
        <ProtectedRoute>
            <CollabIdentity/>
            {page()}
        </ProtectedRoute>
    }
}
