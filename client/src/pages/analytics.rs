//! Analytics view with premium gating.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered on its own at `/analytics` and embedded in `/dashboard`. Looks up
//! the user's subscription once per identity; premium unlocks the gated
//! panels, everything else (including a failed lookup) shows the free view.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::Services;
use crate::components::charts::{AnalyticsChart, HeatMap, MetricCards};
use crate::components::collab_identity::CollabDocument;
use crate::components::error_banner::ErrorBanner;
use crate::components::toaster::push_toast;
use crate::state::auth::AuthState;
use crate::state::subscription::{SubscriptionState, SubscriptionStatus, fetch_status};
use crate::state::toast::{ToastKind, ToastState};
use crate::util::collab::ANALYTICS_DOCUMENT;
use crate::util::sample::{SeriesKind, series};

pub const UPGRADE_INFO: &str = "Choose a subscription plan to unlock premium features";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Overview,
    Activity,
}

#[component]
pub fn AnalyticsView() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = expect_context::<Services>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let navigate = use_navigate();

    let subscription = RwSignal::new(SubscriptionState::default());
    let tab = RwSignal::new(Tab::Overview);
    let seed = RwSignal::new(1_u64);

    let user_id = Memo::new(move |_| auth.get().identity().map(|i| i.id.clone()));
    Effect::new(move || {
        let Some(user_id) = user_id.get() else {
            return;
        };
        let api = services.billing.get_value();
        leptos::task::spawn_local(async move {
            let result = fetch_status(api.as_ref(), &user_id).await;
            subscription.update(|s| s.settle(result));
        });
    });

    let is_premium = Signal::derive(move || subscription.get().status.is_premium());
    let show_upgrade = move || subscription.get().status == SubscriptionStatus::Free;
    let banner = Signal::derive(move || subscription.get().error);

    let on_upgrade = move |_| {
        navigate("/plans", NavigateOptions::default());
        push_toast(toasts, ToastKind::Info, UPGRADE_INFO);
    };

    let activity = move || {
        series(SeriesKind::Engagement, seed.get(), 5)
            .into_iter()
            .zip('A'..='E')
            .enumerate()
            .map(|(i, (value, letter))| {
                view! {
                    <li class="activity-item">
                        <span class="activity-item__avatar">{letter.to_string()}</span>
                        <span class="activity-item__label">{format!("User Activity {}", i + 1)}</span>
                        <span class="activity-item__score">{format!("{}%", value.min(100))}</span>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <section class="analytics">
            <ErrorBanner
                message=banner
                on_dismiss=Callback::new(move |()| subscription.update(|s| s.error = None))
            />
            <div class="analytics__header">
                <div>
                    <h1>"Analytics Dashboard"</h1>
                    <p class="analytics__subtitle">"Interactive data visualizations and insights"</p>
                </div>
                <div class="analytics__actions">
                    <button class="analytics__refresh" on:click=move |_| seed.update(|s| *s += 1)>
                        "Refresh"
                    </button>
                    <Show when=show_upgrade>
                        <button class="analytics__upgrade" on:click=on_upgrade.clone()>
                            "Upgrade to Pro"
                        </button>
                    </Show>
                    <Show when=move || is_premium.get()>
                        <span class="analytics__badge">"Premium Account"</span>
                    </Show>
                </div>
            </div>
            <div class="analytics__tabs">
                <button
                    class="analytics__tab"
                    class:analytics__tab--active=move || tab.get() == Tab::Overview
                    on:click=move |_| tab.set(Tab::Overview)
                >
                    "Overview"
                </button>
                <button
                    class="analytics__tab"
                    class:analytics__tab--active=move || tab.get() == Tab::Activity
                    on:click=move |_| tab.set(Tab::Activity)
                >
                    "Activity"
                </button>
            </div>
            <Show
                when=move || tab.get() == Tab::Overview
                fallback=move || view! { <ul class="activity-list">{activity}</ul> }
            >
                <MetricCards/>
                <div class="analytics__grid">
                    <AnalyticsChart seed=seed is_premium=is_premium/>
                    <HeatMap seed=seed is_premium=is_premium/>
                </div>
            </Show>
            <velt-comments></velt-comments>
        </section>
    }
}

#[component]
pub fn AnalyticsPage() -> impl IntoView {
    view! {
        <div class="app-page">
            <CollabDocument name=ANALYTICS_DOCUMENT/>
            <crate::components::top_nav::TopNav/>
            <main class="app-page__main">
                <AnalyticsView/>
            </main>
        </div>
    }
}
