//! Subscription plan selection and checkout hand-off.
//!
//! SYSTEM CONTEXT
//! ==============
//! Plans come from the billing API with bounded retry. Choosing one creates a
//! hosted checkout session and sends the browser there; on failure the page
//! stays put with an inline error.

use leptos::prelude::*;

use crate::app::Services;
use crate::components::error_banner::ErrorBanner;
use crate::components::toaster::push_toast;
use crate::components::top_nav::TopNav;
use crate::net::types::Plan;
use crate::state::auth::AuthState;
use crate::state::billing::{CheckoutOutcome, PLANS_LOAD_ERROR, PlansLoad, PlansState, start_checkout};
use crate::state::toast::{ToastKind, ToastState};
use crate::util::format::{PlanTier, format_price, plan_cadence};

pub const CHECKOUT_REDIRECT: &str = "Redirecting to checkout...";
pub const CHECKOUT_FAILED: &str = "Failed to process subscription. Please try again.";

#[component]
pub fn PlansPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = expect_context::<Services>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let plans = RwSignal::new(PlansState::default());

    #[cfg(feature = "hydrate")]
    {
        let api = services.billing.get_value();
        leptos::task::spawn_local(async move {
            let on_retry = move |attempt| plans.update(|p| p.load = PlansLoad::Retrying(attempt));
            let result = crate::state::billing::load_plans(
                api.as_ref(),
                crate::net::retry::RetryPolicy::default(),
                on_retry,
            )
            .await;
            plans.update(|p| p.settle(result));
        });
    }

    let on_select = Callback::new(move |plan: Plan| {
        let Some(user) = auth.get_untracked().identity().cloned() else {
            return;
        };
        let mut claimed = false;
        plans.update(|p| claimed = p.begin_checkout(&plan.id));
        if !claimed {
            return;
        }
        let api = services.billing.get_value();
        leptos::task::spawn_local(async move {
            let outcome = start_checkout(api.as_ref(), &plan, &user, &window_origin()).await;
            match &outcome {
                CheckoutOutcome::Redirect(url) => {
                    push_toast(toasts, ToastKind::Success, CHECKOUT_REDIRECT);
                    redirect(url);
                }
                CheckoutOutcome::Failed(_) => push_toast(toasts, ToastKind::Error, CHECKOUT_FAILED),
            }
            plans.update(|p| p.finish_checkout(&outcome));
        });
    });

    let status_text = move || match plans.get().load {
        PlansLoad::Loading => Some("Loading plans...".to_owned()),
        PlansLoad::Retrying(attempt) => Some(format!("Retrying (attempt {attempt})…")),
        PlansLoad::Ready | PlansLoad::Failed => None,
    };
    let banner = Signal::derive(move || plans.get().show_error_banner().then(|| PLANS_LOAD_ERROR.to_owned()));

    view! {
        <div class="app-page">
            <TopNav/>
            <main class="app-page__main plans-page">
                <div class="plans-page__intro">
                    <h1>"Choose Your Plan"</h1>
                    <p>
                        "Unlock advanced analytics features and visualizations with our premium plans. "
                        "Choose the plan that best fits your needs."
                    </p>
                </div>
                <ErrorBanner message=banner on_dismiss=Callback::new(move |()| plans.update(|p| p.banner_dismissed = true))/>
                <Show when=move || status_text().is_some()>
                    <p class="plans-page__status">{move || status_text().unwrap_or_default()}</p>
                </Show>
                <Show when=move || plans.get().checkout_error.is_some()>
                    <p class="plans-page__checkout-error">
                        {move || plans.get().checkout_error.unwrap_or_default()}
                    </p>
                </Show>
                <div class="plan-grid">
                    <For
                        each=move || plans.get().plans
                        key=|plan| plan.id.clone()
                        children=move |plan| view! { <PlanCard plan=plan plans=plans on_select=on_select/> }
                    />
                </div>
                <section class="plans-page__secure">
                    <h3>"100% Secure Payments"</h3>
                    <p>
                        "All payments are processed securely through our payment provider. "
                        "We do not store your credit card information. You can cancel your subscription at any time."
                    </p>
                </section>
            </main>
        </div>
    }
}

#[component]
fn PlanCard(plan: Plan, plans: RwSignal<PlansState>, on_select: Callback<Plan>) -> impl IntoView {
    let tier = PlanTier::for_amount(plan.amount);
    let price_id = plan.id.clone();
    let processing_this = move || plans.get().processing.as_deref() == Some(price_id.as_str());
    let any_processing = move || plans.get().processing.is_some();
    let cadence = plan_cadence(&plan);
    let price = format_price(plan.amount, &plan.currency);
    let interval = format!("/{}", plan.interval);

    view! {
        <article class="plan-card">
            <header class="plan-card__header">
                <h2>{tier.label()}</h2>
                <span class="plan-card__cadence">{cadence}</span>
                <p class="plan-card__price">
                    <span class="plan-card__amount">{price}</span>
                    <span class="plan-card__interval">{interval}</span>
                </p>
            </header>
            <ul class="plan-card__features">
                {tier.features().iter().map(|f| view! { <li>{*f}</li> }).collect_view()}
            </ul>
            <button
                class="plan-card__subscribe"
                disabled=any_processing
                on:click=move |_| on_select.run(plan.clone())
            >
                {move || if processing_this() { "Processing..." } else { "Subscribe Now" }}
            </button>
        </article>
    }
}

fn window_origin() -> String {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window().and_then(|w| w.location().origin().ok()).unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        String::new()
    }
}

fn redirect(url: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(url);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    let _ = url;
}
