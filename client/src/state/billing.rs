//! Plan catalog and checkout flow state.
//!
//! DESIGN
//! ======
//! Plain data plus async operations over [`BillingApi`]. The plans page wraps
//! [`PlansState`] in an `RwSignal` and drives the operations from
//! `spawn_local`; nothing here touches the DOM.

#[cfg(test)]
#[path = "billing_test.rs"]
mod billing_test;

use crate::net::api::{ApiError, BillingApi};
use crate::net::retry::{RetryPolicy, with_retry};
use crate::net::types::{CheckoutRequest, Identity, Plan};

pub const PLANS_LOAD_ERROR: &str = "Failed to load plans. Please try again later.";

/// Loading lifecycle of the plan list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PlansLoad {
    #[default]
    Loading,
    /// A retry is pending; carries the upcoming attempt number.
    Retrying(u32),
    Ready,
    Failed,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlansState {
    pub load: PlansLoad,
    pub plans: Vec<Plan>,
    pub banner_dismissed: bool,
    /// Price id of the checkout currently being created.
    pub processing: Option<String>,
    pub checkout_error: Option<String>,
}

impl PlansState {
    pub fn settle(&mut self, result: Result<Vec<Plan>, ApiError>) {
        match result {
            Ok(plans) => {
                self.plans = plans;
                self.load = PlansLoad::Ready;
            }
            Err(_) => {
                self.plans.clear();
                self.load = PlansLoad::Failed;
                self.banner_dismissed = false;
            }
        }
    }

    #[must_use]
    pub fn show_error_banner(&self) -> bool {
        self.load == PlansLoad::Failed && !self.banner_dismissed
    }

    /// Claim the single checkout slot. Returns `false` while another checkout
    /// is still processing.
    pub fn begin_checkout(&mut self, price_id: &str) -> bool {
        if self.processing.is_some() {
            return false;
        }
        self.processing = Some(price_id.to_owned());
        self.checkout_error = None;
        true
    }

    pub fn finish_checkout(&mut self, outcome: &CheckoutOutcome) {
        self.processing = None;
        if let CheckoutOutcome::Failed(message) = outcome {
            self.checkout_error = Some(message.clone());
        }
    }
}

/// Fetch active plans, cheapest first, retrying transient failures.
///
/// # Errors
///
/// Returns the last [`ApiError`] once the retry budget is spent.
pub async fn load_plans(
    api: &dyn BillingApi,
    policy: RetryPolicy,
    on_retry: impl Fn(u32),
) -> Result<Vec<Plan>, ApiError> {
    let mut plans = with_retry(policy, || api.list_plans(), on_retry).await?;
    plans.retain(|plan| plan.active);
    plans.sort_by_key(|plan| plan.amount);
    Ok(plans)
}

/// Result of asking the billing API for a checkout session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Send the browser here.
    Redirect(String),
    /// Show this inline; do not navigate.
    Failed(String),
}

#[must_use]
pub fn return_url(origin: &str) -> String {
    format!("{}/dashboard", origin.trim_end_matches('/'))
}

pub async fn start_checkout(api: &dyn BillingApi, plan: &Plan, user: &Identity, origin: &str) -> CheckoutOutcome {
    let request = CheckoutRequest {
        price_id: plan.id.clone(),
        user_id: user.id.clone(),
        return_url: return_url(origin),
    };
    match api.create_checkout(&request, &user.email).await {
        Ok(url) => CheckoutOutcome::Redirect(url),
        Err(e) => {
            leptos::logging::warn!("checkout for {} failed: {e}", plan.id);
            CheckoutOutcome::Failed(e.user_message())
        }
    }
}
