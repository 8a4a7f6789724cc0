//! Premium gating for the current user.

#[cfg(test)]
#[path = "subscription_test.rs"]
mod subscription_test;

use crate::net::api::{ApiError, BillingApi};

pub const SUBSCRIPTION_LOAD_ERROR: &str = "Could not check your subscription. Premium features are hidden for now.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubscriptionStatus {
    #[default]
    Unknown,
    Free,
    Premium,
}

impl SubscriptionStatus {
    #[must_use]
    pub fn is_premium(self) -> bool {
        self == Self::Premium
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscriptionState {
    pub status: SubscriptionStatus,
    /// Banner text after a failed lookup, cleared on dismiss.
    pub error: Option<String>,
}

impl SubscriptionState {
    /// Record a lookup result. Failures fall back to `Free`.
    pub fn settle(&mut self, result: Result<SubscriptionStatus, ApiError>) {
        match result {
            Ok(status) => {
                self.status = status;
                self.error = None;
            }
            Err(e) => {
                leptos::logging::warn!("subscription lookup failed: {e}");
                self.status = SubscriptionStatus::Free;
                self.error = Some(SUBSCRIPTION_LOAD_ERROR.to_owned());
            }
        }
    }
}

/// # Errors
///
/// Propagates the [`ApiError`] from the data API.
pub async fn fetch_status(api: &dyn BillingApi, user_id: &str) -> Result<SubscriptionStatus, ApiError> {
    let premium = api.has_active_subscription(user_id).await?;
    Ok(if premium { SubscriptionStatus::Premium } else { SubscriptionStatus::Free })
}
