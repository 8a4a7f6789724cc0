//! REST API helpers for billing and subscription data.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, authorized with the
//! signed-in user's access token.
//! Server-side (SSR): every call fails with [`ApiError::Unavailable`] since
//! these endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result` outputs instead of panics so plan/subscription fetch
//! failures degrade into banners without crashing hydration.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;

use super::types::{CheckoutRequest, CheckoutResponse, ErrorBody, Plan};
use crate::config::AppConfig;
use crate::state::auth::AuthProvider;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Parse(String),
    #[error("not signed in")]
    NotSignedIn,
    #[error("no checkout URL returned")]
    MissingCheckoutUrl,
    #[error("not available outside the browser")]
    Unavailable,
}

impl ApiError {
    /// Text suitable for an inline error next to the action that failed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { body, .. } if !body.is_empty() => body.clone(),
            Self::NotSignedIn => "Please sign in again to continue.".to_owned(),
            Self::MissingCheckoutUrl => "No checkout URL returned".to_owned(),
            Self::Unavailable => "This action is only available in the browser.".to_owned(),
            Self::Request(_) | Self::Status { .. } | Self::Parse(_) => {
                "Something went wrong. Please try again later.".to_owned()
            }
        }
    }
}

/// Billing and subscription collaborator calls.
#[async_trait(?Send)]
pub trait BillingApi {
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the billing API fails or answers garbage.
    async fn list_plans(&self) -> Result<Vec<Plan>, ApiError>;

    /// Create a checkout session and return the URL to redirect to.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on failure, including a response with no URL.
    async fn create_checkout(&self, request: &CheckoutRequest, customer_email: &str) -> Result<String, ApiError>;

    /// Whether `user_id` has an active subscription.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the data API fails.
    async fn has_active_subscription(&self, user_id: &str) -> Result<bool, ApiError>;
}

#[cfg(any(test, feature = "hydrate"))]
fn plans_endpoint(base: &str) -> String {
    format!("{base}/plans")
}

#[cfg(any(test, feature = "hydrate"))]
fn checkout_endpoint(base: &str) -> String {
    format!("{base}/checkout")
}

#[cfg(any(test, feature = "hydrate"))]
fn active_subscription_query(supabase_url: &str, user_id: &str) -> String {
    format!("{supabase_url}/rest/v1/subscriptions?select=user_id,status&user_id=eq.{user_id}&status=eq.active&limit=1")
}

/// Turn a non-OK response body into an error, preferring the API's own message.
#[cfg(any(test, feature = "hydrate"))]
fn status_error(status: u16, body: &str) -> ApiError {
    let body = serde_json::from_str::<ErrorBody>(body).map_or_else(|_| body.trim().to_owned(), |e| e.error);
    ApiError::Status { status, body }
}

/// Accept a checkout response only if it carries a usable URL.
pub(crate) fn checkout_url(resp: CheckoutResponse) -> Result<String, ApiError> {
    resp.url.filter(|u| !u.trim().is_empty()).ok_or(ApiError::MissingCheckoutUrl)
}

/// Production [`BillingApi`] backed by the billing API and the data API.
#[derive(Clone)]
pub struct HttpBillingApi {
    config: AppConfig,
    auth: AuthProvider,
}

impl HttpBillingApi {
    #[must_use]
    pub fn new(config: AppConfig, auth: AuthProvider) -> Self {
        Self { config, auth }
    }

    #[cfg(feature = "hydrate")]
    fn bearer(&self) -> Result<String, ApiError> {
        self.auth.access_token().map(|t| format!("Bearer {t}")).ok_or(ApiError::NotSignedIn)
    }

    #[cfg(feature = "hydrate")]
    async fn read_ok(resp: gloo_net::http::Response) -> Result<String, ApiError> {
        let status = resp.status();
        let text = resp.text().await.map_err(|e| ApiError::Request(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(status_error(status, &text));
        }
        Ok(text)
    }
}

#[async_trait(?Send)]
impl BillingApi for HttpBillingApi {
    async fn list_plans(&self) -> Result<Vec<Plan>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(&plans_endpoint(&self.config.billing_api_base))
                .header("Authorization", &self.bearer()?)
                .send()
                .await
                .map_err(|e| ApiError::Request(e.to_string()))?;
            let text = Self::read_ok(resp).await?;
            serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&self.config, &self.auth);
            Err(ApiError::Unavailable)
        }
    }

    async fn create_checkout(&self, request: &CheckoutRequest, customer_email: &str) -> Result<String, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&checkout_endpoint(&self.config.billing_api_base))
                .header("Authorization", &self.bearer()?)
                .header("X-Customer-Email", customer_email)
                .json(request)
                .map_err(|e| ApiError::Request(e.to_string()))?
                .send()
                .await
                .map_err(|e| ApiError::Request(e.to_string()))?;
            let text = Self::read_ok(resp).await?;
            let body: CheckoutResponse = serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))?;
            checkout_url(body)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (request, customer_email);
            Err(ApiError::Unavailable)
        }
    }

    async fn has_active_subscription(&self, user_id: &str) -> Result<bool, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = active_subscription_query(&self.config.supabase_url, user_id);
            let resp = gloo_net::http::Request::get(&url)
                .header("apikey", &self.config.supabase_anon_key)
                .header("Authorization", &self.bearer()?)
                .send()
                .await
                .map_err(|e| ApiError::Request(e.to_string()))?;
            let text = Self::read_ok(resp).await?;
            let rows: Vec<super::types::SubscriptionRow> =
                serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))?;
            Ok(rows.iter().any(|row| row.user_id == user_id && row.status == "active"))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = user_id;
            Err(ApiError::Unavailable)
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
