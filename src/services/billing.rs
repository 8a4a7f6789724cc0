//! Payment provider client: plan listing and hosted checkout sessions.
//!
//! DESIGN
//! ======
//! The provider speaks form-encoded requests and loosely typed JSON. Both
//! directions go through pure helpers (`checkout_form`, `parse_prices`,
//! `parse_checkout_url`) so the wire handling is tested without a network.
//!
//! ERROR HANDLING
//! ==============
//! Provider failures surface as [`BillingError`]; the route layer maps them
//! onto HTTP statuses. Individual price objects that cannot be narrowed are
//! skipped with a warning instead of failing the whole listing.

#[cfg(test)]
#[path = "billing_test.rs"]
mod billing_test;

use async_trait::async_trait;
use client::net::types::{NarrowError, Plan};
use serde::Deserialize;

use crate::config::HttpTimeouts;

const API_BASE: &str = "https://api.stripe.com/v1";
const DEFAULT_INTERVAL: &str = "month";

/// Errors produced by billing operations.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("billing is not configured")]
    NotConfigured,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    #[error("provider request failed: {0}")]
    ProviderRequest(String),

    #[error("provider error: status {status}: {message}")]
    ProviderResponse { status: u16, message: String },

    #[error("provider response parse failed: {0}")]
    ProviderParse(String),
}

/// Everything the provider needs to open a subscription checkout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutParams {
    pub price_id: String,
    pub user_id: String,
    pub customer_email: Option<String>,
    /// Where the provider sends the customer when they back out.
    pub cancel_url: String,
    /// Where the provider sends the customer after paying.
    pub success_url: String,
}

#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Active recurring prices.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError`] when the provider is unreachable or answers
    /// with a non-success status.
    async fn list_plans(&self) -> Result<Vec<Plan>, BillingError>;

    /// Open a hosted checkout session and return its URL.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError`] when the provider rejects the session or
    /// answers without a URL.
    async fn create_checkout(&self, params: &CheckoutParams) -> Result<String, BillingError>;
}

/// Success URL carrying the provider's session id placeholder.
#[must_use]
pub fn success_url(site_url: &str) -> String {
    format!("{site_url}/success?session_id={{CHECKOUT_SESSION_ID}}")
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct StripeBilling {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl StripeBilling {
    /// # Errors
    ///
    /// Returns [`BillingError::HttpClientBuild`] if the HTTP client cannot
    /// be constructed.
    pub fn new(secret_key: String, timeouts: HttpTimeouts) -> Result<Self, BillingError> {
        let http = super::http_client(timeouts).map_err(BillingError::HttpClientBuild)?;
        Ok(Self { http, secret_key, base_url: API_BASE.to_owned() })
    }

    async fn read(response: reqwest::Response) -> Result<String, BillingError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| BillingError::ProviderRequest(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(BillingError::ProviderResponse { status, message: provider_message(&text) });
        }
        Ok(text)
    }
}

#[async_trait]
impl BillingProvider for StripeBilling {
    async fn list_plans(&self) -> Result<Vec<Plan>, BillingError> {
        let response = self
            .http
            .get(format!("{}/prices", self.base_url))
            .bearer_auth(&self.secret_key)
            .query(&[("active", "true"), ("type", "recurring"), ("limit", "100")])
            .send()
            .await
            .map_err(|e| BillingError::ProviderRequest(e.to_string()))?;
        parse_prices(&Self::read(response).await?)
    }

    async fn create_checkout(&self, params: &CheckoutParams) -> Result<String, BillingError> {
        let response = self
            .http
            .post(format!("{}/checkout/sessions", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&checkout_form(params))
            .send()
            .await
            .map_err(|e| BillingError::ProviderRequest(e.to_string()))?;
        let url = parse_checkout_url(&Self::read(response).await?)?;
        tracing::info!(user_id = %params.user_id, price_id = %params.price_id, "checkout session created");
        Ok(url)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct PriceList {
    #[serde(default)]
    data: Vec<PriceDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PriceDto {
    pub id: Option<String>,
    pub active: Option<bool>,
    pub unit_amount: Option<i64>,
    pub currency: Option<String>,
    pub recurring: Option<RecurringDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecurringDto {
    pub interval: Option<String>,
    pub interval_count: Option<u32>,
}

impl TryFrom<PriceDto> for Plan {
    type Error = NarrowError;

    fn try_from(dto: PriceDto) -> Result<Self, Self::Error> {
        let id = dto.id.filter(|id| !id.is_empty()).ok_or(NarrowError::Missing("id"))?;
        let amount = dto.unit_amount.ok_or(NarrowError::Missing("unit_amount"))?;
        let currency = dto
            .currency
            .filter(|c| !c.is_empty())
            .ok_or(NarrowError::Missing("currency"))?
            .to_ascii_lowercase();
        let recurring = dto.recurring.unwrap_or_default();
        Ok(Self {
            id,
            amount,
            currency,
            interval: recurring.interval.unwrap_or_else(|| DEFAULT_INTERVAL.to_owned()),
            interval_count: recurring.interval_count.unwrap_or(1).max(1),
            active: dto.active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SessionDto {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Narrow a price-list response, dropping entries that cannot be narrowed.
///
/// # Errors
///
/// Returns [`BillingError::ProviderParse`] if the body is not a price list.
pub fn parse_prices(body: &str) -> Result<Vec<Plan>, BillingError> {
    let list: PriceList = serde_json::from_str(body).map_err(|e| BillingError::ProviderParse(e.to_string()))?;
    Ok(list
        .data
        .into_iter()
        .filter_map(|dto| {
            let id = dto.id.clone().unwrap_or_default();
            Plan::try_from(dto)
                .inspect_err(|e| tracing::warn!(price_id = %id, error = %e, "skipping malformed price"))
                .ok()
        })
        .collect())
}

/// # Errors
///
/// Returns [`BillingError::ProviderParse`] if the body is malformed or the
/// session has no URL.
pub fn parse_checkout_url(body: &str) -> Result<String, BillingError> {
    let session: SessionDto = serde_json::from_str(body).map_err(|e| BillingError::ProviderParse(e.to_string()))?;
    session
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| BillingError::ProviderParse("checkout session has no url".into()))
}

/// Human-readable message from a provider error body, else the raw text.
#[must_use]
pub fn provider_message(body: &str) -> String {
    serde_json::from_str::<ProviderErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
        .unwrap_or_else(|| body.trim().to_owned())
}

/// Form fields for a subscription checkout session.
#[must_use]
pub fn checkout_form(params: &CheckoutParams) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("mode", "subscription".to_owned()),
        ("line_items[0][price]", params.price_id.clone()),
        ("line_items[0][quantity]", "1".to_owned()),
        ("success_url", params.success_url.clone()),
        ("cancel_url", params.cancel_url.clone()),
        ("client_reference_id", params.user_id.clone()),
        ("metadata[user_id]", params.user_id.clone()),
        ("subscription_data[metadata][user_id]", params.user_id.clone()),
    ];
    if let Some(email) = params.customer_email.as_deref().filter(|e| !e.is_empty()) {
        form.push(("customer_email", email.to_owned()));
    }
    form
}
