//! Billing API routes: plan listing and checkout session creation.
//!
//! ERROR HANDLING
//! ==============
//! Every failure leaves as `{ "error": message }` with a status from
//! [`billing_error_to_status`] or the auth extractor. Provider failures are
//! logged here with their detail; the body carries a short message the
//! browser can show as-is.

#[cfg(test)]
#[path = "billing_test.rs"]
mod billing_test;

use axum::Json;
use axum::extract::{FromRef, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use client::net::types::{CheckoutRequest, CheckoutResponse, ErrorBody, Plan};

use crate::services::billing::{BillingError, CheckoutParams, success_url};
use crate::services::identity::{IdentityError, bearer_token};
use crate::state::AppState;

pub const CUSTOMER_EMAIL_HEADER: &str = "x-customer-email";

// =============================================================================
// ERRORS
// =============================================================================

/// JSON error response.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

impl From<BillingError> for ApiFailure {
    fn from(err: BillingError) -> Self {
        let status = billing_error_to_status(&err);
        let message = match &err {
            BillingError::NotConfigured => "Billing is not available right now.".to_owned(),
            BillingError::InvalidRequest(message) => message.clone(),
            BillingError::ProviderResponse { message, .. } if status == StatusCode::BAD_REQUEST => message.clone(),
            _ => "Billing provider request failed.".to_owned(),
        };
        if status.is_server_error() {
            tracing::error!(error = %err, %status, "billing request failed");
        } else {
            tracing::warn!(error = %err, %status, "billing request rejected");
        }
        Self::new(status, message)
    }
}

pub(crate) fn billing_error_to_status(err: &BillingError) -> StatusCode {
    match err {
        BillingError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        BillingError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        BillingError::ProviderResponse { status: 400 | 404, .. } => StatusCode::BAD_REQUEST,
        BillingError::ProviderResponse { .. } | BillingError::ProviderRequest(_) | BillingError::ProviderParse(_) => {
            StatusCode::BAD_GATEWAY
        }
        BillingError::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn identity_error_to_status(err: &IdentityError) -> StatusCode {
    match err {
        IdentityError::InvalidToken => StatusCode::UNAUTHORIZED,
        IdentityError::Request(_) | IdentityError::Response(_) => StatusCode::BAD_GATEWAY,
        IdentityError::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Caller verified from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Missing bearer token."))?;

        let app_state = AppState::from_ref(state);
        let user = app_state.verifier.verify(token).await.map_err(|e| {
            let status = identity_error_to_status(&e);
            if status == StatusCode::UNAUTHORIZED {
                ApiFailure::new(status, "Your session has expired. Please sign in again.")
            } else {
                tracing::error!(error = %e, "token verification failed");
                ApiFailure::new(status, "Could not verify your session.")
            }
        })?;

        Ok(Self { id: user.id, email: user.email })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/billing/plans`
pub async fn list_plans(State(state): State<AppState>, _user: AuthUser) -> Result<Json<Vec<Plan>>, ApiFailure> {
    let billing = state.billing.as_ref().ok_or(BillingError::NotConfigured)?;
    let plans = billing.list_plans().await?;
    Ok(Json(plans))
}

/// `POST /api/billing/checkout`
pub async fn create_checkout(
    State(state): State<AppState>,
    user: AuthUser,
    headers: HeaderMap,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiFailure> {
    if body.user_id != user.id {
        tracing::warn!(caller = %user.id, requested = %body.user_id, "checkout user mismatch");
        return Err(ApiFailure::new(StatusCode::FORBIDDEN, "You can only subscribe for your own account."));
    }
    let price_id = body.price_id.trim();
    if price_id.is_empty() {
        return Err(BillingError::InvalidRequest("price_id is required".into()).into());
    }
    let billing = state.billing.as_ref().ok_or(BillingError::NotConfigured)?;

    let params = CheckoutParams {
        price_id: price_id.to_owned(),
        user_id: user.id,
        customer_email: customer_email(&headers).or(user.email),
        cancel_url: cancel_url(&body.return_url, &state.config.site_url),
        success_url: success_url(&state.config.site_url),
    };
    let url = billing.create_checkout(&params).await?;
    Ok(Json(CheckoutResponse { url: Some(url) }))
}

fn customer_email(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CUSTOMER_EMAIL_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

/// The caller's return URL when it points into this site, else the
/// dashboard.
fn cancel_url(return_url: &str, site_url: &str) -> String {
    let return_url = return_url.trim();
    if is_same_site(return_url, site_url) {
        return return_url.to_owned();
    }
    if !return_url.is_empty() {
        tracing::warn!(%return_url, "return url outside site; using dashboard");
    }
    format!("{site_url}/dashboard")
}

fn is_same_site(url: &str, site_url: &str) -> bool {
    match url.strip_prefix(site_url) {
        Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
        None => false,
    }
}
