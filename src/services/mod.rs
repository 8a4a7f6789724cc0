//! Outbound collaborators of the billing API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `billing` talks to the payment provider, `identity` verifies caller
//! tokens against the auth service. Both sit behind traits so route tests
//! run against in-memory fakes.

pub mod billing;
pub mod identity;

use std::time::Duration;

use crate::config::HttpTimeouts;

/// Shared outbound HTTP client settings.
///
/// # Errors
///
/// Returns the builder error text when the TLS backend cannot initialize.
pub fn http_client(timeouts: HttpTimeouts) -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeouts.request_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .build()
        .map_err(|e| e.to_string())
}
