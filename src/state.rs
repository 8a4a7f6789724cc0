//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the parsed config and the two outbound collaborators behind trait
//! objects. Billing is optional: without a provider key the billing routes
//! answer 503 instead of the server refusing to start.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::billing::BillingProvider;
use crate::services::identity::TokenVerifier;

/// Clone is required by Axum; all fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub billing: Option<Arc<dyn BillingProvider>>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: ServerConfig,
        billing: Option<Arc<dyn BillingProvider>>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self { config: Arc::new(config), billing, verifier }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
