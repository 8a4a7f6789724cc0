#![recursion_limit = "256"]

mod config;
mod routes;
mod services;
mod state;

use std::process::ExitCode;
use std::sync::Arc;

use services::billing::{BillingProvider, StripeBilling};
use services::identity::SupabaseVerifier;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = match config::ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        site_url = %config.site_url,
        billing = config.billing_enabled(),
        "configuration loaded"
    );

    let verifier = match SupabaseVerifier::new(&config) {
        Ok(verifier) => verifier,
        Err(e) => {
            tracing::error!(error = %e, "auth verifier init failed");
            return ExitCode::FAILURE;
        }
    };

    // Non-fatal: billing routes answer 503 without a provider.
    let billing = match config.stripe_secret_key.clone() {
        Some(key) => match StripeBilling::new(key, config.timeouts) {
            Ok(stripe) => {
                tracing::info!("billing provider initialized");
                Some(Arc::new(stripe) as Arc<dyn BillingProvider>)
            }
            Err(e) => {
                tracing::warn!(error = %e, "billing provider init failed; billing disabled");
                None
            }
        },
        None => {
            tracing::warn!("STRIPE_SECRET_KEY not set; billing disabled");
            None
        }
    };

    let port = config.port;
    let state = state::AppState::new(config, billing, Arc::new(verifier));

    let app = match routes::leptos_app(state) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "router assembly failed");
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %port, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%port, "veltic listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
