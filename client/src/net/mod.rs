//! Networking modules for the hosted auth, data, and billing services.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth_client` talks to the auth service, `api` handles billing and
//! subscription REST calls, `retry` wraps idempotent fetches, and `types`
//! defines the wire schema plus its narrowing into domain types.

pub mod api;
pub mod auth_client;
pub mod retry;
pub mod types;
