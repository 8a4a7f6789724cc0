//! # client
//!
//! Leptos + WASM frontend for the Veltic analytics dashboard.
//!
//! This crate contains pages, components, the auth session lifecycle, the
//! billing and auth service clients, and build-time configuration. The same
//! crate is compiled into the server (`ssr`) for rendering and into the
//! browser bundle (`hydrate`).

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: wire logging and hydrate the server-rendered page.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
