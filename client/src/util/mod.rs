//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pure decision and formatting logic lives here so pages and components stay
//! thin and the rules stay testable without a browser.

pub mod auth;
pub mod collab;
pub mod format;
pub mod sample;
