//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared chrome (navigation, toasts, banners) and the
//! route guard, reading shared state from Leptos context providers.

pub mod charts;
pub mod collab_identity;
pub mod design_preview;
pub mod error_banner;
pub mod protected_route;
pub mod toaster;
pub mod top_nav;
