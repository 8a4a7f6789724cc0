//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Guarding happens in `app`, not in the pages.

pub mod analytics;
pub mod dashboard;
pub mod home;
pub mod login;
pub mod plans;
pub mod signup;
pub mod success;
