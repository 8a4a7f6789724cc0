//! Client state modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` owns the session lifecycle. `billing`, `subscription`, and `toast`
//! are plain data wrapped in signals by the pages that use them.

pub mod auth;
pub mod billing;
pub mod subscription;
pub mod toast;
