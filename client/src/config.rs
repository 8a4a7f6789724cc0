//! Build-time client configuration.
//!
//! The browser bundle has no process environment, so values are baked in at
//! compile time through `option_env!`. Parsing goes through a lookup function
//! so it can be exercised without touching the real environment.
//!
//! Recognized variables:
//! - `SUPABASE_URL`: auth/data service endpoint (trailing `/` trimmed)
//! - `SUPABASE_ANON_KEY`: service public key
//! - `VELT_API_KEY`: collaboration SDK key
//! - `DESIGN_PREVIEW`: enables the internal design-preview overlay
//! - `BILLING_API_BASE`: billing API prefix, default `/api/billing`

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_BILLING_API_BASE: &str = "/api/billing";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub velt_api_key: String,
    pub design_preview: bool,
    pub billing_api_base: String,
}

impl AppConfig {
    /// Configuration compiled into this build.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| {
            let baked = match key {
                "SUPABASE_URL" => option_env!("SUPABASE_URL"),
                "SUPABASE_ANON_KEY" => option_env!("SUPABASE_ANON_KEY"),
                "VELT_API_KEY" => option_env!("VELT_API_KEY"),
                "DESIGN_PREVIEW" => option_env!("DESIGN_PREVIEW"),
                "BILLING_API_BASE" => option_env!("BILLING_API_BASE"),
                _ => None,
            };
            baked.map(ToOwned::to_owned)
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_owned()).unwrap_or_default();
        let billing_api_base = Some(value("BILLING_API_BASE"))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BILLING_API_BASE.to_owned());
        Self {
            supabase_url: value("SUPABASE_URL").trim_end_matches('/').to_owned(),
            supabase_anon_key: value("SUPABASE_ANON_KEY"),
            velt_api_key: value("VELT_API_KEY"),
            design_preview: lookup("DESIGN_PREVIEW").as_deref().and_then(parse_flag).unwrap_or(false),
            billing_api_base: billing_api_base.trim_end_matches('/').to_owned(),
        }
    }

    /// Whether the auth service is configured at all.
    #[must_use]
    pub fn has_auth_service(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
