//! Server configuration parsed from environment variables.
//!
//! `main` loads `.env` through `dotenvy` before calling
//! [`ServerConfig::from_env`]. Parsing goes through a lookup function so tests
//! never touch the process environment.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is required")]
    Missing { var: &'static str },
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Auth/data service base URL, no trailing slash.
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Billing is disabled when absent.
    pub stripe_secret_key: Option<String>,
    /// Public origin used to build checkout return URLs.
    pub site_url: String,
    pub timeouts: HttpTimeouts,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Required:
    /// - `SUPABASE_URL`
    /// - `SUPABASE_ANON_KEY`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `STRIPE_SECRET_KEY`: billing endpoints answer 503 without it
    /// - `SITE_URL`: default `http://localhost:{PORT}`
    /// - `HTTP_TIMEOUT_SECS`: default 30
    /// - `HTTP_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required value is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let required = |var: &'static str| get(var).ok_or(ConfigError::Missing { var });

        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;
        let supabase_url = required("SUPABASE_URL")?.trim_end_matches('/').to_owned();
        let supabase_anon_key = required("SUPABASE_ANON_KEY")?;
        let site_url = get("SITE_URL")
            .map(|v| v.trim_end_matches('/').to_owned())
            .unwrap_or_else(|| format!("http://localhost:{port}"));
        let timeouts = HttpTimeouts {
            request_secs: parse_or("HTTP_TIMEOUT_SECS", get("HTTP_TIMEOUT_SECS"), DEFAULT_HTTP_TIMEOUT_SECS)?,
            connect_secs: parse_or(
                "HTTP_CONNECT_TIMEOUT_SECS",
                get("HTTP_CONNECT_TIMEOUT_SECS"),
                DEFAULT_HTTP_CONNECT_TIMEOUT_SECS,
            )?,
        };

        Ok(Self {
            port,
            supabase_url,
            supabase_anon_key,
            stripe_secret_key: get("STRIPE_SECRET_KEY"),
            site_url,
            timeouts,
        })
    }

    #[must_use]
    pub fn billing_enabled(&self) -> bool {
        self.stripe_secret_key.is_some()
    }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { var, value }),
    }
}
