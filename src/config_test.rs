use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

const REQUIRED: [(&str, &str); 2] = [("SUPABASE_URL", "https://abc.supabase.co/"), ("SUPABASE_ANON_KEY", "anon")];

#[test]
fn from_lookup_defaults() {
    let cfg = ServerConfig::from_lookup(lookup(&REQUIRED)).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.supabase_url, "https://abc.supabase.co");
    assert_eq!(cfg.supabase_anon_key, "anon");
    assert_eq!(cfg.stripe_secret_key, None);
    assert!(!cfg.billing_enabled());
    assert_eq!(cfg.site_url, "http://localhost:3000");
    assert_eq!(
        cfg.timeouts,
        HttpTimeouts { request_secs: DEFAULT_HTTP_TIMEOUT_SECS, connect_secs: DEFAULT_HTTP_CONNECT_TIMEOUT_SECS }
    );
}

#[test]
fn from_lookup_reads_overrides() {
    let mut pairs = REQUIRED.to_vec();
    pairs.extend([
        ("PORT", "8080"),
        ("STRIPE_SECRET_KEY", "sk_test_123"),
        ("SITE_URL", "https://app.example.com/"),
        ("HTTP_TIMEOUT_SECS", "5"),
        ("HTTP_CONNECT_TIMEOUT_SECS", "2"),
    ]);
    let cfg = ServerConfig::from_lookup(lookup(&pairs)).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.stripe_secret_key.as_deref(), Some("sk_test_123"));
    assert!(cfg.billing_enabled());
    assert_eq!(cfg.site_url, "https://app.example.com");
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 5, connect_secs: 2 });
}

#[test]
fn site_url_default_follows_port() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("PORT", "4000"));
    let cfg = ServerConfig::from_lookup(lookup(&pairs)).unwrap();
    assert_eq!(cfg.site_url, "http://localhost:4000");
}

#[test]
fn missing_supabase_url_is_an_error() {
    let err = ServerConfig::from_lookup(lookup(&[("SUPABASE_ANON_KEY", "anon")])).unwrap_err();
    assert_eq!(err, ConfigError::Missing { var: "SUPABASE_URL" });
}

#[test]
fn blank_required_value_counts_as_missing() {
    let err = ServerConfig::from_lookup(lookup(&[("SUPABASE_URL", "https://x.co"), ("SUPABASE_ANON_KEY", "  ")]))
        .unwrap_err();
    assert_eq!(err, ConfigError::Missing { var: "SUPABASE_ANON_KEY" });
}

#[test]
fn invalid_port_is_an_error() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("PORT", "eighty"));
    let err = ServerConfig::from_lookup(lookup(&pairs)).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "PORT", value: "eighty".to_owned() });
    assert_eq!(err.to_string(), "invalid PORT: \"eighty\"");
}

#[test]
fn blank_stripe_key_disables_billing() {
    let mut pairs = REQUIRED.to_vec();
    pairs.push(("STRIPE_SECRET_KEY", ""));
    let cfg = ServerConfig::from_lookup(lookup(&pairs)).unwrap();
    assert!(!cfg.billing_enabled());
}
