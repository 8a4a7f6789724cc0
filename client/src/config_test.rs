use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_reads_all_fields() {
    let config = AppConfig::from_lookup(lookup(&[
        ("SUPABASE_URL", "https://abc.supabase.co/"),
        ("SUPABASE_ANON_KEY", "anon"),
        ("VELT_API_KEY", "velt"),
        ("DESIGN_PREVIEW", "true"),
        ("BILLING_API_BASE", "https://billing.example.com/api/"),
    ]));
    assert_eq!(config.supabase_url, "https://abc.supabase.co");
    assert_eq!(config.supabase_anon_key, "anon");
    assert_eq!(config.velt_api_key, "velt");
    assert!(config.design_preview);
    assert_eq!(config.billing_api_base, "https://billing.example.com/api");
    assert!(config.has_auth_service());
}

#[test]
fn from_lookup_defaults_when_empty() {
    let config = AppConfig::from_lookup(|_| None);
    assert_eq!(config.supabase_url, "");
    assert!(!config.design_preview);
    assert_eq!(config.billing_api_base, DEFAULT_BILLING_API_BASE);
    assert!(!config.has_auth_service());
}

#[test]
fn blank_billing_base_falls_back_to_default() {
    let config = AppConfig::from_lookup(lookup(&[("BILLING_API_BASE", "   ")]));
    assert_eq!(config.billing_api_base, DEFAULT_BILLING_API_BASE);
}

#[test]
fn parse_flag_true_variants() {
    for val in ["1", "true", "yes", "on", "TRUE", " On "] {
        assert_eq!(parse_flag(val), Some(true), "expected true for {val:?}");
    }
}

#[test]
fn parse_flag_false_variants() {
    for val in ["0", "false", "no", "off", "False"] {
        assert_eq!(parse_flag(val), Some(false), "expected false for {val:?}");
    }
}

#[test]
fn unrecognized_flag_disables_preview() {
    assert_eq!(parse_flag("maybe"), None);
    let config = AppConfig::from_lookup(lookup(&[("DESIGN_PREVIEW", "maybe")]));
    assert!(!config.design_preview);
}
