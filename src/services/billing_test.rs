use super::*;

fn params(email: Option<&str>) -> CheckoutParams {
    CheckoutParams {
        price_id: "price_pro".to_owned(),
        user_id: "user-1".to_owned(),
        customer_email: email.map(ToOwned::to_owned),
        cancel_url: "https://app.example.com/dashboard".to_owned(),
        success_url: success_url("https://app.example.com"),
    }
}

fn field<'a>(form: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
    form.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
}

#[test]
fn success_url_keeps_session_placeholder() {
    assert_eq!(
        success_url("https://app.example.com"),
        "https://app.example.com/success?session_id={CHECKOUT_SESSION_ID}"
    );
}

#[test]
fn checkout_form_is_a_subscription_for_one_seat() {
    let form = checkout_form(&params(Some("ann@example.com")));
    assert_eq!(field(&form, "mode"), Some("subscription"));
    assert_eq!(field(&form, "line_items[0][price]"), Some("price_pro"));
    assert_eq!(field(&form, "line_items[0][quantity]"), Some("1"));
    assert_eq!(field(&form, "cancel_url"), Some("https://app.example.com/dashboard"));
    assert_eq!(field(&form, "client_reference_id"), Some("user-1"));
    assert_eq!(field(&form, "metadata[user_id]"), Some("user-1"));
    assert_eq!(field(&form, "customer_email"), Some("ann@example.com"));
}

#[test]
fn checkout_form_omits_blank_email() {
    assert_eq!(field(&checkout_form(&params(None)), "customer_email"), None);
    assert_eq!(field(&checkout_form(&params(Some(""))), "customer_email"), None);
}

#[test]
fn parse_prices_narrows_recurring_prices() {
    let body = r#"{"object":"list","data":[
        {"id":"price_a","active":true,"unit_amount":900,"currency":"USD",
         "recurring":{"interval":"month","interval_count":1}},
        {"id":"price_b","active":true,"unit_amount":9000,"currency":"usd",
         "recurring":{"interval":"year"}}
    ]}"#;
    let plans = parse_prices(body).unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].id, "price_a");
    assert_eq!(plans[0].currency, "usd");
    assert_eq!(plans[1].interval, "year");
    assert_eq!(plans[1].interval_count, 1);
}

#[test]
fn parse_prices_skips_entries_missing_required_fields() {
    let body = r#"{"data":[
        {"id":"price_ok","unit_amount":0,"currency":"usd"},
        {"unit_amount":500,"currency":"usd"},
        {"id":"price_no_amount","currency":"usd"},
        {"id":"price_no_currency","unit_amount":500}
    ]}"#;
    let plans = parse_prices(body).unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].id, "price_ok");
    assert_eq!(plans[0].interval, "month");
    assert!(plans[0].active);
}

#[test]
fn parse_prices_rejects_non_list() {
    assert!(matches!(parse_prices("not json"), Err(BillingError::ProviderParse(_))));
}

#[test]
fn price_narrowing_names_missing_field() {
    let dto = PriceDto { id: Some("p".into()), currency: Some("usd".into()), ..PriceDto::default() };
    assert_eq!(Plan::try_from(dto), Err(NarrowError::Missing("unit_amount")));
}

#[test]
fn checkout_url_must_be_present() {
    assert_eq!(parse_checkout_url(r#"{"url":"https://pay.example/cs_1"}"#).unwrap(), "https://pay.example/cs_1");
    assert!(matches!(parse_checkout_url(r#"{"url":null}"#), Err(BillingError::ProviderParse(_))));
    assert!(matches!(parse_checkout_url(r#"{"url":""}"#), Err(BillingError::ProviderParse(_))));
}

#[test]
fn provider_message_prefers_error_message() {
    assert_eq!(provider_message(r#"{"error":{"message":"No such price"}}"#), "No such price");
    assert_eq!(provider_message("  gateway timeout \n"), "gateway timeout");
}
