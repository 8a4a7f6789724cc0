use super::*;

#[test]
fn endpoints_join_base() {
    assert_eq!(plans_endpoint("/api/billing"), "/api/billing/plans");
    assert_eq!(checkout_endpoint("https://b.example.com/api"), "https://b.example.com/api/checkout");
}

#[test]
fn subscription_query_filters_active_rows_for_user() {
    let url = active_subscription_query("https://abc.supabase.co", "u-1");
    assert!(url.starts_with("https://abc.supabase.co/rest/v1/subscriptions?"));
    assert!(url.contains("user_id=eq.u-1"));
    assert!(url.contains("status=eq.active"));
}

#[test]
fn status_error_prefers_error_field() {
    assert_eq!(
        status_error(403, r#"{"error":"user mismatch"}"#),
        ApiError::Status { status: 403, body: "user mismatch".to_owned() }
    );
}

#[test]
fn status_error_falls_back_to_raw_body() {
    assert_eq!(
        status_error(502, " bad gateway \n"),
        ApiError::Status { status: 502, body: "bad gateway".to_owned() }
    );
}

#[test]
fn checkout_url_requires_url() {
    assert_eq!(
        checkout_url(CheckoutResponse { url: Some("https://pay.example.com/s/1".to_owned()) }),
        Ok("https://pay.example.com/s/1".to_owned())
    );
    assert_eq!(checkout_url(CheckoutResponse::default()), Err(ApiError::MissingCheckoutUrl));
    assert_eq!(checkout_url(CheckoutResponse { url: Some("  ".to_owned()) }), Err(ApiError::MissingCheckoutUrl));
}

#[test]
fn api_error_messages() {
    assert_eq!(ApiError::NotSignedIn.to_string(), "not signed in");
    assert_eq!(
        ApiError::Status { status: 500, body: "stripe down".to_owned() }.to_string(),
        "request failed with status 500: stripe down"
    );
}

#[test]
fn user_message_surfaces_server_error_text() {
    let err = ApiError::Status { status: 403, body: "user mismatch".to_owned() };
    assert_eq!(err.user_message(), "user mismatch");
    assert_eq!(ApiError::MissingCheckoutUrl.user_message(), "No checkout URL returned");
    assert_eq!(
        ApiError::Request("dns".to_owned()).user_message(),
        "Something went wrong. Please try again later."
    );
}
