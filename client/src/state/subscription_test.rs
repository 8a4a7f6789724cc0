use futures::executor::block_on;

use super::*;
use crate::net::api::test_helpers::MockBillingApi;

#[test]
fn default_status_is_unknown() {
    let state = SubscriptionState::default();
    assert_eq!(state.status, SubscriptionStatus::Unknown);
    assert!(!state.status.is_premium());
}

#[test]
fn active_row_means_premium() {
    let api = MockBillingApi::default().with_premium(Ok(true));
    assert_eq!(block_on(fetch_status(&api, "u1")), Ok(SubscriptionStatus::Premium));
}

#[test]
fn no_active_row_means_free() {
    let api = MockBillingApi::default().with_premium(Ok(false));
    assert_eq!(block_on(fetch_status(&api, "u1")), Ok(SubscriptionStatus::Free));
}

#[test]
fn failed_lookup_falls_back_to_free_with_banner() {
    let mut state = SubscriptionState::default();
    state.settle(Err(ApiError::Status { status: 500, body: "boom".to_owned() }));
    assert_eq!(state.status, SubscriptionStatus::Free);
    assert_eq!(state.error.as_deref(), Some(SUBSCRIPTION_LOAD_ERROR));

    state.settle(Ok(SubscriptionStatus::Premium));
    assert!(state.status.is_premium());
    assert_eq!(state.error, None);
}
