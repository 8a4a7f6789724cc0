use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::executor::block_on;

use super::test_helpers::{MockAuthBackend, session_for};
use super::*;

// =============================================================
// ListenerRegistry
// =============================================================

#[test]
fn registry_delivers_in_registration_order() {
    let registry = ListenerRegistry::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let first = {
        let seen = seen.clone();
        registry.register(Rc::new(move |_| seen.borrow_mut().push("first")))
    };
    let second = {
        let seen = seen.clone();
        registry.register(Rc::new(move |_| seen.borrow_mut().push("second")))
    };

    registry.emit(&AuthEvent::signed_out());
    assert_eq!(*seen.borrow(), vec!["first", "second"]);
    drop((first, second));
}

#[test]
fn dropping_subscription_releases_listener() {
    let registry = ListenerRegistry::new();
    let hits = Rc::new(RefCell::new(0));
    let sub = {
        let hits = hits.clone();
        registry.register(Rc::new(move |_| *hits.borrow_mut() += 1))
    };
    assert_eq!(registry.len(), 1);

    registry.emit(&AuthEvent::signed_out());
    sub.unsubscribe();
    registry.emit(&AuthEvent::signed_out());

    assert!(registry.is_empty());
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn subscription_outliving_registry_is_harmless() {
    let registry = ListenerRegistry::new();
    let sub = registry.register(Rc::new(|_| {}));
    drop(registry);
    drop(sub);
}

#[test]
fn listener_released_during_emit_is_not_called() {
    let registry = ListenerRegistry::new();
    let slot: Rc<RefCell<Option<AuthSubscription>>> = Rc::new(RefCell::new(None));
    let _releaser = {
        let slot = slot.clone();
        registry.register(Rc::new(move |_| {
            slot.borrow_mut().take();
        }))
    };
    let hits = Rc::new(Cell::new(0));
    *slot.borrow_mut() = Some({
        let hits = hits.clone();
        registry.register(Rc::new(move |_| hits.set(hits.get() + 1)))
    });
    assert_eq!(registry.len(), 2);

    registry.emit(&AuthEvent::signed_out());
    assert_eq!(registry.len(), 1);
    assert_eq!(hits.get(), 0);
}

#[test]
fn listener_registered_during_emit_hears_next_event() {
    let registry = ListenerRegistry::new();
    let hits = Rc::new(Cell::new(0));
    let late: Rc<RefCell<Option<AuthSubscription>>> = Rc::new(RefCell::new(None));
    let _registrar = {
        let registry = registry.clone();
        let hits = hits.clone();
        let late = late.clone();
        registry.clone().register(Rc::new(move |_| {
            if late.borrow().is_none() {
                let hits = hits.clone();
                *late.borrow_mut() = Some(registry.register(Rc::new(move |_| hits.set(hits.get() + 1))));
            }
        }))
    };

    registry.emit(&AuthEvent::signed_out());
    assert_eq!(hits.get(), 0);
    registry.emit(&AuthEvent::signed_out());
    assert_eq!(hits.get(), 1);
}

// =============================================================
// Session timing
// =============================================================

#[test]
fn refresh_is_scheduled_ahead_of_expiry() {
    assert_eq!(refresh_delay_ms(1_000 + 3_600, 1_000), 3_540_000);
}

#[test]
fn refresh_is_immediate_inside_the_margin() {
    assert_eq!(refresh_delay_ms(1_030, 1_000), 0);
    assert_eq!(refresh_delay_ms(900, 1_000), 0);
}

#[test]
fn refresh_delay_is_clamped_to_timer_range() {
    assert_eq!(refresh_delay_ms(i64::MAX, 0), u32::try_from(i32::MAX).unwrap());
}

#[test]
fn expired_session_yields_no_access_token() {
    let mut session = session_for("a@b.io");
    session.expires_at = 1_000;
    assert_eq!(live_access_token(Some(&session), 999).as_deref(), Some("token-a@b.io"));
    assert_eq!(live_access_token(Some(&session), 1_000), None);
    assert_eq!(live_access_token(None, 0), None);
}

// =============================================================
// Error bodies
// =============================================================

#[test]
fn sign_out_failure_without_body_uses_fallback() {
    assert_eq!(auth_error_message("", SIGN_OUT_FALLBACK), "Failed to sign out");
}

#[test]
fn auth_error_message_prefers_error_description() {
    let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
    assert_eq!(auth_error_message(body, SIGN_IN_FALLBACK), "Invalid login credentials");
}

#[test]
fn auth_error_message_reads_msg_field() {
    let body = r#"{"code":422,"msg":"User already registered"}"#;
    assert_eq!(auth_error_message(body, SIGN_UP_FALLBACK), "User already registered");
}

#[test]
fn auth_error_message_skips_blank_fields() {
    let body = r#"{"error_description":"  ","message":"Password should be at least 6 characters"}"#;
    assert_eq!(auth_error_message(body, SIGN_UP_FALLBACK), "Password should be at least 6 characters");
}

#[test]
fn auth_error_message_falls_back_on_garbage() {
    assert_eq!(auth_error_message("<html>502</html>", SIGN_IN_FALLBACK), SIGN_IN_FALLBACK);
    assert_eq!(auth_error_message("{}", SIGN_UP_FALLBACK), SIGN_UP_FALLBACK);
}

// =============================================================
// Request shapes
// =============================================================

#[test]
fn token_endpoint_formats_grant_type() {
    assert_eq!(
        token_endpoint("https://abc.supabase.co", "password"),
        "https://abc.supabase.co/auth/v1/token?grant_type=password"
    );
}

#[test]
fn signup_body_includes_full_name_only_when_given() {
    let with_name = signup_body("a@b.io", "secret1", Some(" Ada "));
    assert_eq!(with_name["data"]["full_name"], "Ada");

    let blank = signup_body("a@b.io", "secret1", Some("   "));
    assert!(blank.get("data").is_none());

    let without = signup_body("a@b.io", "secret1", None);
    assert!(without.get("data").is_none());
    assert_eq!(without["email"], "a@b.io");
}

// =============================================================
// Server-side stub
// =============================================================

#[test]
fn unavailable_auth_reports_no_session_and_rejects_credentials() {
    let auth = UnavailableAuth::default();
    assert_eq!(block_on(auth.current_session()), Ok(None));
    assert!(auth.access_token().is_none());
    let err = block_on(auth.sign_in_with_password("a@b.io", "pw")).unwrap_err();
    assert!(err.message.contains("browser"));
}

// =============================================================
// Mock backend sanity
// =============================================================

#[test]
fn mock_fetch_fails_the_configured_number_of_times() {
    let mock = MockAuthBackend::new().with_session(session_for("a@b.io"));
    mock.fetch_failures.set(2);
    assert!(block_on(mock.current_session()).is_err());
    assert!(block_on(mock.current_session()).is_err());
    assert_eq!(block_on(mock.current_session()).unwrap().unwrap().identity.email, "a@b.io");
    assert_eq!(mock.fetch_calls.get(), 3);
}
