use super::*;

fn user_json(metadata: serde_json::Value) -> AuthUserDto {
    serde_json::from_value(serde_json::json!({
        "id": "u-1",
        "email": "ada@example.com",
        "user_metadata": metadata,
        "aud": "authenticated",
        "role": "authenticated",
    }))
    .unwrap()
}

// =============================================================
// Identity narrowing
// =============================================================

#[test]
fn identity_reads_display_name_and_avatar_from_metadata() {
    let dto = user_json(serde_json::json!({
        "full_name": "Ada Lovelace",
        "avatar_url": "https://cdn.example.com/ada.png",
    }));
    let identity = Identity::try_from(dto).unwrap();
    assert_eq!(identity.id, "u-1");
    assert_eq!(identity.email, "ada@example.com");
    assert_eq!(identity.display_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(identity.avatar_url.as_deref(), Some("https://cdn.example.com/ada.png"));
}

#[test]
fn identity_ignores_blank_and_non_string_metadata() {
    let dto = user_json(serde_json::json!({ "full_name": "   ", "avatar_url": 42 }));
    let identity = Identity::try_from(dto).unwrap();
    assert!(identity.display_name.is_none());
    assert!(identity.avatar_url.is_none());
}

#[test]
fn identity_without_metadata_object() {
    let dto: AuthUserDto = serde_json::from_str(r#"{"id":"u-2","email":"b@example.com"}"#).unwrap();
    let identity = Identity::try_from(dto).unwrap();
    assert_eq!(identity.id, "u-2");
    assert!(identity.display_name.is_none());
}

#[test]
fn identity_requires_id() {
    let dto: AuthUserDto = serde_json::from_str(r#"{"email":"b@example.com"}"#).unwrap();
    assert_eq!(Identity::try_from(dto), Err(NarrowError::Missing("id")));

    let dto: AuthUserDto = serde_json::from_str(r#"{"id":"","email":"b@example.com"}"#).unwrap();
    assert_eq!(Identity::try_from(dto), Err(NarrowError::Missing("id")));
}

#[test]
fn identity_requires_email() {
    let dto: AuthUserDto = serde_json::from_str(r#"{"id":"u-3"}"#).unwrap();
    assert_eq!(Identity::try_from(dto), Err(NarrowError::Missing("email")));
}

// =============================================================
// Session narrowing
// =============================================================

#[test]
fn session_from_dto_prefers_absolute_expiry() {
    let dto: SessionDto = serde_json::from_value(serde_json::json!({
        "access_token": "at",
        "refresh_token": "rt",
        "expires_in": 3600,
        "expires_at": 5000,
        "token_type": "bearer",
        "user": { "id": "u-1", "email": "ada@example.com" },
    }))
    .unwrap();
    let session = Session::from_dto(dto, 1000).unwrap();
    assert_eq!(session.expires_at, 5000);
    assert_eq!(session.refresh_token, "rt");
    assert_eq!(session.identity.id, "u-1");
}

#[test]
fn session_from_dto_derives_expiry_from_lifetime() {
    let dto: SessionDto = serde_json::from_value(serde_json::json!({
        "access_token": "at",
        "expires_in": 3600,
        "user": { "id": "u-1", "email": "ada@example.com" },
    }))
    .unwrap();
    let session = Session::from_dto(dto, 1000).unwrap();
    assert_eq!(session.expires_at, 4600);
    assert_eq!(session.refresh_token, "");
}

#[test]
fn session_from_dto_without_token_is_rejected() {
    // Signup responses awaiting email confirmation carry only the user.
    let dto: SessionDto = serde_json::from_value(serde_json::json!({
        "user": { "id": "u-1", "email": "ada@example.com" },
    }))
    .unwrap();
    assert_eq!(Session::from_dto(dto, 0), Err(NarrowError::Missing("access_token")));
}

#[test]
fn session_expiry_boundary() {
    let session = Session {
        access_token: "at".into(),
        refresh_token: "rt".into(),
        expires_at: 100,
        identity: Identity { id: "u".into(), email: "e@x.io".into(), display_name: None, avatar_url: None },
    };
    assert!(!session.is_expired(99));
    assert!(session.is_expired(100));
}

// =============================================================
// Billing payloads
// =============================================================

#[test]
fn checkout_response_without_url() {
    let resp: CheckoutResponse = serde_json::from_str("{}").unwrap();
    assert!(resp.url.is_none());
}

#[test]
fn plan_deserializes_from_billing_api_json() {
    let plan: Plan = serde_json::from_str(
        r#"{"id":"price_1","amount":2900,"currency":"usd","interval":"month","interval_count":1,"active":true}"#,
    )
    .unwrap();
    assert_eq!(plan.amount, 2900);
    assert_eq!(plan.interval_count, 1);
}
