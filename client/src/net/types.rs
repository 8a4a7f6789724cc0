//! Shared boundary types for the auth service, billing API, and data API.
//!
//! DESIGN
//! ======
//! Collaborator payloads arrive loosely typed (user metadata blobs, provider
//! price objects). Each one is narrowed into an exhaustively-fielded record
//! right where it is received, so nothing deeper in the tree handles raw
//! `serde_json::Value`s.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// IDENTITY / SESSION
// =============================================================================

/// The authenticated end user as known to this application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Auth-service user id.
    pub id: String,
    pub email: String,
    /// From the `full_name` user-metadata field.
    pub display_name: Option<String>,
    /// From the `avatar_url` user-metadata field.
    pub avatar_url: Option<String>,
}

/// One authenticated browser session.
///
/// Token material is opaque and only ever forwarded as a bearer credential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry in unix seconds.
    pub expires_at: i64,
    pub identity: Identity,
}

impl Session {
    /// Whether the session is no longer usable at `now_secs`.
    #[must_use]
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.expires_at <= now_secs
    }

    /// Narrow a token-endpoint response into a session.
    ///
    /// # Errors
    ///
    /// Returns a [`NarrowError`] when the token or user fields are missing.
    pub fn from_dto(dto: SessionDto, now_secs: i64) -> Result<Self, NarrowError> {
        let access_token = dto.access_token.filter(|t| !t.is_empty()).ok_or(NarrowError::Missing("access_token"))?;
        let user = dto.user.ok_or(NarrowError::Missing("user"))?;
        let identity = Identity::try_from(user)?;
        let expires_at = match (dto.expires_at, dto.expires_in) {
            (Some(at), _) => at,
            (None, Some(secs)) => now_secs + secs,
            (None, None) => return Err(NarrowError::Missing("expires_at")),
        };
        Ok(Self { access_token, refresh_token: dto.refresh_token.unwrap_or_default(), expires_at, identity })
    }
}

/// Raw user object returned by the auth service.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AuthUserDto {
    pub id: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Raw token-endpoint / signup response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SessionDto {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub expires_at: Option<i64>,
    pub user: Option<AuthUserDto>,
}

/// A collaborator payload was missing a field this application requires.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NarrowError {
    #[error("missing field: {0}")]
    Missing(&'static str),
}

impl TryFrom<AuthUserDto> for Identity {
    type Error = NarrowError;

    fn try_from(dto: AuthUserDto) -> Result<Self, Self::Error> {
        let id = dto.id.filter(|id| !id.is_empty()).ok_or(NarrowError::Missing("id"))?;
        let email = dto.email.ok_or(NarrowError::Missing("email"))?;
        Ok(Self {
            id,
            email,
            display_name: metadata_string(&dto.user_metadata, "full_name"),
            avatar_url: metadata_string(&dto.user_metadata, "avatar_url"),
        })
    }
}

fn metadata_string(metadata: &serde_json::Value, key: &str) -> Option<String> {
    metadata
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

// =============================================================================
// BILLING
// =============================================================================

/// A subscription plan offered by the billing collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Provider price id, passed back verbatim when checking out.
    pub id: String,
    /// Price in minor currency units.
    pub amount: i64,
    /// Lowercase ISO currency code.
    pub currency: String,
    pub interval: String,
    pub interval_count: u32,
    pub active: bool,
}

/// Body of `POST {billing}/checkout`. The customer email travels in the
/// `X-Customer-Email` header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub price_id: String,
    pub user_id: String,
    pub return_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub url: Option<String>,
}

/// JSON error body returned by the billing API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Row of the `subscriptions` table, as much of it as this app reads.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SubscriptionRow {
    pub user_id: String,
    pub status: String,
}
