//! Caller verification against the hosted auth service.
//!
//! The billing routes never trust a user id from the request body. The
//! bearer token is exchanged for the user record via `GET /auth/v1/user`
//! and the route compares ids itself.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ServerConfig;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid or expired token")]
    InvalidToken,

    #[error("auth service request failed: {0}")]
    Request(String),

    #[error("auth service error: status {0}")]
    Response(u16),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// The caller behind a verified bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedUser {
    pub id: String,
    pub email: Option<String>,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidToken`] when the auth service rejects
    /// the token, or a transport error when it cannot be asked.
    async fn verify(&self, token: &str) -> Result<VerifiedUser, IdentityError>;
}

pub struct SupabaseVerifier {
    http: reqwest::Client,
    user_url: String,
    anon_key: String,
}

impl SupabaseVerifier {
    /// # Errors
    ///
    /// Returns [`IdentityError::HttpClientBuild`] if the HTTP client cannot
    /// be constructed.
    pub fn new(config: &ServerConfig) -> Result<Self, IdentityError> {
        let http = super::http_client(config.timeouts).map_err(IdentityError::HttpClientBuild)?;
        Ok(Self {
            http,
            user_url: format!("{}/auth/v1/user", config.supabase_url),
            anon_key: config.supabase_anon_key.clone(),
        })
    }
}

#[async_trait]
impl TokenVerifier for SupabaseVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedUser, IdentityError> {
        let response = self
            .http
            .get(&self.user_url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            return Err(IdentityError::InvalidToken);
        }
        if !(200..300).contains(&status) {
            return Err(IdentityError::Response(status));
        }
        let text = response
            .text()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;
        parse_user(&text)
    }
}

#[derive(Debug, Deserialize)]
struct UserDto {
    id: Option<String>,
    email: Option<String>,
}

/// # Errors
///
/// Returns [`IdentityError::InvalidToken`] when the body carries no user id.
pub fn parse_user(body: &str) -> Result<VerifiedUser, IdentityError> {
    let dto: UserDto = serde_json::from_str(body).map_err(|_| IdentityError::InvalidToken)?;
    let id = dto.id.filter(|id| !id.is_empty()).ok_or(IdentityError::InvalidToken)?;
    Ok(VerifiedUser { id, email: dto.email.filter(|e| !e.is_empty()) })
}

/// Token from an `Authorization: Bearer <token>` header value.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
