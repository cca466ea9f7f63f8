//! Caller identity extractor
//!
//! Sign-in happens upstream. The authenticated user id reaches this service
//! in the `x-user-id` header, with the account's email and display name in
//! `x-user-email` / `x-user-name` when the auth layer knows them.

use align_common::db::Profile;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::ApiError;

/// Header carrying the authenticated user id
pub const CALLER_HEADER: &str = "x-user-id";

/// Header carrying the authenticated user's email
pub const CALLER_EMAIL_HEADER: &str = "x-user-email";

/// Header carrying the authenticated user's display name (UTF-8)
pub const CALLER_NAME_HEADER: &str = "x-user-name";

/// Authenticated user making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| ApiError::Unauthenticated(format!("Missing {} header", CALLER_HEADER)))?;

        let text = value
            .to_str()
            .map_err(|_| ApiError::Unauthenticated(format!("Unreadable {} header", CALLER_HEADER)))?;

        Uuid::parse_str(text.trim())
            .map(Caller)
            .map_err(|_| ApiError::Unauthenticated(format!("Invalid {} header", CALLER_HEADER)))
    }
}

/// Authenticated user plus the profile details supplied by the auth layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl CallerIdentity {
    /// Profile row for this caller, or None when no details were supplied
    pub fn profile(&self) -> Option<Profile> {
        if self.email.is_none() && self.full_name.is_none() {
            return None;
        }
        Some(Profile { id: self.id, email: self.email.clone(), full_name: self.full_name.clone() })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Caller(id) = Caller::from_request_parts(parts, state).await?;

        Ok(CallerIdentity {
            id,
            email: optional_header(&parts.headers, CALLER_EMAIL_HEADER),
            full_name: optional_header(&parts.headers, CALLER_NAME_HEADER),
        })
    }
}

/// Trimmed UTF-8 header value; absent, blank or undecodable values are None
fn optional_header(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?;
    let text = std::str::from_utf8(value.as_bytes()).ok()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}
