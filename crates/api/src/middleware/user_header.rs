//! `x-user-id` header extractor.
//!
//! The onboarding status probe is called by the web front end's edge layer,
//! which has already resolved the session and forwards the user id in a
//! header instead of a bearer token.

use agapefy_core::error::CoreError;
use agapefy_core::types::UserId;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// User id read from the `x-user-id` header. Rejects with 401 when the header
/// is missing or is not a UUID.
#[derive(Debug, Clone, Copy)]
pub struct HeaderUserId(pub UserId);

impl<S> FromRequestParts<S> for HeaderUserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing {USER_ID_HEADER} header"
                )))
            })?;

        let user_id = raw.parse::<UserId>().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Invalid {USER_ID_HEADER} header. Expected a UUID"
            )))
        })?;

        Ok(HeaderUserId(user_id))
    }
}
