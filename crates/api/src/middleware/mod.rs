//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`user_header::HeaderUserId`] -- Reads the user id forwarded in `x-user-id`.

pub mod auth;
pub mod rbac;
pub mod user_header;
