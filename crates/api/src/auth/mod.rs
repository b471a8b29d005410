//! Authentication primitives.
//!
//! - [`jwt`] -- validation of the HS256 access tokens issued by the auth
//!   provider, plus a signer used by tests and local tooling.

pub mod jwt;
