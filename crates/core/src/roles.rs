//! Role names carried in the `role` claim of access tokens.

/// Console administrators (form authoring, onboarding ordering preview).
pub const ROLE_ADMIN: &str = "admin";
