pub mod admin;
pub mod health;
pub mod onboarding;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /onboarding/status                      status probe (x-user-id header)
/// /onboarding/checklist                   per-step completion (auth required)
/// /onboarding/steps                       active steps for the UI (auth required)
/// /onboarding/forms/{id}/responses        submit answers (POST, auth required)
///
/// /admin/onboarding/steps                 full step ordering (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/onboarding", onboarding::router())
        .nest("/admin", admin::router())
}
