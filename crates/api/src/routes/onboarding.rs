//! Route definitions for the onboarding flow.
//!
//! Mounted at `/onboarding` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// Onboarding routes.
///
/// ```text
/// GET    /status                  -> get_status
/// GET    /checklist               -> get_checklist
/// GET    /steps                   -> list_steps
/// POST   /forms/{id}/responses    -> submit_form_response
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(onboarding::get_status))
        .route("/checklist", get(onboarding::get_checklist))
        .route("/steps", get(onboarding::list_steps))
        .route(
            "/forms/{id}/responses",
            post(onboarding::submit_form_response),
        )
}
