//! Admin console routes.
//!
//! Mounted at `/admin` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// ```text
/// GET    /onboarding/steps        -> admin_list_steps
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/onboarding/steps", get(onboarding::admin_list_steps))
}
