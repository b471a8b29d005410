//! Handlers for the onboarding flow.
//!
//! `status` and `checklist` never fail on data errors: a database problem or
//! a missing service-role pool degrades to a "pending" payload with an
//! `error` field, so the client shows onboarding rather than skipping it.
//! Authentication failures are still rejected with 401.

use agapefy_core::error::CoreError;
use agapefy_core::onboarding_progress::Checklist;
use agapefy_core::onboarding_steps::StepDescriptor;
use agapefy_core::types::DbId;
use agapefy_db::models::form_response::SubmitFormResponse;
use agapefy_db::repositories::{FormRepo, FormResponseRepo};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::engine::onboarding as engine;
use crate::error::{log_database_error, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::middleware::user_header::HeaderUserId;
use crate::response::DataResponse;
use crate::state::AppState;

/// `error` value when the service-role pool is not configured.
pub const ERROR_MISSING_SERVICE_ROLE: &str = "missing_service_role";
/// `error` value when a database query failed.
pub const ERROR_DATABASE: &str = "database_error";

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// Body of `GET /api/onboarding/status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatusResponse {
    pub pending: bool,
    /// Display numbers of the steps still to do.
    pub steps: Vec<u32>,
    pub next_step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl OnboardingStatusResponse {
    fn from_checklist(checklist: &Checklist) -> Self {
        Self {
            pending: checklist.has_pending,
            steps: checklist.pending_step_numbers(),
            next_step: checklist.next_step,
            error: None,
        }
    }

    fn degraded(error: &'static str) -> Self {
        Self {
            pending: true,
            steps: vec![1],
            next_step: Some(1),
            error: Some(error),
        }
    }
}

/// Body of `GET /api/onboarding/checklist`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistResponse {
    #[serde(flatten)]
    pub checklist: Checklist,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl ChecklistResponse {
    fn degraded(error: &'static str) -> Self {
        Self {
            checklist: Checklist {
                steps: Vec::new(),
                has_pending: true,
                next_step: Some(1),
            },
            error: Some(error),
        }
    }
}

/// An active step with its 1-based display number.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberedStep {
    pub step_number: u32,
    #[serde(flatten)]
    pub step: StepDescriptor,
}

// ---------------------------------------------------------------------------
// GET /api/onboarding/status
// ---------------------------------------------------------------------------

/// Whether the user (from `x-user-id`) still has onboarding to do.
pub async fn get_status(
    HeaderUserId(user_id): HeaderUserId,
    State(state): State<AppState>,
) -> Json<OnboardingStatusResponse> {
    let Some(pool) = state.service_pool.as_ref() else {
        engine::warn_missing_service_role();
        return Json(OnboardingStatusResponse::degraded(
            ERROR_MISSING_SERVICE_ROLE,
        ));
    };

    match engine::user_checklist(pool, user_id, state.config.whatsapp_legacy_fallback).await {
        Ok(checklist) => {
            tracing::debug!(
                %user_id,
                pending = checklist.has_pending,
                next_step = ?checklist.next_step,
                "Computed onboarding status"
            );
            Json(OnboardingStatusResponse::from_checklist(&checklist))
        }
        Err(err) => {
            log_database_error("onboarding status", &err);
            Json(OnboardingStatusResponse::degraded(ERROR_DATABASE))
        }
    }
}

// ---------------------------------------------------------------------------
// GET /api/onboarding/checklist
// ---------------------------------------------------------------------------

/// Per-step completion for the authenticated user.
pub async fn get_checklist(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Json<ChecklistResponse> {
    let Some(pool) = state.service_pool.as_ref() else {
        engine::warn_missing_service_role();
        return Json(ChecklistResponse::degraded(ERROR_MISSING_SERVICE_ROLE));
    };

    match engine::user_checklist(pool, auth.user_id, state.config.whatsapp_legacy_fallback).await
    {
        Ok(checklist) => {
            tracing::debug!(
                user_id = %auth.user_id,
                steps = checklist.steps.len(),
                pending = checklist.has_pending,
                "Computed onboarding checklist"
            );
            Json(ChecklistResponse {
                checklist,
                error: None,
            })
        }
        Err(err) => {
            log_database_error("onboarding checklist", &err);
            Json(ChecklistResponse::degraded(ERROR_DATABASE))
        }
    }
}

// ---------------------------------------------------------------------------
// GET /api/onboarding/steps
// ---------------------------------------------------------------------------

/// Active steps, numbered for display, for rendering the onboarding flow.
pub async fn list_steps(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let resolved = engine::resolve_steps(&state.pool).await?;
    let data: Vec<NumberedStep> = resolved
        .active()
        .into_iter()
        .zip(1u32..)
        .map(|(step, step_number)| NumberedStep { step_number, step })
        .collect();

    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// POST /api/onboarding/forms/{id}/responses
// ---------------------------------------------------------------------------

/// Store the user's answers to an onboarding form, replacing earlier ones.
pub async fn submit_form_response(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(form_id): Path<DbId>,
    Json(input): Json<SubmitFormResponse>,
) -> AppResult<impl IntoResponse> {
    if !(input.answers.is_object() || input.answers.is_array()) {
        return Err(CoreError::Validation(
            "answers must be a JSON object or array".to_string(),
        )
        .into());
    }

    let form = FormRepo::find_by_id(&state.pool, form_id)
        .await?
        .filter(|f| f.is_active)
        .ok_or(CoreError::NotFound {
            entity: "Form",
            id: form_id,
        })?;

    let response =
        FormResponseRepo::upsert(&state.pool, form.id, auth.user_id, &input.answers).await?;

    tracing::info!(user_id = %auth.user_id, form_id, "Onboarding form response saved");

    Ok(Json(DataResponse { data: response }))
}

// ---------------------------------------------------------------------------
// GET /api/admin/onboarding/steps
// ---------------------------------------------------------------------------

/// Full resolved ordering, inactive steps included, for the admin console.
pub async fn admin_list_steps(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let resolved = engine::resolve_steps(&state.pool).await?;

    tracing::debug!(
        admin_id = %admin.user_id,
        steps = resolved.all.len(),
        "Listed onboarding step ordering"
    );

    Ok(Json(DataResponse { data: resolved.all }))
}
