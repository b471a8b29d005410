//! Admin-authored form model and DTOs.

use agapefy_core::onboarding_steps::OnboardingForm;
use agapefy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `admin_forms` table.
///
/// `schema` is either an array of `{label, category_id}` questions or an
/// info block (`{"type": "info", ...}`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminForm {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub schema: serde_json::Value,
    pub onboard_step: Option<i32>,
    pub is_active: bool,
    pub parent_form_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for creating a form.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateForm {
    pub name: String,
    pub description: Option<String>,
    pub schema: serde_json::Value,
    pub onboard_step: Option<i32>,
    pub is_active: Option<bool>,
    pub parent_form_id: Option<DbId>,
}

impl From<AdminForm> for OnboardingForm {
    fn from(form: AdminForm) -> Self {
        Self {
            id: form.id,
            name: form.name,
            description: form.description,
            schema: form.schema,
            onboard_step: form.onboard_step,
            is_active: form.is_active,
            parent_form_id: form.parent_form_id,
        }
    }
}
