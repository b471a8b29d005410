//! Submitted answers to admin forms.

use agapefy_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `admin_form_responses` table. One per `(form_id, user_id)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormResponse {
    pub id: DbId,
    pub form_id: DbId,
    pub user_id: UserId,
    pub answers: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for submitting (or resubmitting) a form.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitFormResponse {
    pub answers: serde_json::Value,
}
