//! Repository for the `admin_form_responses` table.

use agapefy_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::form_response::FormResponse;

const COLUMNS: &str = "id, form_id, user_id, answers, created_at, updated_at";

/// Provides access to submitted form answers.
pub struct FormResponseRepo;

impl FormResponseRepo {
    /// Which of `form_ids` the user has answered. Presence of a row is all
    /// that counts; the answers themselves are not inspected.
    pub async fn answered_form_ids(
        pool: &PgPool,
        user_id: UserId,
        form_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if form_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar::<_, DbId>(
            "SELECT DISTINCT form_id FROM admin_form_responses \
             WHERE user_id = $1 AND form_id = ANY($2)",
        )
        .bind(user_id)
        .bind(form_ids)
        .fetch_all(pool)
        .await
    }

    /// Record the user's answers, replacing any earlier submission.
    pub async fn upsert(
        pool: &PgPool,
        form_id: DbId,
        user_id: UserId,
        answers: &serde_json::Value,
    ) -> Result<FormResponse, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_form_responses (form_id, user_id, answers) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (form_id, user_id) \
             DO UPDATE SET answers = EXCLUDED.answers, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormResponse>(&query)
            .bind(form_id)
            .bind(user_id)
            .bind(answers)
            .fetch_one(pool)
            .await
    }
}
