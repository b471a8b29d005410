//! Repository for the `admin_forms` table.

use agapefy_core::types::DbId;
use sqlx::PgPool;

use crate::models::form::{AdminForm, CreateForm};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, name, description, schema, onboard_step, \
    is_active, parent_form_id, created_at";

/// Provides read access to the form catalog plus creation.
pub struct FormRepo;

impl FormRepo {
    /// Every form, active or not, in onboarding catalog order:
    /// `onboard_step` ascending with nulls first, then creation time.
    ///
    /// The order matters: it decides which form keeps a contested step slot.
    pub async fn list_catalog(pool: &PgPool) -> Result<Vec<AdminForm>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM admin_forms \
             ORDER BY onboard_step ASC NULLS FIRST, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, AdminForm>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AdminForm>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_forms WHERE id = $1");
        sqlx::query_as::<_, AdminForm>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateForm) -> Result<AdminForm, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_forms \
                (name, description, schema, onboard_step, is_active, parent_form_id) \
             VALUES ($1, $2, $3, $4, COALESCE($5, TRUE), $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminForm>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.schema)
            .bind(input.onboard_step)
            .bind(input.is_active)
            .bind(input.parent_form_id)
            .fetch_one(pool)
            .await
    }
}
