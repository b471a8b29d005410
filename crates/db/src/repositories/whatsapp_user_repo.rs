//! Repository for the `whatsapp_users` table.

use agapefy_core::types::UserId;
use sqlx::PgPool;

use crate::models::whatsapp_user::WhatsappUser;

const COLUMNS: &str = "\
    id, user_id, phone_number, receives_daily_verse, created_at, updated_at";

/// Upper bound on legacy rows scanned by [`WhatsappUserRepo::list_recent_unlinked`].
pub const UNLINKED_SCAN_LIMIT: i64 = 10;

/// Read access to WhatsApp registrations.
pub struct WhatsappUserRepo;

impl WhatsappUserRepo {
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<WhatsappUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM whatsapp_users WHERE user_id = $1");
        sqlx::query_as::<_, WhatsappUser>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Most recently updated rows with no linked account, newest first.
    /// `limit` is clamped to `1..=UNLINKED_SCAN_LIMIT`.
    pub async fn list_recent_unlinked(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<WhatsappUser>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM whatsapp_users \
             WHERE user_id IS NULL \
             ORDER BY updated_at DESC, id DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, WhatsappUser>(&query)
            .bind(limit.clamp(1, UNLINKED_SCAN_LIMIT))
            .fetch_all(pool)
            .await
    }
}
