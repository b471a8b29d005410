//! WhatsApp companion registrations.

use agapefy_core::onboarding_progress::WhatsappLink;
use agapefy_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `whatsapp_users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WhatsappUser {
    pub id: DbId,
    /// `None` for legacy rows registered before accounts were linked.
    pub user_id: Option<UserId>,
    pub phone_number: Option<String>,
    pub receives_daily_verse: Option<bool>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<WhatsappUser> for WhatsappLink {
    fn from(row: WhatsappUser) -> Self {
        Self {
            phone_number: row.phone_number,
            receives_daily_verse: row.receives_daily_verse,
        }
    }
}
