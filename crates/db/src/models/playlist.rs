//! User playlists.

use agapefy_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// Title of the playlist built from a user's onboarding answers.
pub const ROUTINE_PLAYLIST_TITLE: &str = "Minha Rotina";

/// A row from the `playlists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Playlist {
    pub id: DbId,
    pub title: String,
    pub created_by: UserId,
    pub created_at: Timestamp,
}
