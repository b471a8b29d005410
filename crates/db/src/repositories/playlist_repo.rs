//! Repository for `playlists` and the `playlist_audios` join table.

use agapefy_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::playlist::{Playlist, ROUTINE_PLAYLIST_TITLE};

const COLUMNS: &str = "id, title, created_by, created_at";

pub struct PlaylistRepo;

impl PlaylistRepo {
    /// The user's "Minha Rotina" playlist, oldest first if duplicated.
    pub async fn find_routine(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM playlists \
             WHERE created_by = $1 AND title = $2 \
             ORDER BY created_at ASC, id ASC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(user_id)
            .bind(ROUTINE_PLAYLIST_TITLE)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_audios(pool: &PgPool, playlist_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM playlist_audios WHERE playlist_id = $1")
            .bind(playlist_id)
            .fetch_one(pool)
            .await
    }

    /// Audio count of the user's routine playlist, or `None` when the
    /// playlist has not been created yet.
    pub async fn routine_audio_count(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<i64>, sqlx::Error> {
        match Self::find_routine(pool, user_id).await? {
            Some(playlist) => Ok(Some(Self::count_audios(pool, playlist.id).await?)),
            None => Ok(None),
        }
    }
}
