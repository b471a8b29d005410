//! Repository for the `app_settings` table.

use sqlx::PgPool;

use crate::models::setting::AppSetting;

const COLUMNS: &str = "key, value, updated_at";

/// Reads and writes key/value settings.
pub struct SettingRepo;

impl SettingRepo {
    /// Fetch the rows for the given keys. Missing keys are simply absent
    /// from the result; callers apply their own defaults.
    pub async fn get_many(pool: &PgPool, keys: &[&str]) -> Result<Vec<AppSetting>, sqlx::Error> {
        let keys: Vec<String> = keys.iter().map(|k| (*k).to_string()).collect();
        let query = format!("SELECT {COLUMNS} FROM app_settings WHERE key = ANY($1) ORDER BY key");
        sqlx::query_as::<_, AppSetting>(&query)
            .bind(keys)
            .fetch_all(pool)
            .await
    }

    /// Insert or overwrite a setting.
    pub async fn upsert(pool: &PgPool, key: &str, value: &str) -> Result<AppSetting, sqlx::Error> {
        let query = format!(
            "INSERT INTO app_settings (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AppSetting>(&query)
            .bind(key)
            .bind(value)
            .fetch_one(pool)
            .await
    }
}
