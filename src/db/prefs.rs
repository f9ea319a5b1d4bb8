use super::Db;
use crate::error::Result;

impl Db {
    pub async fn set_pref(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO preferences (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        tracing::info!(key, value, "preference set");
        Ok(())
    }

    pub async fn get_pref(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    pub async fn set_flag(&self, key: &str, value: bool) -> Result<()> {
        self.set_pref(key, if value { "true" } else { "false" }).await
    }

    /// Boolean preference with a default for unset keys.
    pub async fn get_flag(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self
            .get_pref(key)
            .await?
            .map(|v| v == "true")
            .unwrap_or(default))
    }
}
