use sqlx::SqlitePool;

use crate::error::CatalogError;
use crate::models::Channel;

#[derive(Debug, Clone)]
pub struct ChannelRepository {
    pool: SqlitePool,
}

impl ChannelRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a required channel. The caller is expected to pass a
    /// normalized username (lowercase, no leading `@`).
    pub async fn insert(&self, name: &str, username: &str) -> Result<Channel, CatalogError> {
        sqlx::query_as::<_, Channel>(
            r#"
            INSERT INTO channels (name, username, is_required)
            VALUES ($1, $2, TRUE)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                CatalogError::Duplicate(format!("channel username '{username}' already exists"))
            }
            _ => CatalogError::Store(e),
        })
    }

    /// Channels with the required flag set, in id order.
    pub async fn get_required(&self) -> Result<Vec<Channel>, CatalogError> {
        let channels = sqlx::query_as::<_, Channel>(
            "SELECT * FROM channels WHERE is_required = TRUE ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(channels)
    }

    /// Returns the number of rows removed (0 or 1).
    pub async fn delete(&self, id: i64) -> Result<u64, CatalogError> {
        let result = sqlx::query("DELETE FROM channels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> Result<i64, CatalogError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM channels")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
