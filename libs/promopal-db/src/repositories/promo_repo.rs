use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::CatalogError;
use crate::models::{NewPromoCode, PromoCode, PromoStats, StoreCount};

#[derive(Debug, Clone)]
pub struct PromoRepository {
    pool: SqlitePool,
}

impl PromoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a promo code as active with `created_at = now` and returns
    /// the stored record.
    pub async fn insert(&self, new: &NewPromoCode) -> Result<PromoCode, CatalogError> {
        let promo = sqlx::query_as::<_, PromoCode>(
            r#"
            INSERT INTO promocodes (store, code, description, expires_at, is_active, created_at)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING *
            "#,
        )
        .bind(&new.store)
        .bind(&new.code)
        .bind(&new.description)
        .bind(new.expires_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(promo)
    }

    /// Active, not-expired promo codes, newest first.
    pub async fn get_available(&self) -> Result<Vec<PromoCode>, CatalogError> {
        let promos = sqlx::query_as::<_, PromoCode>(
            r#"
            SELECT * FROM promocodes
            WHERE is_active = TRUE AND (expires_at IS NULL OR expires_at > DATE('now'))
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(promos)
    }

    /// Returns the number of rows removed (0 or 1).
    pub async fn delete(&self, id: i64) -> Result<u64, CatalogError> {
        let result = sqlx::query("DELETE FROM promocodes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> Result<i64, CatalogError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM promocodes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn stats(&self) -> Result<PromoStats, CatalogError> {
        let total = self.count().await?;

        let active =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM promocodes WHERE is_active = TRUE")
                .fetch_one(&self.pool)
                .await?;

        let expired = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM promocodes WHERE expires_at < DATE('now')",
        )
        .fetch_one(&self.pool)
        .await?;

        let by_store = sqlx::query_as::<_, StoreCount>(
            r#"
            SELECT store, COUNT(*) AS count FROM promocodes
            WHERE is_active = TRUE
            GROUP BY store
            ORDER BY store
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(PromoStats {
            total,
            active,
            expired,
            by_store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_promo(store: &str, code: &str, expires_at: Option<&str>) -> NewPromoCode {
        NewPromoCode {
            store: store.into(),
            code: code.into(),
            description: Some("10% off".into()),
            expires_at: expires_at.map(|d| d.parse().unwrap()),
        }
    }

    #[tokio::test]
    async fn insert_round_trips_all_fields() {
        let pool = crate::test_pool().await;
        let repo = PromoRepository::new(pool);

        let created = repo
            .insert(&new_promo("TestStore", "ABC123", Some("2099-01-01")))
            .await
            .expect("insert failed");
        assert!(created.id > 0);
        assert!(created.is_active);

        let promos = repo.get_available().await.expect("query failed");
        assert_eq!(promos.len(), 1);

        let promo = &promos[0];
        assert_eq!(promo.id, created.id);
        assert_eq!(promo.store, "TestStore");
        assert_eq!(promo.code, "ABC123");
        assert_eq!(promo.description.as_deref(), Some("10% off"));
        assert_eq!(promo.expires_at, Some("2099-01-01".parse().unwrap()));
    }

    #[tokio::test]
    async fn get_available_filters_expired_and_inactive() {
        let pool = crate::test_pool().await;
        let repo = PromoRepository::new(pool.clone());

        repo.insert(&new_promo("Fresh", "FRESH", Some("2099-01-01")))
            .await
            .unwrap();
        repo.insert(&new_promo("Forever", "FOREVER", None))
            .await
            .unwrap();
        repo.insert(&new_promo("Stale", "STALE", Some("2000-01-01")))
            .await
            .unwrap();

        let disabled = repo
            .insert(&new_promo("Disabled", "DISABLED", Some("2099-01-01")))
            .await
            .unwrap();
        sqlx::query("UPDATE promocodes SET is_active = FALSE WHERE id = $1")
            .bind(disabled.id)
            .execute(&pool)
            .await
            .unwrap();

        let promos = repo.get_available().await.unwrap();
        let codes: Vec<&str> = promos.iter().map(|p| p.code.as_str()).collect();
        assert!(codes.contains(&"FRESH"));
        assert!(codes.contains(&"FOREVER"));
        assert!(!codes.contains(&"STALE"));
        assert!(!codes.contains(&"DISABLED"));

        let today = Utc::now().date_naive();
        assert!(promos.iter().all(|p| p.is_available_on(today)));
    }

    #[tokio::test]
    async fn get_available_orders_newest_first() {
        let pool = crate::test_pool().await;
        let repo = PromoRepository::new(pool);

        repo.insert(&new_promo("First", "FIRST", None))
            .await
            .unwrap();
        repo.insert(&new_promo("Second", "SECOND", None))
            .await
            .unwrap();

        let promos = repo.get_available().await.unwrap();
        assert_eq!(promos[0].code, "SECOND");
        assert_eq!(promos[1].code, "FIRST");
    }

    #[tokio::test]
    async fn delete_reports_affected_rows() {
        let pool = crate::test_pool().await;
        let repo = PromoRepository::new(pool);

        let created = repo.insert(&new_promo("Shop", "GONE", None)).await.unwrap();

        assert_eq!(repo.delete(created.id).await.unwrap(), 1);
        assert_eq!(repo.delete(created.id).await.unwrap(), 0);
        assert_eq!(repo.delete(9999).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stats_counts_by_state_and_store() {
        let pool = crate::test_pool().await;
        let repo = PromoRepository::new(pool);

        repo.insert(&new_promo("Alpha", "A1", Some("2099-01-01")))
            .await
            .unwrap();
        repo.insert(&new_promo("Alpha", "A2", None)).await.unwrap();
        repo.insert(&new_promo("Beta", "B1", Some("2000-01-01")))
            .await
            .unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.by_store.len(), 2);
        assert_eq!(stats.by_store[0].store, "Alpha");
        assert_eq!(stats.by_store[0].count, 2);
        assert_eq!(stats.by_store[1].store, "Beta");
        assert_eq!(stats.by_store[1].count, 1);
    }
}
