pub mod catalog;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod seed;

pub use sqlx;

pub use catalog::Catalog;
pub use error::CatalogError;

#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    // In-memory SQLite is per-connection, so the test pool must stay at one.
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    db::init_schema(&pool).await.expect("failed to create schema");
    pool
}
