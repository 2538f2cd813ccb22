use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::models::NewPromoCode;
use crate::repositories::{ChannelRepository, PromoRepository};

/// Replaces the catalog with a small sample dataset.
///
/// Dev and test aid only; wipes both tables first and is never invoked
/// implicitly.
pub async fn seed_sample_data(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM promocodes")
        .execute(pool)
        .await
        .context("Failed to clear promocodes")?;
    sqlx::query("DELETE FROM channels")
        .execute(pool)
        .await
        .context("Failed to clear channels")?;

    let channels = ChannelRepository::new(pool.clone());
    for (name, username) in [
        ("Best Offers", "promo_channel_1"),
        ("Promo of the Day", "promo_channel_2"),
        ("Deals & Discounts", "promo_channel_3"),
    ] {
        channels.insert(name, username).await?;
    }

    let promos = PromoRepository::new(pool.clone());
    let samples = [
        ("Wildberries", "WBNEW25", "25% off your first order", "2027-01-31"),
        ("Ozon", "OZONFRESH10", "10% off home goods", "2026-12-20"),
        ("AliExpress", "ALIWOW5", "5% off everything", "2027-02-15"),
        ("Lamoda", "STYLE20", "20% off clothes and shoes", "2026-11-30"),
        ("KFC", "CRISPY50", "50% off the second combo", "2026-10-30"),
        ("Subway", "EATFRESH", "Two for the price of one", "2026-12-31"),
        ("Adidas", "SPORT25", "25% off new collections", "2027-03-01"),
        ("Nike", "JUSTDO10", "10% off everything", "2026-12-10"),
    ];
    for (store, code, description, expires_at) in samples {
        promos
            .insert(&NewPromoCode {
                store: store.into(),
                code: code.into(),
                description: Some(description.into()),
                expires_at: Some(expires_at.parse()?),
            })
            .await?;
    }

    Ok(())
}
