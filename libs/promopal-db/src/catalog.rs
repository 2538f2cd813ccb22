use sqlx::SqlitePool;
use tracing::error;

use crate::error::CatalogError;
use crate::models::{Channel, NewPromoCode, PromoCode, PromoStats};
use crate::repositories::{ChannelRepository, PromoRepository};

/// Access layer over the catalog store.
///
/// Reads are fail-open: a store failure is logged and an empty sequence is
/// returned, so transport handlers never crash on a catalog read. Writes and
/// stats propagate errors for the caller to render.
#[derive(Debug, Clone)]
pub struct Catalog {
    promos: PromoRepository,
    channels: ChannelRepository,
}

impl Catalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            promos: PromoRepository::new(pool.clone()),
            channels: ChannelRepository::new(pool),
        }
    }

    pub async fn available_promocodes(&self) -> Vec<PromoCode> {
        match self.promos.get_available().await {
            Ok(promos) => promos,
            Err(e) => {
                error!("Failed to fetch available promo codes: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn required_channels(&self) -> Vec<Channel> {
        match self.channels.get_required().await {
            Ok(channels) => channels,
            Err(e) => {
                error!("Failed to fetch required channels: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn add_promocode(&self, new: &NewPromoCode) -> Result<PromoCode, CatalogError> {
        self.promos.insert(new).await
    }

    pub async fn add_channel(&self, name: &str, username: &str) -> Result<Channel, CatalogError> {
        self.channels.insert(name, username).await
    }

    pub async fn delete_promocode(&self, id: i64) -> Result<u64, CatalogError> {
        self.promos.delete(id).await
    }

    pub async fn delete_channel(&self, id: i64) -> Result<u64, CatalogError> {
        self.channels.delete(id).await
    }

    pub async fn promo_stats(&self) -> Result<PromoStats, CatalogError> {
        self.promos.stats().await
    }
}
