pub mod channel_repo;
pub mod promo_repo;

pub use channel_repo::ChannelRepository;
pub use promo_repo::PromoRepository;
