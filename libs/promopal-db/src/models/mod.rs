pub mod channel;
pub mod promo;

pub use channel::Channel;
pub use promo::{NewPromoCode, PromoCode, PromoStats, StoreCount};
