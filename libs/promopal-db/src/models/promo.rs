use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PromoCode {
    pub id: i64,
    pub store: String,
    pub code: String,
    pub description: Option<String>,
    pub expires_at: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl PromoCode {
    /// Availability invariant: active and not expired as of `today`.
    /// A null expiry never expires; an expiry equal to `today` is expired.
    pub fn is_available_on(&self, today: NaiveDate) -> bool {
        self.is_active && self.expires_at.is_none_or(|d| d > today)
    }
}

/// Insert payload for a promo code. The store assigns id, activates the
/// record and stamps `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPromoCode {
    pub store: String,
    pub code: String,
    pub description: Option<String>,
    pub expires_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoStats {
    pub total: i64,
    pub active: i64,
    pub expired: i64,
    pub by_store: Vec<StoreCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoreCount {
    pub store: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo(active: bool, expires_at: Option<&str>) -> PromoCode {
        PromoCode {
            id: 1,
            store: "TestStore".into(),
            code: "ABC123".into(),
            description: None,
            expires_at: expires_at.map(|d| d.parse().unwrap()),
            is_active: active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn availability_invariant() {
        let today: NaiveDate = "2026-08-23".parse().unwrap();

        assert!(promo(true, None).is_available_on(today));
        assert!(promo(true, Some("2026-08-24")).is_available_on(today));
        // Expiry on the current date counts as expired.
        assert!(!promo(true, Some("2026-08-23")).is_available_on(today));
        assert!(!promo(true, Some("2020-01-01")).is_available_on(today));
        assert!(!promo(false, None).is_available_on(today));
        assert!(!promo(false, Some("2099-01-01")).is_available_on(today));
    }
}
