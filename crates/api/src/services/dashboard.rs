//! Dashboard aggregates.

use chrono::{DateTime, Days, NaiveTime, Utc};
use sqlx::PgPool;

use crate::db::{ProductRepository, RepositoryError, SaleRepository};
use crate::models::DashboardStats;

/// The UTC calendar day containing `now`, as a half-open `[start, end)` range.
#[must_use]
pub fn today_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let end = start.checked_add_days(Days::new(1)).unwrap_or(DateTime::<Utc>::MAX_UTC);
    (start, end)
}

/// Dashboard service.
pub struct DashboardService<'a> {
    products: ProductRepository<'a>,
    sales: SaleRepository<'a>,
}

impl<'a> DashboardService<'a> {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
            sales: SaleRepository::new(pool),
        }
    }

    /// Product count, summed sale prices and number of sales today.
    ///
    /// Stock value is the plain sum of every product's sale price; variant
    /// stock does not weight it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a query fails.
    pub async fn stats(&self, now: DateTime<Utc>) -> Result<DashboardStats, RepositoryError> {
        let (total_products, stock_value) = self.products.totals().await?;
        let (start, end) = today_bounds(now);
        let sales_today = self.sales.count_between(start, end).await?;

        Ok(DashboardStats {
            total_products,
            stock_value,
            sales_today,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_today_bounds_cover_the_utc_day() {
        let now = Utc.with_ymd_and_hms(2025, 12, 8, 15, 42, 7).unwrap();
        let (start, end) = today_bounds(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 12, 8, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 12, 9, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_midnight_belongs_to_the_new_day() {
        let now = Utc.with_ymd_and_hms(2025, 12, 9, 0, 0, 0).unwrap();
        let (start, _) = today_bounds(now);
        assert_eq!(start, now);
    }

    #[test]
    fn test_last_instant_stays_in_the_old_day() {
        let now = Utc.with_ymd_and_hms(2025, 12, 8, 23, 59, 59).unwrap();
        let (start, end) = today_bounds(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 12, 8, 0, 0, 0).unwrap());
        assert!(now < end);
    }
}
