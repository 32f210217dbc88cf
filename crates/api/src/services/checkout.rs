//! Checkout service.
//!
//! A cart is a list of product ids. The sale total is the sum of each
//! listed product's current sale price, counting repeated ids once per
//! occurrence. Stock is not touched.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use store_manager_core::{Price, PriceError, ProductId};

use crate::db::{ProductRepository, RepositoryError, SaleRepository};
use crate::models::Sale;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart was empty, or none of its ids name an existing product.
    #[error("cart is empty")]
    EmptyCart,

    /// The cart total does not fit a stored sale total.
    #[error("cart total is too large: {0}")]
    TotalTooLarge(#[source] PriceError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Price a cart against a price table.
///
/// Ids missing from `prices` are skipped. Returns `None` if no id resolved.
#[must_use]
pub fn price_cart(ids: &[ProductId], prices: &HashMap<ProductId, Price>) -> Option<Price> {
    let mut resolved = ids.iter().filter_map(|id| prices.get(id)).peekable();
    resolved.peek()?;
    Some(resolved.sum())
}

/// Check that a cart total fits the sale ledger.
///
/// # Errors
///
/// Returns `CheckoutError::TotalTooLarge` when the total reaches
/// [`Price::LIMIT`].
pub fn storable_total(total: Price) -> Result<Price, CheckoutError> {
    Price::new(total.amount()).map_err(CheckoutError::TotalTooLarge)
}

/// Checkout service.
pub struct CheckoutService<'a> {
    products: ProductRepository<'a>,
    sales: SaleRepository<'a>,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
            sales: SaleRepository::new(pool),
        }
    }

    /// Record a sale for the given cart, timestamped `now`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if `ids` is empty or none of them
    /// resolve to a product, and `CheckoutError::TotalTooLarge` if the sum
    /// overflows a stored total. No sale is recorded in either case.
    /// Returns `CheckoutError::Repository` if a database operation fails.
    pub async fn checkout(
        &self,
        ids: &[ProductId],
        now: DateTime<Utc>,
    ) -> Result<Sale, CheckoutError> {
        if ids.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let prices = self.products.sale_prices(ids).await?;
        let total = price_cart(ids, &prices).ok_or(CheckoutError::EmptyCart)?;
        let total = storable_total(total)?;

        let sale = self.sales.create(now, total).await?;

        info!(
            sale_id = %sale.id,
            items = ids.len(),
            unknown_items = ids.iter().filter(|id| !prices.contains_key(*id)).count(),
            total = %sale.total,
            "Sale recorded"
        );

        Ok(sale)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn prices() -> HashMap<ProductId, Price> {
        HashMap::from([
            (ProductId::new(1), Price::from_cents(1000)),
            (ProductId::new(2), Price::from_cents(550)),
        ])
    }

    #[test]
    fn test_duplicates_are_counted_per_occurrence() {
        let ids = [ProductId::new(1), ProductId::new(1)];
        assert_eq!(price_cart(&ids, &prices()), Some(Price::from_cents(2000)));
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let ids = [ProductId::new(2), ProductId::new(404), ProductId::new(1)];
        assert_eq!(price_cart(&ids, &prices()), Some(Price::from_cents(1550)));
    }

    #[test]
    fn test_nothing_resolved_is_none() {
        assert_eq!(price_cart(&[], &prices()), None);
        assert_eq!(price_cart(&[ProductId::new(404)], &prices()), None);
    }

    #[test]
    fn test_free_product_still_counts_as_resolved() {
        let table = HashMap::from([(ProductId::new(7), Price::ZERO)]);
        assert_eq!(price_cart(&[ProductId::new(7)], &table), Some(Price::ZERO));
    }

    #[test]
    fn test_total_beyond_ledger_column_is_rejected() {
        let max = Price::new("9999999999999999.99".parse().unwrap()).unwrap();
        let table = HashMap::from([(ProductId::new(1), max)]);
        let total = price_cart(&[ProductId::new(1), ProductId::new(1)], &table).unwrap();

        assert!(matches!(
            storable_total(total),
            Err(CheckoutError::TotalTooLarge(PriceError::TooLarge(_)))
        ));
        assert_eq!(storable_total(max).unwrap(), max);
    }
}
