//! Sale repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use store_manager_core::{Price, SaleId};

use super::RepositoryError;
use crate::models::Sale;

/// Internal row type for sale queries.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i32,
    sold_at: DateTime<Utc>,
    total: Decimal,
}

impl TryFrom<SaleRow> for Sale {
    type Error = RepositoryError;

    fn try_from(row: SaleRow) -> Result<Self, Self::Error> {
        let total = Price::new(row.total).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid sale total in database: {e}"))
        })?;

        Ok(Self {
            id: SaleId::new(row.id),
            sold_at: row.sold_at,
            total,
        })
    }
}

/// Repository for sale database operations.
pub struct SaleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        sold_at: DateTime<Utc>,
        total: Price,
    ) -> Result<Sale, RepositoryError> {
        let row = sqlx::query_as::<_, SaleRow>(
            r"
            INSERT INTO store.sale (sold_at, total)
            VALUES ($1, $2)
            RETURNING id, sold_at, total
            ",
        )
        .bind(sold_at)
        .bind(total.amount())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Count sales with `start <= sold_at < end`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, RepositoryError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM store.sale WHERE sold_at >= $1 AND sold_at < $2")
                .bind(start)
                .bind(end)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }
}
