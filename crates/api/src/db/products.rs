//! Product repository for database operations.
//!
//! Products and their variants are always read together. Writes that touch
//! variants run inside a single transaction.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use store_manager_core::{PhotoSlots, Price, ProductId, VariantId};

use super::RepositoryError;
use crate::models::product::{Product, ProductDraft, Variant, VariantDraft};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    category: String,
    cost_price: Decimal,
    sale_price: Decimal,
    photo_url_1: Option<String>,
    photo_url_2: Option<String>,
    photo_url_3: Option<String>,
    photo_url_4: Option<String>,
}

impl ProductRow {
    fn into_product(self, variants: Vec<Variant>) -> Result<Product, RepositoryError> {
        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            category: self.category,
            cost_price: stored_price(self.cost_price, "cost_price")?,
            sale_price: stored_price(self.sale_price, "sale_price")?,
            photos: PhotoSlots::new([
                self.photo_url_1,
                self.photo_url_2,
                self.photo_url_3,
                self.photo_url_4,
            ]),
            variants,
        })
    }
}

/// Internal row type for variant queries.
#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    id: i32,
    product_id: i32,
    size: String,
    color: String,
    stock: i32,
}

impl From<VariantRow> for Variant {
    fn from(row: VariantRow) -> Self {
        Self {
            id: VariantId::new(row.id),
            product_id: ProductId::new(row.product_id),
            size: row.size,
            color: row.color,
            stock: row.stock,
        }
    }
}

/// Internal row type for price lookups.
#[derive(Debug, sqlx::FromRow)]
struct PriceRow {
    id: i32,
    sale_price: Decimal,
}

fn stored_price(amount: Decimal, column: &str) -> Result<Price, RepositoryError> {
    Price::new(amount)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid {column} in database: {e}")))
}

const PRODUCT_COLUMNS: &str = "id, name, category, cost_price, sale_price, \
     photo_url_1, photo_url_2, photo_url_3, photo_url_4";

// =============================================================================
// Repository
// =============================================================================

/// Repository for product and variant database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product with its variants, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.product ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        let variant_rows = sqlx::query_as::<_, VariantRow>(
            r"
            SELECT id, product_id, size, color, stock
            FROM store.variant
            ORDER BY product_id, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut by_product: HashMap<i32, Vec<Variant>> = HashMap::new();
        for row in variant_rows {
            by_product.entry(row.product_id).or_default().push(row.into());
        }

        rows.into_iter()
            .map(|row| {
                let variants = by_product.remove(&row.id).unwrap_or_default();
                row.into_product(variants)
            })
            .collect()
    }

    /// Get a product with its variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let variants = self.variants_for(id).await?;
        row.into_product(variants).map(Some)
    }

    /// Check whether a product row exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM store.product WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Insert a product and its variants in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing is
    /// written in that case.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let [photo_1, photo_2, photo_3, photo_4] = draft.photos.clone().into_array();
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO store.product (
                name, category, cost_price, sale_price,
                photo_url_1, photo_url_2, photo_url_3, photo_url_4
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&draft.name)
        .bind(&draft.category)
        .bind(draft.cost_price.amount())
        .bind(draft.sale_price.amount())
        .bind(photo_1)
        .bind(photo_2)
        .bind(photo_3)
        .bind(photo_4)
        .fetch_one(&mut *tx)
        .await?;

        let product_id = ProductId::new(row.id);
        let variants = insert_variants(&mut tx, product_id, &draft.variants).await?;

        tx.commit().await?;

        row.into_product(variants)
    }

    /// Overwrite a product and replace its whole variant set.
    ///
    /// Every scalar column is rewritten from the draft. All existing variant
    /// rows are deleted and the draft's variants are inserted as new rows, so
    /// variant ids change on every call.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Concurrency` if the product row was not
    /// there to update, or the write collided with another transaction.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn replace(&self, id: ProductId, draft: &ProductDraft) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let [photo_1, photo_2, photo_3, photo_4] = draft.photos.clone().into_array();
        let updated = sqlx::query(
            r"
            UPDATE store.product
            SET name = $2, category = $3, cost_price = $4, sale_price = $5,
                photo_url_1 = $6, photo_url_2 = $7, photo_url_3 = $8, photo_url_4 = $9
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.category)
        .bind(draft.cost_price.amount())
        .bind(draft.sale_price.amount())
        .bind(photo_1)
        .bind(photo_2)
        .bind(photo_3)
        .bind(photo_4)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::Concurrency(format!(
                "product {id} was not updated"
            )));
        }

        sqlx::query("DELETE FROM store.variant WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from_write)?;

        insert_variants(&mut tx, id, &draft.variants)
            .await
            .map_err(|e| match e {
                RepositoryError::Database(err) => RepositoryError::from_write(err),
                other => other,
            })?;

        tx.commit().await.map_err(RepositoryError::from_write)?;

        Ok(())
    }

    /// Delete a product. Its variants go with it (`ON DELETE CASCADE`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM store.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Current sale prices for the given ids. Unknown ids are absent from the
    /// map; duplicates in the input are looked up once.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn sale_prices(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Price>, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();

        let rows = sqlx::query_as::<_, PriceRow>(
            "SELECT id, sale_price FROM store.product WHERE id = ANY($1)",
        )
        .bind(&raw)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Ok((ProductId::new(row.id), stored_price(row.sale_price, "sale_price")?)))
            .collect()
    }

    /// Number of products and the sum of their sale prices.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the sum is invalid.
    pub async fn totals(&self) -> Result<(i64, Price), RepositoryError> {
        let (count, sum): (i64, Decimal) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(sale_price), 0) FROM store.product",
        )
        .fetch_one(self.pool)
        .await?;

        let value = Price::aggregate(sum).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid sale_price sum in database: {e}"))
        })?;

        Ok((count, value))
    }

    async fn variants_for(&self, id: ProductId) -> Result<Vec<Variant>, RepositoryError> {
        let rows = sqlx::query_as::<_, VariantRow>(
            r"
            SELECT id, product_id, size, color, stock
            FROM store.variant
            WHERE product_id = $1
            ORDER BY id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Insert variants for a product as brand-new rows.
async fn insert_variants(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
    variants: &[VariantDraft],
) -> Result<Vec<Variant>, RepositoryError> {
    let mut inserted = Vec::with_capacity(variants.len());

    for variant in variants {
        let row = sqlx::query_as::<_, VariantRow>(
            r"
            INSERT INTO store.variant (product_id, size, color, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING id, product_id, size, color, stock
            ",
        )
        .bind(product_id)
        .bind(&variant.size)
        .bind(&variant.color)
        .bind(variant.stock)
        .fetch_one(&mut **tx)
        .await?;

        inserted.push(row.into());
    }

    Ok(inserted)
}
