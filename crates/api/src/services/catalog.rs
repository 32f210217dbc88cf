//! Catalog service.
//!
//! CRUD over products plus the replace flow, which rewrites a product's
//! scalar fields and swaps its entire variant set in one transaction.

use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use store_manager_core::ProductId;

use crate::db::{ProductRepository, RepositoryError};
use crate::models::product::{InvalidProduct, Product, ProductInput};

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with this id.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// Replace payload names a different product than the path.
    #[error("payload id {body} does not match product {path}")]
    IdMismatch { path: ProductId, body: ProductId },

    /// Payload failed validation.
    #[error(transparent)]
    Invalid(#[from] InvalidProduct),

    /// Replace collided with a concurrent modification and the product
    /// still exists.
    #[error("product {0} was modified concurrently")]
    Conflict(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Catalog service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// All products with variants, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the database operation fails.
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list().await?)
    }

    /// One product with variants.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the id is unknown.
    pub async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .get(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Create a product and its variants.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` if the payload fails validation.
    /// Returns `CatalogError::Repository` if the database operation fails.
    pub async fn create(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let draft = input.validate()?;
        let product = self.products.create(&draft).await?;

        info!(
            product_id = %product.id,
            variants = product.variants.len(),
            "Product created"
        );

        Ok(product)
    }

    /// Fully replace a product.
    ///
    /// Every scalar field and all four photo slots take the payload's values.
    /// Existing variants are deleted and the payload's variants inserted as
    /// new rows, so variant ids never survive a replace.
    ///
    /// If the write detects a concurrent modification, existence is checked
    /// again: a vanished product is `NotFound`, otherwise `Conflict`. Nothing
    /// is retried.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::IdMismatch` if the payload carries another id.
    /// Returns `CatalogError::Invalid` if the payload fails validation.
    /// Returns `CatalogError::NotFound` if the product doesn't exist.
    /// Returns `CatalogError::Conflict` on an unresolvable concurrent write.
    pub async fn replace(&self, id: ProductId, input: ProductInput) -> Result<(), CatalogError> {
        if let Some(body) = input.id
            && body != id
        {
            return Err(CatalogError::IdMismatch { path: id, body });
        }

        let draft = input.validate()?;

        let existing = self
            .products
            .get(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        match self.products.replace(id, &draft).await {
            Ok(()) => {
                info!(
                    product_id = %id,
                    removed_variants = existing.variants.len(),
                    inserted_variants = draft.variants.len(),
                    "Product replaced"
                );
                Ok(())
            }
            Err(RepositoryError::Concurrency(reason)) => {
                warn!(product_id = %id, %reason, "Concurrent modification during replace");
                Err(after_concurrent_write(id, self.products.exists(id).await?))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Delete a product and, by cascade, its variants.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product doesn't exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        match self.products.delete(id).await {
            Ok(()) => {
                info!(product_id = %id, "Product deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(CatalogError::NotFound(id)),
            Err(other) => Err(other.into()),
        }
    }
}

/// Outcome of a replace that lost a race: 404 if the product is gone,
/// otherwise 409.
const fn after_concurrent_write(id: ProductId, still_exists: bool) -> CatalogError {
    if still_exists {
        CatalogError::Conflict(id)
    } else {
        CatalogError::NotFound(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lost_race_on_existing_product_is_conflict() {
        let id = ProductId::new(3);
        assert!(matches!(
            after_concurrent_write(id, true),
            CatalogError::Conflict(got) if got == id
        ));
    }

    #[test]
    fn test_lost_race_on_deleted_product_is_not_found() {
        let id = ProductId::new(3);
        assert!(matches!(
            after_concurrent_write(id, false),
            CatalogError::NotFound(got) if got == id
        ));
    }
}
