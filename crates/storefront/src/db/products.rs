//! Catalog repository.

use sqlx::SqlitePool;

use rummage_core::ProductId;

use super::{RepositoryError, map_unique_violation};
use crate::models::{NewProduct, Product, ProductUpdate};

const PRODUCT_COLUMNS: &str = "id, name, size, price, description, location, stock, image_path";

/// Repository for product catalog operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List the whole catalog, best-stocked first.
    ///
    /// No pagination: full scans are fine at this catalog's size.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY stock DESC, id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO product (name, size, price, description, location, stock)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.size)
        .bind(new.price)
        .bind(&new.description)
        .bind(&new.location)
        .bind(new.stock)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "product name already exists"))?;

        Ok(product)
    }

    /// Update a product; unset fields are left as-is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if a new name is already taken.
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE product
             SET name = COALESCE(?, name),
                 size = COALESCE(?, size),
                 price = COALESCE(?, price),
                 description = COALESCE(?, description),
                 location = COALESCE(?, location),
                 stock = COALESCE(?, stock)
             WHERE id = ?
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(update.name.as_deref())
        .bind(update.size.as_deref())
        .bind(update.price)
        .bind(update.description.as_deref())
        .bind(update.location.as_deref())
        .bind(update.stock)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "product name already exists"))?;

        product.ok_or(RepositoryError::NotFound)
    }

    /// Set a product's image reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_image(&self, id: ProductId, path: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE product SET image_path = ? WHERE id = ?")
            .bind(path)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a product by ID.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
