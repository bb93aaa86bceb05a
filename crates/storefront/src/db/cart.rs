//! Cart line repository.

use sqlx::{SqliteExecutor, SqlitePool};

use rummage_core::{AccountId, Price, ProductId};

use super::RepositoryError;
use crate::models::CartLine;

const CART_LINE_COLUMNS: &str = "id, account_id, product_id, product_name, unit_price, line_total";

/// Repository for per-account cart lines.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All cart lines for an account, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(&format!(
            "SELECT {CART_LINE_COLUMNS} FROM cart_line WHERE account_id = ? ORDER BY id ASC"
        ))
        .bind(account_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Insert a cart line with the given price snapshot.
    ///
    /// Repeated adds for the same product each insert a new line; the
    /// aggregated view collapses duplicates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_line(
        &self,
        account_id: AccountId,
        product_id: ProductId,
        product_name: &str,
        unit_price: Price,
        line_total: Price,
    ) -> Result<CartLine, RepositoryError> {
        let line = sqlx::query_as::<_, CartLine>(&format!(
            "INSERT INTO cart_line (account_id, product_id, product_name, unit_price, line_total)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {CART_LINE_COLUMNS}"
        ))
        .bind(account_id)
        .bind(product_id)
        .bind(product_name)
        .bind(unit_price)
        .bind(line_total)
        .fetch_one(self.pool)
        .await?;

        Ok(line)
    }

    /// Remove every line for a product from one account's cart.
    ///
    /// Scoped to the account: other shoppers' lines for the same product are
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove_product(
        &self,
        account_id: AccountId,
        product_id: ProductId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_line WHERE account_id = ? AND product_id = ?")
            .bind(account_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete every line in an account's cart.
    ///
    /// Takes any executor so checkout can clear the cart inside its
    /// settlement transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear_account(
        executor: impl SqliteExecutor<'_>,
        account_id: AccountId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_line WHERE account_id = ?")
            .bind(account_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rummage_core::{Email, Role};

    use super::*;
    use crate::db::accounts::AccountRepository;
    use crate::db::products::ProductRepository;
    use crate::db::test_support::memory_pool;
    use crate::models::NewProduct;

    async fn seed_account(pool: &SqlitePool, email: &str) -> AccountId {
        let email: Email = email.parse().unwrap();
        AccountRepository::new(pool)
            .create(&email, "hash", "Shopper", Role::Customer)
            .await
            .unwrap()
            .id
    }

    async fn seed_product(pool: &SqlitePool, name: &str, price: &str) -> ProductId {
        ProductRepository::new(pool)
            .create(&NewProduct {
                name: name.to_owned(),
                size: "M".to_owned(),
                price: Price::parse(price).unwrap(),
                description: "desc".to_owned(),
                location: "LA".to_owned(),
                stock: 2,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_insert_and_list_in_order() {
        let pool = memory_pool().await;
        let repo = CartRepository::new(&pool);
        let account = seed_account(&pool, "a@example.com").await;
        let cap = seed_product(&pool, "Cap", "10.00").await;
        let tee = seed_product(&pool, "Tee", "15.00").await;

        let price = Price::parse("10.00").unwrap();
        repo.insert_line(account, cap, "Cap", price, price).await.unwrap();
        let price = Price::parse("15.00").unwrap();
        repo.insert_line(account, tee, "Tee", price, price).await.unwrap();

        let lines = repo.lines_for_account(account).await.unwrap();
        let names: Vec<&str> = lines.iter().map(|l| l.product_name.as_str()).collect();
        assert_eq!(names, vec!["Cap", "Tee"]);
    }

    #[tokio::test]
    async fn test_remove_product_is_scoped_to_account() {
        let pool = memory_pool().await;
        let repo = CartRepository::new(&pool);
        let amy = seed_account(&pool, "amy@example.com").await;
        let bob = seed_account(&pool, "bob@example.com").await;
        let cap = seed_product(&pool, "Cap", "10.00").await;
        let price = Price::parse("10.00").unwrap();

        repo.insert_line(amy, cap, "Cap", price, price).await.unwrap();
        repo.insert_line(bob, cap, "Cap", price, price).await.unwrap();

        let removed = repo.remove_product(amy, cap).await.unwrap();
        assert_eq!(removed, 1);

        assert!(repo.lines_for_account(amy).await.unwrap().is_empty());
        assert_eq!(repo.lines_for_account(bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_product_removes_duplicate_lines() {
        let pool = memory_pool().await;
        let repo = CartRepository::new(&pool);
        let account = seed_account(&pool, "a@example.com").await;
        let cap = seed_product(&pool, "Cap", "10.00").await;
        let price = Price::parse("10.00").unwrap();

        repo.insert_line(account, cap, "Cap", price, price).await.unwrap();
        repo.insert_line(account, cap, "Cap", price, price).await.unwrap();

        assert_eq!(repo.remove_product(account, cap).await.unwrap(), 2);
        assert!(repo.lines_for_account(account).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_account() {
        let pool = memory_pool().await;
        let repo = CartRepository::new(&pool);
        let account = seed_account(&pool, "a@example.com").await;
        let cap = seed_product(&pool, "Cap", "10.00").await;
        let tee = seed_product(&pool, "Tee", "15.00").await;
        let price = Price::parse("10.00").unwrap();

        repo.insert_line(account, cap, "Cap", price, price).await.unwrap();
        repo.insert_line(account, tee, "Tee", price, price).await.unwrap();

        assert_eq!(CartRepository::clear_account(&pool, account).await.unwrap(), 2);
        assert!(repo.lines_for_account(account).await.unwrap().is_empty());
    }
}
