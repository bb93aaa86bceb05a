//! Checkout finalization.
//!
//! There is no payment integration here: once a payment provider reports
//! success, [`OrderService::finalize`] settles the storefront side by
//! zeroing stock for everything in the cart and emptying the cart, in one
//! transaction.

use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;

use rummage_core::AccountId;

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;

/// What finalization changed.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OrderOutcome {
    /// Distinct products whose stock was zeroed.
    pub products_sold: u64,
    /// Cart lines removed.
    pub lines_cleared: u64,
}

/// Errors from order finalization.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Order settlement against the storefront database.
pub struct OrderService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Settle an account's cart after a successful payment.
    ///
    /// Zeroes stock for every carted product and clears the cart. Both
    /// happen in one transaction; an empty cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Database` if the transaction fails.
    pub async fn finalize(&self, account_id: AccountId) -> Result<OrderOutcome, OrderError> {
        let mut tx = self.pool.begin().await?;

        let products_sold = sqlx::query(
            "UPDATE product SET stock = 0
             WHERE id IN (SELECT product_id FROM cart_line WHERE account_id = ?)",
        )
        .bind(account_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let lines_cleared = CartRepository::clear_account(&mut *tx, account_id).await?;

        tx.commit().await?;

        Ok(OrderOutcome {
            products_sold,
            lines_cleared,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::accounts::AccountRepository;
    use crate::db::products::ProductRepository;
    use crate::db::test_support::memory_pool;
    use crate::models::NewProduct;
    use crate::services::cart::{CartService, LineTotalPolicy, PricingPolicy};

    use rummage_core::{Email, Price, ProductId, Role};

    async fn seed_account(pool: &SqlitePool, email: &str) -> AccountId {
        let email: Email = email.parse().unwrap();
        AccountRepository::new(pool)
            .create(&email, "hash", "Shopper", Role::Customer)
            .await
            .unwrap()
            .id
    }

    async fn seed_product(pool: &SqlitePool, name: &str) -> ProductId {
        ProductRepository::new(pool)
            .create(&NewProduct {
                name: name.to_owned(),
                size: "M".to_owned(),
                price: Price::parse("20.00").unwrap(),
                description: "desc".to_owned(),
                location: "LA".to_owned(),
                stock: 3,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_finalize_zeroes_stock_and_clears_cart() {
        let pool = memory_pool().await;
        let account = seed_account(&pool, "amy@example.com").await;
        let cap = seed_product(&pool, "Cap").await;
        let cart = CartService::new(&pool);

        cart.add(account, cap, LineTotalPolicy::PerUnit).await.unwrap();
        cart.add(account, cap, LineTotalPolicy::PerUnit).await.unwrap();

        let outcome = OrderService::new(&pool).finalize(account).await.unwrap();
        assert_eq!(outcome.products_sold, 1);
        assert_eq!(outcome.lines_cleared, 2);

        let product = ProductRepository::new(&pool).get(cap).await.unwrap().unwrap();
        assert_eq!(product.stock, 0);
        let view = cart.view(account, PricingPolicy::Live).await.unwrap();
        assert!(view.items.is_empty());
    }

    #[tokio::test]
    async fn test_finalize_empty_cart_is_noop() {
        let pool = memory_pool().await;
        let account = seed_account(&pool, "amy@example.com").await;

        let outcome = OrderService::new(&pool).finalize(account).await.unwrap();
        assert_eq!(outcome.products_sold, 0);
        assert_eq!(outcome.lines_cleared, 0);
    }

    #[tokio::test]
    async fn test_finalize_leaves_other_carts_alone() {
        let pool = memory_pool().await;
        let amy = seed_account(&pool, "amy@example.com").await;
        let bob = seed_account(&pool, "bob@example.com").await;
        let cap = seed_product(&pool, "Cap").await;
        let tee = seed_product(&pool, "Tee").await;
        let cart = CartService::new(&pool);

        cart.add(amy, cap, LineTotalPolicy::PerUnit).await.unwrap();
        cart.add(bob, tee, LineTotalPolicy::PerUnit).await.unwrap();

        OrderService::new(&pool).finalize(amy).await.unwrap();

        // Bob's cart and his product's stock are untouched.
        let view = cart.view(bob, PricingPolicy::Live).await.unwrap();
        assert_eq!(view.items.len(), 1);
        let product = ProductRepository::new(&pool).get(tee).await.unwrap().unwrap();
        assert_eq!(product.stock, 3);
    }
}
