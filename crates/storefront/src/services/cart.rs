//! Cart operations: add, remove, and the aggregated view.
//!
//! The cart table stores one row per add, duplicates included. Aggregation
//! happens at view time: the first line per product wins and later
//! duplicates are dropped, so the view lists each product once in the order
//! it first entered the cart.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;

use rummage_core::{AccountId, CartLineId, Price, PriceError, ProductId};

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::db::products::ProductRepository;

/// How the aggregated view prices items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingPolicy {
    /// Re-read the catalog: price changes after add show through, and
    /// products deleted from the catalog drop out of the view.
    #[default]
    Live,
    /// Use the price captured when the line was added.
    Snapshot,
}

/// How a line total is computed at add time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTotalPolicy {
    /// One unit, one unit price.
    #[default]
    PerUnit,
    /// Double the unit price, matching the storefront's historical
    /// behavior. Kept behind `STOREFRONT_LEGACY_CART_TOTALS` for
    /// deployments that priced around it.
    Legacy,
}

impl LineTotalPolicy {
    /// Pick the policy from the legacy-totals switch.
    #[must_use]
    pub const fn from_legacy_flag(legacy: bool) -> Self {
        if legacy { Self::Legacy } else { Self::PerUnit }
    }
}

/// One entry in the aggregated cart view.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub line_id: CartLineId,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub line_total: Price,
}

/// The aggregated cart: distinct products plus the grand total.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    /// Sum of line totals, rounded to cents.
    pub total: Decimal,
}

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product to add does not exist.
    #[error("unknown product")]
    UnknownProduct,

    /// Computing a line total produced an invalid price.
    #[error(transparent)]
    Pricing(#[from] PriceError),

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Cart operations for one storefront database.
pub struct CartService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a product to an account's cart.
    ///
    /// Snapshots the product's name and current price onto the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UnknownProduct` if the product doesn't exist.
    pub async fn add(
        &self,
        account_id: AccountId,
        product_id: ProductId,
        totals: LineTotalPolicy,
    ) -> Result<(), CartError> {
        let product = ProductRepository::new(self.pool)
            .get(product_id)
            .await?
            .ok_or(CartError::UnknownProduct)?;

        let line_total = match totals {
            LineTotalPolicy::PerUnit => product.price,
            LineTotalPolicy::Legacy => Price::new(product.price.amount() * Decimal::TWO)?,
        };

        CartRepository::new(self.pool)
            .insert_line(account_id, product_id, &product.name, product.price, line_total)
            .await?;

        Ok(())
    }

    /// Remove a product from an account's cart.
    ///
    /// Removing a product absent from the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the delete fails.
    pub async fn remove(
        &self,
        account_id: AccountId,
        product_id: ProductId,
    ) -> Result<u64, CartError> {
        let removed = CartRepository::new(self.pool)
            .remove_product(account_id, product_id)
            .await?;
        Ok(removed)
    }

    /// Build the aggregated view of an account's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a query fails.
    pub async fn view(
        &self,
        account_id: AccountId,
        pricing: PricingPolicy,
    ) -> Result<CartView, CartError> {
        let lines = CartRepository::new(self.pool)
            .lines_for_account(account_id)
            .await?;
        let products = ProductRepository::new(self.pool);

        let mut seen: HashSet<ProductId> = HashSet::new();
        let mut items = Vec::new();
        let mut total = Decimal::ZERO;

        for line in lines {
            if !seen.insert(line.product_id) {
                continue;
            }

            let item = match pricing {
                PricingPolicy::Snapshot => CartItem {
                    line_id: line.id,
                    product_id: line.product_id,
                    name: line.product_name,
                    unit_price: line.unit_price,
                    line_total: line.line_total,
                },
                PricingPolicy::Live => {
                    // A product deleted since the add has no live price;
                    // its line simply doesn't show.
                    let Some(product) = products.get(line.product_id).await? else {
                        continue;
                    };
                    CartItem {
                        line_id: line.id,
                        product_id: line.product_id,
                        name: product.name,
                        unit_price: product.price,
                        line_total: product.price,
                    }
                }
            };

            total += item.line_total.amount();
            items.push(item);
        }

        Ok(CartView {
            items,
            total: total.round_dp(2),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::accounts::AccountRepository;
    use crate::db::test_support::memory_pool;
    use crate::models::{NewProduct, ProductUpdate};

    use rummage_core::{Email, Role};

    async fn seed_account(pool: &SqlitePool) -> AccountId {
        let email: Email = "shopper@example.com".parse().unwrap();
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
                stock: 1,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let pool = memory_pool().await;
        let cart = CartService::new(&pool);
        let account = seed_account(&pool).await;

        let err = cart
            .add(account, ProductId::new(404), LineTotalPolicy::PerUnit)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::UnknownProduct));
    }

    #[tokio::test]
    async fn test_view_dedups_first_occurrence_wins() {
        let pool = memory_pool().await;
        let cart = CartService::new(&pool);
        let account = seed_account(&pool).await;
        let cap = seed_product(&pool, "Cap", "10.00").await;
        let tee = seed_product(&pool, "Tee", "15.50").await;

        cart.add(account, cap, LineTotalPolicy::PerUnit).await.unwrap();
        cart.add(account, tee, LineTotalPolicy::PerUnit).await.unwrap();
        cart.add(account, cap, LineTotalPolicy::PerUnit).await.unwrap();

        let view = cart.view(account, PricingPolicy::Live).await.unwrap();
        let names: Vec<&str> = view.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Cap", "Tee"]);
        assert_eq!(view.total, Decimal::new(2550, 2));
    }

    #[tokio::test]
    async fn test_live_pricing_tracks_catalog_changes() {
        let pool = memory_pool().await;
        let cart = CartService::new(&pool);
        let account = seed_account(&pool).await;
        let cap = seed_product(&pool, "Cap", "10.00").await;

        cart.add(account, cap, LineTotalPolicy::PerUnit).await.unwrap();
        ProductRepository::new(&pool)
            .update(
                cap,
                &ProductUpdate {
                    price: Some(Price::parse("12.00").unwrap()),
                    ..ProductUpdate::default()
                },
            )
            .await
            .unwrap();

        let live = cart.view(account, PricingPolicy::Live).await.unwrap();
        assert_eq!(live.total, Decimal::new(1200, 2));

        let snapshot = cart.view(account, PricingPolicy::Snapshot).await.unwrap();
        assert_eq!(snapshot.total, Decimal::new(1000, 2));
    }

    #[tokio::test]
    async fn test_live_view_skips_deleted_products() {
        let pool = memory_pool().await;
        let cart = CartService::new(&pool);
        let account = seed_account(&pool).await;
        let cap = seed_product(&pool, "Cap", "10.00").await;
        let tee = seed_product(&pool, "Tee", "15.00").await;

        cart.add(account, cap, LineTotalPolicy::PerUnit).await.unwrap();
        cart.add(account, tee, LineTotalPolicy::PerUnit).await.unwrap();
        ProductRepository::new(&pool).delete(cap).await.unwrap();

        let view = cart.view(account, PricingPolicy::Live).await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].name, "Tee");
        assert_eq!(view.total, Decimal::new(1500, 2));
    }

    #[tokio::test]
    async fn test_legacy_totals_double_the_unit_price() {
        let pool = memory_pool().await;
        let cart = CartService::new(&pool);
        let account = seed_account(&pool).await;
        let cap = seed_product(&pool, "Cap", "10.00").await;

        cart.add(account, cap, LineTotalPolicy::Legacy).await.unwrap();

        let view = cart.view(account, PricingPolicy::Snapshot).await.unwrap();
        assert_eq!(view.items[0].line_total, Price::parse("20.00").unwrap());
        // Live view prices from the catalog and doesn't see the doubling.
        let live = cart.view(account, PricingPolicy::Live).await.unwrap();
        assert_eq!(live.total, Decimal::new(1000, 2));
    }

    #[tokio::test]
    async fn test_remove_missing_product_is_noop() {
        let pool = memory_pool().await;
        let cart = CartService::new(&pool);
        let account = seed_account(&pool).await;

        assert_eq!(cart.remove(account, ProductId::new(404)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_cart_view() {
        let pool = memory_pool().await;
        let cart = CartService::new(&pool);
        let account = seed_account(&pool).await;

        let view = cart.view(account, PricingPolicy::Live).await.unwrap();
        assert!(view.items.is_empty());
        assert_eq!(view.total, Decimal::ZERO);
    }
}
