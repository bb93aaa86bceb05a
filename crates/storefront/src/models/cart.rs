//! Cart line domain types.

use rummage_core::{AccountId, CartLineId, Price, ProductId};

/// One cart entry: an account wants a product.
///
/// `product_name` and `unit_price` are snapshots taken when the line was
/// added. The aggregated cart view re-reads the catalog, so a product whose
/// price changed after add shows its current price, not the snapshot.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    /// Unique line ID (store-generated).
    pub id: CartLineId,
    /// Owning account.
    pub account_id: AccountId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Product name at add time.
    pub product_name: String,
    /// Unit price at add time.
    pub unit_price: Price,
    /// Line total computed at add time (see `LineTotalPolicy`).
    pub line_total: Price,
}
