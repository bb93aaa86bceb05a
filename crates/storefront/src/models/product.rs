//! Product catalog domain types.

use serde::Serialize;

use rummage_core::{Price, ProductId};

/// A sellable product (domain type).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name (unique across the catalog).
    pub name: String,
    /// Garment size (free text, e.g. "Large").
    pub size: String,
    /// Current catalog price.
    pub price: Price,
    /// Seller-written description.
    pub description: String,
    /// Where the item is held.
    pub location: String,
    /// Units in stock.
    pub stock: i64,
    /// Optional image reference.
    pub image_path: Option<String>,
}

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub size: String,
    pub price: Price,
    pub description: String,
    pub location: String,
    pub stock: i64,
}

/// Partial update of a product; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub size: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub stock: Option<i64>,
}
