//! Cart route handlers.
//!
//! Adds and removals arrive as GET links (the storefront's pages link to
//! them directly) and answer with redirects; the cart view returns the
//! aggregated JSON payload.

use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;

use rummage_core::ProductId;

use crate::error::Result;
use crate::middleware::auth::RequireAuth;
use crate::services::cart::{CartService, CartView, PricingPolicy};
use crate::state::AppState;

/// Query parameter naming a product to add.
#[derive(Debug, Deserialize)]
pub struct AddQuery {
    pub id: ProductId,
}

/// Query parameter naming a product to remove.
///
/// The key is `cart_id` for compatibility with existing links, but it
/// carries a product id.
#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    pub cart_id: ProductId,
}

/// View the aggregated cart.
///
/// Pricing is live: each distinct product shows its current catalog
/// price, not the price it had when added.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartView>> {
    let view = CartService::new(state.pool())
        .view(user.id, PricingPolicy::Live)
        .await?;
    Ok(Json(view))
}

/// Add a product to the current account's cart.
pub async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<AddQuery>,
) -> Result<Redirect> {
    CartService::new(state.pool())
        .add(user.id, query.id, state.line_total_policy())
        .await?;

    tracing::debug!(account_id = %user.id, product_id = %query.id, "added to cart");
    Ok(Redirect::to("/"))
}

/// Remove a product's lines from the current account's cart.
///
/// Only the caller's lines go; other accounts carting the same product
/// are unaffected.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<RemoveQuery>,
) -> Result<Redirect> {
    let removed = CartService::new(state.pool())
        .remove(user.id, query.cart_id)
        .await?;

    tracing::debug!(account_id = %user.id, product_id = %query.cart_id, removed, "removed from cart");
    Ok(Redirect::to("/Cart"))
}
