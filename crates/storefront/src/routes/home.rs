//! Home page: the public product listing.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::db::products::ProductRepository;
use crate::error::Result;
use crate::middleware::auth::OptionalAuth;
use crate::models::Product;
use crate::state::AppState;

/// The storefront landing payload.
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub products: Vec<Product>,
    /// Email of the signed-in account, if any.
    pub signed_in_as: Option<String>,
}

/// List the catalog, best-stocked items first.
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<HomePage>> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(Json(HomePage {
        products,
        signed_in_as: user.map(|u| u.email.to_string()),
    }))
}
