//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /            - Product listing (public)
//! GET  /health      - Health check
//!
//! # Auth
//! GET  /login       - Login form state
//! POST /login       - Login action
//! GET  /register    - Registration form state
//! POST /register    - Registration action
//! GET  /logout      - End session (authenticated)
//!
//! # Catalog management (admin)
//! GET  /add         - Product form state
//! POST /add         - Create product
//! GET  /delete?id=  - Delete product
//! GET  /image?id=   - Image-assignment form state
//! GET  /uploader?id=  - Image-assignment form state (legacy alias)
//! POST /uploader?id=  - Set product image path
//!
//! # Cart (authenticated)
//! GET  /Cart           - Aggregated cart view
//! GET  /additem?id=    - Add product to cart
//! GET  /remove?cart_id= - Remove a product's lines from own cart
//! ```
//!
//! Form and auth failures travel as redirects carrying an `error` query
//! code; the GET form-state endpoints echo that code back.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod home;

use axum::{
    Router,
    routing::get,
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for error display on form pages.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
}

/// Create the admin catalog-management routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/add", get(catalog::add_page).post(catalog::add))
        .route("/delete", get(catalog::delete))
        .route("/image", get(catalog::image_page))
        .route("/uploader", get(catalog::image_page).post(catalog::upload))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        // Capitalized path kept for compatibility with existing links.
        .route("/Cart", get(cart::show))
        .route("/additem", get(cart::add_item))
        .route("/remove", get(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .merge(auth_routes())
        .merge(catalog_routes())
        .merge(cart_routes())
}
