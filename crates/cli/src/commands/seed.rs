//! Catalog seeding command.
//!
//! Inserts the starter product so a fresh storefront has something on the
//! shelf. Safe to run repeatedly: an already-seeded catalog is left alone.

use rummage_core::Price;
use rummage_storefront::db::RepositoryError;
use rummage_storefront::db::products::ProductRepository;
use rummage_storefront::models::NewProduct;

use super::CommandError;

/// Seed the catalog with the starter product.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or the insert
/// fails for a reason other than the product already existing.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let repo = ProductRepository::new(&pool);

    let jacket = NewProduct {
        name: "Dodgers Jacket".to_owned(),
        size: "Large".to_owned(),
        price: Price::parse("74.99").map_err(|e| CommandError::InvalidSeed(e.to_string()))?,
        description: "Vintage satin bomber, great condition".to_owned(),
        location: "Long Beach".to_owned(),
        stock: 1,
    };

    match repo.create(&jacket).await {
        Ok(product) => {
            tracing::info!("Seeded product: {} (id {})", product.name, product.id);
        }
        Err(RepositoryError::Conflict(_)) => {
            tracing::info!("Catalog already seeded, nothing to do");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
