//! Admin catalog-management route handlers.
//!
//! Every handler here takes [`RequireAdmin`]; non-admins get a bare 403
//! before any of this code runs.

use axum::{
    Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use rummage_core::{Price, ProductId};

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAdmin;
use crate::models::NewProduct;
use crate::routes::MessageQuery;
use crate::state::AppState;

/// Query parameter naming a product.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: ProductId,
}

/// New-product form data.
#[derive(Debug, Deserialize)]
pub struct AddProductForm {
    pub name: Option<String>,
    pub size: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub stock: Option<String>,
}

/// Image-assignment form data.
#[derive(Debug, Deserialize)]
pub struct UploadForm {
    pub filepath: Option<String>,
}

/// Form-state payload for the add-product form.
#[derive(Debug, Serialize)]
pub struct AddPage {
    pub error: Option<String>,
}

/// Form-state payload for the image-assignment form.
#[derive(Debug, Serialize)]
pub struct ImagePage {
    pub product_id: ProductId,
    pub name: String,
    pub image_path: Option<String>,
}

/// Display the add-product form state.
pub async fn add_page(
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Json<AddPage> {
    Json(AddPage { error: query.error })
}

/// Create a product from the submitted form.
pub async fn add(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Form(form): Form<AddProductForm>,
) -> Result<Response> {
    let (Some(name), Some(size), Some(price), Some(description), Some(location), Some(stock)) = (
        form.name,
        form.size,
        form.price,
        form.description,
        form.location,
        form.stock,
    ) else {
        return Ok(Redirect::to("/add?error=missing_fields").into_response());
    };
    if name.is_empty() || size.is_empty() || description.is_empty() || location.is_empty() {
        return Ok(Redirect::to("/add?error=missing_fields").into_response());
    }

    let Ok(price) = Price::parse(&price) else {
        return Ok(Redirect::to("/add?error=invalid_price").into_response());
    };
    let Ok(stock) = stock.parse::<i64>() else {
        return Ok(Redirect::to("/add?error=invalid_stock").into_response());
    };
    if stock < 0 {
        return Ok(Redirect::to("/add?error=invalid_stock").into_response());
    }

    let new = NewProduct {
        name,
        size,
        price,
        description,
        location,
        stock,
    };

    match ProductRepository::new(state.pool()).create(&new).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, name = %product.name, "product created");
            Ok(Redirect::to("/").into_response())
        }
        Err(RepositoryError::Conflict(_)) => {
            Ok(Redirect::to("/add?error=name_taken").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a product by id.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<IdQuery>,
) -> Result<Redirect> {
    let deleted = ProductRepository::new(state.pool()).delete(query.id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("product {}", query.id)));
    }

    tracing::info!(product_id = %query.id, "product deleted");
    Ok(Redirect::to("/"))
}

/// Display the image-assignment form state for a product.
pub async fn image_page(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<IdQuery>,
) -> Result<Json<ImagePage>> {
    let product = ProductRepository::new(state.pool())
        .get(query.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", query.id)))?;

    Ok(Json(ImagePage {
        product_id: product.id,
        name: product.name,
        image_path: product.image_path,
    }))
}

/// Set a product's image path from the submitted form.
pub async fn upload(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<IdQuery>,
    Form(form): Form<UploadForm>,
) -> Result<Response> {
    let Some(filepath) = form.filepath.filter(|p| !p.is_empty()) else {
        let target = format!("/image?id={}&error=missing_filepath", query.id);
        return Ok(Redirect::to(&target).into_response());
    };

    match ProductRepository::new(state.pool())
        .set_image(query.id, &filepath)
        .await
    {
        Ok(()) => Ok(Redirect::to("/").into_response()),
        Err(RepositoryError::NotFound) => {
            Err(AppError::NotFound(format!("product {}", query.id)))
        }
        Err(e) => Err(e.into()),
    }
}
