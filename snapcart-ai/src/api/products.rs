//! Saved product endpoints
//!
//! Products are stored with the search term produced by `/api/infer` (or
//! typed by the user when nothing was detected).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::db::products::{self, ProductRecord};
use crate::error::{ApiError, ApiResult};
use crate::services::StoreLink;
use crate::types::ProductCategory;
use crate::AppState;

/// POST /api/products request
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub search_term: String,
    #[serde(default)]
    pub category: Option<ProductCategory>,
}

/// Product with its store search links
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: ProductRecord,
    pub links: Vec<StoreLink>,
}

/// GET /api/products response
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductRecord>,
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let search_term = request.search_term.trim();
    if search_term.is_empty() {
        return Err(ApiError::BadRequest("search_term must not be empty".to_string()));
    }

    let product = ProductRecord::new(request.name, search_term.to_string(), request.category);
    products::save_product(&state.db, &product).await?;
    info!(id = %product.id, search_term = %product.search_term, "Product saved");

    let links = state.links.links_for(&product.search_term);
    Ok((StatusCode::CREATED, Json(ProductResponse { product, links })))
}

/// GET /api/products
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<ProductListResponse>> {
    let products = products::list_products(&state.db).await?;
    Ok(Json(ProductListResponse { products }))
}

/// GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProductResponse>> {
    let product = products::load_product(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {}", id)))?;

    let links = state.links.links_for(&product.search_term);
    Ok(Json(ProductResponse { product, links }))
}

/// DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if products::delete_product(&state.db, id).await? {
        info!(id = %id, "Product deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Product {}", id)))
    }
}

/// Build product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/:id", get(get_product).delete(delete_product))
}
