//! Read-only catalog endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;

use prenda_core::{CommerceError, ProductFilters};

use crate::error::ApiError;
use crate::rest::AppState;

/// Query params for product listing. Mirrors the chat filter set plus the
/// REST-only `in_stock` shorthand.
#[derive(Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub available: Option<bool>,
    pub in_stock: Option<bool>,
}

pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let filters = ProductFilters {
        q: params.q,
        product_type: params.product_type,
        size: params.size,
        color: params.color,
        category: params.category,
        min_price: params.min_price,
        max_price: params.max_price,
        min_stock: (params.in_stock == Some(true)).then_some(1),
        available: params.available,
    };

    let products = match (&filters.q, filters.is_unfiltered()) {
        (Some(q), true) => state.catalog.search_by_text(q).await?,
        _ => state.catalog.get_products(&filters).await?,
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "count": products.len(),
        "data": products,
    })))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let product = state
        .catalog
        .find_by_id(id)
        .await?
        .ok_or_else(|| CommerceError::NotFound(format!("Product {id} not found")))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": product,
    })))
}
