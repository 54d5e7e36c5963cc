//! Cart endpoints keyed by session id.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use prenda_core::{CartItemInput, CommerceError};

use crate::error::ApiError;
use crate::rest::{AppState, DEFAULT_SESSION};

#[derive(Deserialize)]
pub struct CreateCartRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub items: Vec<CartItemInput>,
}

#[derive(Deserialize)]
pub struct UpdateCartRequest {
    pub items: Vec<CartItemInput>,
}

pub async fn create_cart(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCartRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let session_id = body.session_id.as_deref().unwrap_or(DEFAULT_SESSION);
    let cart = state.carts.create_cart(session_id, &body.items).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "id": cart.id,
            "message": "Cart created",
            "data": cart,
        })),
    ))
}

pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cart = state
        .carts
        .get_cart(&session_id)
        .await?
        .ok_or_else(|| CommerceError::NotFound(format!("Cart {session_id} not found")))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": cart,
    })))
}

pub async fn update_cart(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(body): Json<UpdateCartRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cart = state.carts.update_cart(&session_id, &body.items).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": cart,
    })))
}

pub async fn delete_cart(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let receipt = state.carts.delete_cart_by_session(&session_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": receipt.message,
        "session_id": receipt.session_id,
    })))
}
